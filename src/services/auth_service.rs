//! 认证服务：登录、刷新、登出、注册

use crate::{
    auth::{
        jwt::{IssuedToken, TokenPair, TokenService, TokenSubject},
        password::PasswordHasher,
        session::{Session, SessionRole},
    },
    error::{AppError, TenantBlock},
    models::{
        auth::{LoginData, LoginRequest, MeData, RegisterData, RegisterRequest},
        restaurant::{NewRestaurant, Restaurant, RestaurantStatus, SubscriptionPackage},
        user::{NewUser, User, UserResponse, UserRole},
    },
    repository::{RefreshTokenStore, RestaurantStore, UserStore},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_REFRESH: &str = "Invalid or expired refresh token";

/// Successful login: which audience, the minted pair, and the response body
#[derive(Debug)]
pub struct LoginOutcome {
    pub role: SessionRole,
    pub tokens: TokenPair,
    pub data: LoginData,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    restaurants: Arc<dyn RestaurantStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        restaurants: Arc<dyn RestaurantStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            restaurants,
            refresh_tokens,
            tokens,
            hasher,
        }
    }

    /// 用户登录
    ///
    /// Rejections never set cookies and never persist a refresh token.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, AppError> {
        req.validate()?;

        let user = self
            .users
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        // 访客顾客没有密码
        let verified = user
            .password_hash
            .as_deref()
            .map(|hash| self.hasher.verify(&req.password, hash))
            .unwrap_or(false);
        if !verified {
            tracing::info!(user_id = %user.id, "Login failed: bad credentials");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let role = SessionRole::for_user(user.role).ok_or_else(|| {
            AppError::ForbiddenWith("Customer accounts cannot sign in to the dashboard".to_string())
        })?;

        let restaurant = match role {
            SessionRole::Admin => None,
            SessionRole::Operator => Some(self.operator_restaurant(&user).await?),
        };

        let subject = TokenSubject {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            restaurant_id: restaurant.as_ref().map(|r| r.id),
        };
        let tokens = self.tokens.issue_pair(&subject)?;
        self.refresh_tokens
            .issue(user.id, &tokens.refresh.token, tokens.refresh.expires_at)
            .await?;

        tracing::info!(
            user_id = %user.id,
            role = user.role.as_str(),
            "User logged in"
        );

        Ok(LoginOutcome {
            role,
            tokens,
            data: LoginData {
                user: UserResponse::from(user),
                restaurant,
                expires_in: self.tokens.access_ttl().num_seconds() as u64,
            },
        })
    }

    /// 餐厅管理员登录前检查租户状态
    async fn operator_restaurant(&self, user: &User) -> Result<Restaurant, AppError> {
        let restaurant = self
            .restaurants
            .find_by_owner(user.id)
            .await?
            .ok_or_else(|| {
                AppError::ForbiddenWith("No restaurant is linked to this account".to_string())
            })?;

        let block = match restaurant.status {
            RestaurantStatus::Pending => Some(TenantBlock::PendingApproval),
            RestaurantStatus::Rejected => Some(TenantBlock::Rejected),
            RestaurantStatus::Approved if !restaurant.is_active => Some(TenantBlock::Inactive),
            RestaurantStatus::Approved => None,
        };

        if let Some(block) = block {
            tracing::info!(
                user_id = %user.id,
                restaurant_id = %restaurant.id,
                code = block.code(),
                "Login blocked by restaurant state"
            );
            return Err(AppError::Tenant(block));
        }

        Ok(restaurant)
    }

    /// 用刷新令牌换新的访问令牌（不轮换刷新令牌）
    pub async fn refresh(
        &self,
        role: SessionRole,
        refresh_token: &str,
    ) -> Result<IssuedToken, AppError> {
        let invalid = || AppError::Authentication(INVALID_REFRESH.to_string());

        let claims = self.tokens.verify_refresh(refresh_token).ok_or_else(invalid)?;
        if !role.accepts(claims.role) {
            return Err(invalid());
        }

        let stored = self
            .refresh_tokens
            .lookup(refresh_token)
            .await?
            .ok_or_else(invalid)?;
        if !stored.is_usable(self.tokens.now()) || stored.user_id != claims.user_id {
            tracing::info!(user_id = %claims.user_id, "Refresh rejected: token revoked or expired");
            return Err(invalid());
        }

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(invalid)?;

        let subject = TokenSubject {
            user_id: user.id,
            email: user.email,
            role: user.role,
            restaurant_id: claims.restaurant_id,
        };
        let access = self.tokens.issue_access(&subject)?;

        tracing::debug!(user_id = %subject.user_id, "Access token refreshed");
        Ok(access)
    }

    /// 撤销给定的刷新令牌（不存在或已撤销的忽略）
    pub async fn logout(&self, refresh_tokens: &[String]) -> Result<(), AppError> {
        for token in refresh_tokens {
            let revoked = self.refresh_tokens.revoke(token).await?;
            tracing::debug!(revoked, "Refresh token revoked on logout");
        }
        Ok(())
    }

    /// 当前会话的用户信息
    pub async fn me(&self, session: &Session) -> Result<MeData, AppError> {
        let user = self
            .users
            .find_by_id(session.claims.user_id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or(AppError::Unauthorized)?;

        let restaurant = match session.role {
            SessionRole::Admin => None,
            // 会话里记录的是登录时选定的餐厅
            SessionRole::Operator => match session.claims.restaurant_id {
                Some(id) => self.restaurants.find_by_id(id).await?,
                None => None,
            },
        };

        Ok(MeData {
            user: UserResponse::from(user),
            restaurant,
        })
    }

    /// 餐厅自助注册：一个事务内创建 RESTAURANT_ADMIN 用户和 PENDING 餐厅
    ///
    /// 非预期错误的原始信息会返回给调用方。
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterData, AppError> {
        req.validate()?;
        self.register_inner(req).await.map_err(AppError::exposed)
    }

    async fn register_inner(&self, req: RegisterRequest) -> Result<RegisterData, AppError> {
        let email = req.email.trim().to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let slug = slugify(req.slug.as_deref().unwrap_or(&req.restaurant_name));
        if slug.is_empty() {
            return Err(AppError::BadRequest("Invalid restaurant slug".to_string()));
        }
        if self.restaurants.slug_exists(&slug).await? {
            return Err(AppError::BadRequest(
                "Restaurant slug already taken".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let (user, restaurant) = self
            .users
            .register_owner(
                NewUser {
                    name: req.name.trim().to_string(),
                    email,
                    password_hash: Some(password_hash),
                    phone: req.phone.clone(),
                    role: UserRole::RestaurantAdmin,
                },
                NewRestaurant {
                    slug,
                    name: req.restaurant_name.trim().to_string(),
                    phone: req.phone,
                    address: req.address,
                    package: SubscriptionPackage::Free,
                },
            )
            .await?;

        Ok(RegisterData {
            user: UserResponse::from(user),
            restaurant,
            message: "Registration successful. Your restaurant is pending approval.".to_string(),
        })
    }
}

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// URL 安全的 slug：小写字母数字，其它字符折叠为 `-`
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Warung Bu Sri"), "warung-bu-sri");
        assert_eq!(slugify("  Kopi & Roti!! "), "kopi-roti");
        assert_eq!(slugify("Sate_Ayam--99"), "sate-ayam-99");
        assert_eq!(slugify("!!!"), "");
    }
}
