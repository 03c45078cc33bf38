//! JWT token generation and validation
//! Implements the access token + refresh token pair used by both audiences

use crate::{auth::clock::Clock, config::SecurityConfig, error::AppError, models::user::UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Token kind, embedded in the claims so one cannot stand in for the other
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub restaurant_id: Option<Uuid>,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<Uuid>,
    pub token_type: TokenKind,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// JWT ID, keeps two tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
            restaurant_id: self.restaurant_id,
        }
    }
}

/// A freshly signed token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access + refresh pair minted at login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Signs and verifies session tokens with a single shared HS256 secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(
        secret: &str,
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("JWT secret is not configured".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(refresh_ttl_secs as i64),
            clock,
        })
    }

    /// Create token service from the security section of the config
    pub fn from_config(config: &SecurityConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        Self::new(
            config.jwt_secret.expose_secret(),
            config.access_token_exp_secs,
            config.refresh_token_exp_secs,
            clock,
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn issue(&self, kind: TokenKind, subject: &TokenSubject) -> Result<IssuedToken, AppError> {
        let now = self.clock.now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at = now + ttl;

        let claims = Claims {
            user_id: subject.user_id,
            email: subject.email.clone(),
            role: subject.role,
            restaurant_id: subject.restaurant_id,
            token_type: kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode {:?} token: {:?}", kind, e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Generate access token
    pub fn issue_access(&self, subject: &TokenSubject) -> Result<IssuedToken, AppError> {
        self.issue(TokenKind::Access, subject)
    }

    /// Generate refresh token
    pub fn issue_refresh(&self, subject: &TokenSubject) -> Result<IssuedToken, AppError> {
        self.issue(TokenKind::Refresh, subject)
    }

    /// Generate token pair
    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.issue_access(subject)?,
            refresh: self.issue_refresh(subject)?,
        })
    }

    /// Decode and check a token; any failure yields `None`.
    fn verify(&self, token: &str, kind: TokenKind) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 过期时间由注入的时钟判断
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Token validation failed: {:?}", e);
                return None;
            }
        };

        if claims.token_type != kind {
            tracing::debug!(
                "Token type mismatch: expected {:?}, got {:?}",
                kind,
                claims.token_type
            );
            return None;
        }

        if self.clock.now().timestamp() >= claims.exp {
            tracing::debug!(user_id = %claims.user_id, "Token expired");
            return None;
        }

        Some(claims)
    }

    /// Validate access token specifically
    pub fn verify_access(&self, token: &str) -> Option<Claims> {
        self.verify(token, TokenKind::Access)
    }

    /// Validate refresh token specifically
    pub fn verify_refresh(&self, token: &str) -> Option<Claims> {
        self.verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::{ManualClock, SystemClock};

    const SECRET: &str = "test_secret_key_32_characters_long!";

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: Uuid::new_v4(),
            email: "owner@warung.id".to_string(),
            role: UserRole::RestaurantAdmin,
            restaurant_id: Some(Uuid::new_v4()),
        }
    }

    fn service() -> TokenService {
        TokenService::new(SECRET, 900, 604800, Arc::new(SystemClock)).unwrap()
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = service();
        let subject = subject();

        let issued = service.issue_access(&subject).unwrap();
        let claims = service.verify_access(&issued.token).unwrap();

        assert_eq!(claims.subject(), subject);
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_lifetime_is_seven_days() {
        let service = service();
        let issued = service.issue_refresh(&subject()).unwrap();
        let claims = service.verify_refresh(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_token_type_validation() {
        let service = service();
        let pair = service.issue_pair(&subject()).unwrap();

        assert!(service.verify_refresh(&pair.access.token).is_none());
        assert!(service.verify_access(&pair.refresh.token).is_none());
    }

    #[test]
    fn test_invalid_and_foreign_tokens_fail() {
        let service = service();
        assert!(service.verify_access("invalid_token").is_none());

        let other = TokenService::new(
            "another_secret_key_with_32_chars!!",
            900,
            604800,
            Arc::new(SystemClock),
        )
        .unwrap();
        let foreign = other.issue_access(&subject()).unwrap();
        assert!(service.verify_access(&foreign.token).is_none());
    }

    #[test]
    fn test_access_token_expires_after_fifteen_minutes() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = TokenService::new(SECRET, 900, 604800, clock.clone()).unwrap();
        let issued = service.issue_access(&subject()).unwrap();

        clock.advance(Duration::minutes(14) + Duration::seconds(59));
        assert!(service.verify_access(&issued.token).is_some());

        clock.advance(Duration::seconds(1));
        assert!(service.verify_access(&issued.token).is_none());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(TokenService::new("", 900, 604800, Arc::new(SystemClock)).is_err());
    }
}
