//! Session resolution over the two cookie audiences
//!
//! 管理后台（adminToken / adminRefreshToken）和餐厅后台（restoToken /
//! restoRefreshToken）在同一个浏览器里可以同时登录。每个请求只验证一个令牌，
//! 选择顺序：显式 `?role=` → `lastRole` 提示 → admin → resto。

use crate::{
    auth::jwt::{Claims, TokenKind, TokenService},
    config::SecurityConfig,
    models::user::UserRole,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const ADMIN_ACCESS_COOKIE: &str = "adminToken";
pub const ADMIN_REFRESH_COOKIE: &str = "adminRefreshToken";
pub const OPERATOR_ACCESS_COOKIE: &str = "restoToken";
pub const OPERATOR_REFRESH_COOKIE: &str = "restoRefreshToken";
pub const LAST_ROLE_COOKIE: &str = "lastRole";

/// Cookie audience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// Super-admin panel
    Admin,
    /// Restaurant operator dashboard
    Operator,
}

impl SessionRole {
    /// Fallback order when neither an explicit role nor a hint decides
    pub const ALL: [SessionRole; 2] = [SessionRole::Admin, SessionRole::Operator];

    pub fn cookie_name(&self, kind: TokenKind) -> &'static str {
        match (self, kind) {
            (SessionRole::Admin, TokenKind::Access) => ADMIN_ACCESS_COOKIE,
            (SessionRole::Admin, TokenKind::Refresh) => ADMIN_REFRESH_COOKIE,
            (SessionRole::Operator, TokenKind::Access) => OPERATOR_ACCESS_COOKIE,
            (SessionRole::Operator, TokenKind::Refresh) => OPERATOR_REFRESH_COOKIE,
        }
    }

    /// Value used in `?role=` and in the `lastRole` cookie
    pub fn hint(&self) -> &'static str {
        match self {
            SessionRole::Admin => "admin",
            SessionRole::Operator => "resto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(SessionRole::Admin),
            "resto" => Some(SessionRole::Operator),
            _ => None,
        }
    }

    /// Audience a user role logs into; customers have none
    pub fn for_user(role: UserRole) -> Option<Self> {
        match role {
            UserRole::SuperAdmin => Some(SessionRole::Admin),
            UserRole::RestaurantAdmin => Some(SessionRole::Operator),
            UserRole::Customer => None,
        }
    }

    /// Whether a token carrying `role` may be accepted from this audience's cookie
    pub fn accepts(&self, role: UserRole) -> bool {
        Self::for_user(role) == Some(*self)
    }
}

/// A verified session
#[derive(Debug, Clone)]
pub struct Session {
    pub role: SessionRole,
    pub claims: Claims,
}

/// Parse the `?role=` query value; unknown values count as absent.
pub fn explicit_role(value: Option<&str>) -> Option<SessionRole> {
    value.and_then(SessionRole::parse)
}

/// Non-empty cookie value
pub fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the single cookie to verify for `kind`.
pub fn select_token(
    jar: &CookieJar,
    explicit: Option<SessionRole>,
    kind: TokenKind,
) -> Option<(SessionRole, String)> {
    if let Some(role) = explicit {
        return cookie_value(jar, role.cookie_name(kind)).map(|t| (role, t));
    }

    let hinted = jar
        .get(LAST_ROLE_COOKIE)
        .and_then(|c| SessionRole::parse(c.value()));
    if let Some(role) = hinted {
        if let Some(token) = cookie_value(jar, role.cookie_name(kind)) {
            return Some((role, token));
        }
    }

    SessionRole::ALL
        .iter()
        .find_map(|role| cookie_value(jar, role.cookie_name(kind)).map(|t| (*role, t)))
}

/// Resolve the current session from the access cookies.
///
/// Returns `None` for a missing token, a failed verification, or a token
/// whose role does not belong to the cookie it came from.
pub fn resolve(
    tokens: &TokenService,
    jar: &CookieJar,
    explicit: Option<SessionRole>,
) -> Option<Session> {
    let (role, token) = select_token(jar, explicit, TokenKind::Access)?;
    let claims = tokens.verify_access(&token)?;

    if !role.accepts(claims.role) {
        tracing::debug!(
            cookie = role.cookie_name(TokenKind::Access),
            token_role = claims.role.as_str(),
            "Token role does not match cookie audience"
        );
        return None;
    }

    Some(Session { role, claims })
}

/// Builds the session cookies with the configured lifetimes
#[derive(Debug, Clone)]
pub struct SessionCookies {
    secure: bool,
    access_max_age: Duration,
    refresh_max_age: Duration,
}

impl SessionCookies {
    pub fn new(secure: bool, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            secure,
            access_max_age: Duration::seconds(access_ttl_secs as i64),
            refresh_max_age: Duration::seconds(refresh_ttl_secs as i64),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.cookie_secure,
            config.access_token_exp_secs,
            config.refresh_token_exp_secs,
        )
    }

    fn base(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .build()
    }

    pub fn access(&self, role: SessionRole, token: &str) -> Cookie<'static> {
        let mut cookie = self.base(role.cookie_name(TokenKind::Access), token.to_string());
        cookie.set_max_age(self.access_max_age);
        cookie
    }

    pub fn refresh(&self, role: SessionRole, token: &str) -> Cookie<'static> {
        let mut cookie = self.base(role.cookie_name(TokenKind::Refresh), token.to_string());
        cookie.set_max_age(self.refresh_max_age);
        cookie
    }

    /// 会话级 cookie，不设置 max-age
    pub fn last_role(&self, role: SessionRole) -> Cookie<'static> {
        self.base(LAST_ROLE_COOKIE, role.hint().to_string())
    }

    /// Set the audience's cookie pair and the `lastRole` hint.
    pub fn login(
        &self,
        jar: CookieJar,
        role: SessionRole,
        access: &str,
        refresh: &str,
    ) -> CookieJar {
        jar.add(self.access(role, access))
            .add(self.refresh(role, refresh))
            .add(self.last_role(role))
    }

    /// Clear one audience's cookie pair.
    pub fn clear_role(&self, jar: CookieJar, role: SessionRole) -> CookieJar {
        jar.remove(removal(role.cookie_name(TokenKind::Access)))
            .remove(removal(role.cookie_name(TokenKind::Refresh)))
    }

    /// Clear every session cookie including `lastRole`.
    pub fn clear_all(&self, jar: CookieJar) -> CookieJar {
        let jar = SessionRole::ALL
            .iter()
            .fold(jar, |jar, role| self.clear_role(jar, *role));
        jar.remove(removal(LAST_ROLE_COOKIE))
    }
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
