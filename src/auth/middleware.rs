//! 会话提取器与页面守卫

use crate::{
    auth::{
        jwt::Claims,
        session::{self, explicit_role, Session, SessionRole},
    },
    error::AppError,
    middleware::AppState,
    models::auth::RoleQuery,
};
use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

fn query_role(parts: &Parts) -> Option<SessionRole> {
    Query::<RoleQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| explicit_role(q.role.as_deref()))
}

/// Resolve a session pinned to `role`; a valid session of the other
/// audience turns 401 into 403.
fn require(state: &AppState, parts: &Parts, role: SessionRole) -> Result<Session, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);

    if let Some(session) = session::resolve(&state.tokens, &jar, Some(role)) {
        return Ok(session);
    }

    let other = match role {
        SessionRole::Admin => SessionRole::Operator,
        SessionRole::Operator => SessionRole::Admin,
    };
    match session::resolve(&state.tokens, &jar, Some(other)) {
        Some(_) => Err(AppError::Forbidden),
        None => Err(AppError::Unauthorized),
    }
}

/// 任一角色的会话（`/auth/me`、公告列表）
#[derive(Debug, Clone)]
pub struct AnySession(pub Session);

impl FromRequestParts<Arc<AppState>> for AnySession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session::resolve(&state.tokens, &jar, query_role(parts))
            .map(AnySession)
            .ok_or(AppError::Unauthorized)
    }
}

/// 餐厅后台会话
#[derive(Debug, Clone)]
pub struct OperatorSession {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub claims: Claims,
}

impl FromRequestParts<Arc<AppState>> for OperatorSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = require(state, parts, SessionRole::Operator)?;
        let restaurant_id = session.claims.restaurant_id.ok_or(AppError::Forbidden)?;

        Ok(OperatorSession {
            user_id: session.claims.user_id,
            restaurant_id,
            claims: session.claims,
        })
    }
}

/// 超级管理员会话
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: Uuid,
    pub claims: Claims,
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = require(state, parts, SessionRole::Admin)?;

        Ok(AdminSession {
            user_id: session.claims.user_id,
            claims: session.claims,
        })
    }
}

/// Which audience a page path needs, if any
pub fn page_audience(path: &str) -> Option<SessionRole> {
    let under = |prefix: &str| {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    };

    if under("/admin") {
        Some(SessionRole::Admin)
    } else if under("/dashboard") {
        Some(SessionRole::Operator)
    } else {
        None
    }
}

/// 页面守卫：未登录访问 /admin/* 或 /dashboard/* 时 307 跳转到首页
pub async fn page_guard(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if let Some(role) = page_audience(req.uri().path()) {
        let jar = CookieJar::from_headers(req.headers());
        if session::resolve(&state.tokens, &jar, Some(role)).is_none() {
            tracing::debug!(path = %req.uri().path(), "Page guard redirect");
            return Redirect::temporary("/").into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_audience() {
        assert_eq!(page_audience("/admin"), Some(SessionRole::Admin));
        assert_eq!(page_audience("/admin/restaurants"), Some(SessionRole::Admin));
        assert_eq!(page_audience("/dashboard/menu"), Some(SessionRole::Operator));
        assert_eq!(page_audience("/administrator"), None);
        assert_eq!(page_audience("/"), None);
        assert_eq!(page_audience("/api/auth/me"), None);
    }
}
