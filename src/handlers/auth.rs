//! 认证相关的 HTTP 处理器

use crate::{
    auth::{
        jwt::TokenKind,
        middleware::AnySession,
        session::{cookie_value, explicit_role, select_token, SessionRole},
    },
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        auth::{LoginRequest, RegisterRequest, RoleQuery},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// 登录：设置对应角色的 cookie 对和 lastRole
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.auth_service.login(req).await?;

    let jar = state.cookies.login(
        jar,
        outcome.role,
        &outcome.tokens.access.token,
        &outcome.tokens.refresh.token,
    );

    Ok((jar, ApiResponse::ok(outcome.data)))
}

/// 餐厅自助注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.auth_service.register(req).await?;
    Ok(ApiResponse::created(data))
}

/// 刷新访问令牌
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoleQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let explicit = explicit_role(query.role.as_deref());
    let (role, token) =
        select_token(&jar, explicit, TokenKind::Refresh).ok_or(AppError::Unauthorized)?;

    let access = state.auth_service.refresh(role, &token).await?;
    let jar = jar.add(state.cookies.access(role, &access.token));

    Ok((jar, ApiResponse::ok(Message::new("Token refreshed"))))
}

/// 登出
///
/// 带 `?role=` 时只清理该角色；否则撤销所有刷新令牌并清理全部 cookie。
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoleQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let explicit = explicit_role(query.role.as_deref());
    let roles: Vec<SessionRole> = match explicit {
        Some(role) => vec![role],
        None => SessionRole::ALL.to_vec(),
    };

    let tokens: Vec<String> = roles
        .iter()
        .filter_map(|role| cookie_value(&jar, role.cookie_name(TokenKind::Refresh)))
        .collect();
    state.auth_service.logout(&tokens).await?;

    let jar = match explicit {
        Some(role) => state.cookies.clear_role(jar, role),
        None => state.cookies.clear_all(jar),
    };

    Ok((jar, ApiResponse::ok(Message::new("Logged out"))))
}

/// 当前用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    AnySession(session): AnySession,
) -> Result<impl IntoResponse, AppError> {
    let data = state.auth_service.me(&session).await?;
    Ok(ApiResponse::ok(data))
}
