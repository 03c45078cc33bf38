//! 平台公告

use crate::{
    auth::{
        middleware::{AdminSession, AnySession},
        session::SessionRole,
    },
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        announcement::{CreateAnnouncementRequest, UpdateAnnouncementRequest},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

/// 两种会话都可以读取；只有管理员能看到未启用的公告
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
    AnySession(session): AnySession,
) -> Result<impl IntoResponse, AppError> {
    let include_inactive = session.role == SessionRole::Admin;
    let announcements = state.announcement_service.list(include_inactive).await?;
    Ok(ApiResponse::ok(announcements))
}

pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    AppJson(req): AppJson<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let announcement = state
        .announcement_service
        .create(session.user_id, req)
        .await?;
    Ok(ApiResponse::created(announcement))
}

pub async fn update_announcement(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let announcement = state.announcement_service.update(id, req).await?;
    Ok(ApiResponse::ok(announcement))
}

pub async fn delete_announcement(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.announcement_service.delete(id).await?;
    Ok(ApiResponse::ok(Message::new("Announcement deleted")))
}
