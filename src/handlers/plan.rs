//! 订阅套餐

use crate::{
    auth::middleware::AdminSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        plan::{CreatePlanRequest, UpdatePlanRequest},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

/// 公开的套餐列表（注册页使用）
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let plans = state.plan_service.list().await?;
    Ok(ApiResponse::ok(plans))
}

pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    AppJson(req): AppJson<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan = state.plan_service.create(req).await?;
    Ok(ApiResponse::created(plan))
}

pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan = state.plan_service.update(id, req).await?;
    Ok(ApiResponse::ok(plan))
}

pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.plan_service.delete(id).await?;
    Ok(ApiResponse::ok(Message::new("Subscription plan deleted")))
}
