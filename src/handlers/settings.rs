//! 餐厅设置与仪表盘

use crate::{
    auth::middleware::OperatorSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{restaurant::UpdateSettingsRequest, ApiResponse},
};
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
) -> Result<impl IntoResponse, AppError> {
    let restaurant = state
        .restaurant_service
        .settings(session.restaurant_id)
        .await?;
    Ok(ApiResponse::ok(restaurant))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    AppJson(req): AppJson<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let restaurant = state
        .restaurant_service
        .update_settings(session.restaurant_id, req)
        .await?;
    Ok(ApiResponse::ok(restaurant))
}

/// 今日订单数、营业额与待处理订单
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .analytics_service
        .dashboard(session.restaurant_id)
        .await?;
    Ok(ApiResponse::ok(summary))
}
