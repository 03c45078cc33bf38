//! 餐厅：公开菜单与超级管理员的租户管理

use crate::{
    auth::middleware::AdminSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        restaurant::{AdminUpdateRestaurantRequest, RestaurantListQuery},
        ApiResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

/// 扫码点餐页面的菜单
pub async fn public_menu(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let menu = state.restaurant_service.public_menu(&slug).await?;
    Ok(ApiResponse::ok(menu))
}

pub async fn list_restaurants(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Query(query): Query<RestaurantListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let restaurants = state.restaurant_service.admin_list(&query).await?;
    Ok(ApiResponse::ok(restaurants))
}

/// 审批、停用或调整套餐
pub async fn update_restaurant(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<AdminUpdateRestaurantRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(admin_id = %session.user_id, restaurant_id = %id, "Admin restaurant update");
    let restaurant = state.restaurant_service.admin_update(id, req).await?;
    Ok(ApiResponse::ok(restaurant))
}

/// 平台概览
pub async fn analytics_overview(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let overview = state.analytics_service.overview().await?;
    Ok(ApiResponse::ok(overview))
}
