//! 订单处理器：公开下单 / 查询，以及餐厅后台的订单管理

use crate::{
    auth::middleware::OperatorSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        order::{CreateOrderRequest, OrderListQuery, UpdateOrderStatusRequest},
        ApiResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

/// 顾客扫码下单（无需登录）
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.create(req).await?;
    Ok(ApiResponse::created(order))
}

/// 按订单号查询进度（无需登录）
pub async fn track_order(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.track(&order_number).await?;
    Ok(ApiResponse::ok(order))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state
        .order_service
        .list(session.restaurant_id, &query)
        .await?;
    Ok(ApiResponse::ok(orders))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.get(session.restaurant_id, id).await?;
    Ok(ApiResponse::ok(order))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .order_service
        .update_status(session.restaurant_id, id, req)
        .await?;
    Ok(ApiResponse::ok(order))
}
