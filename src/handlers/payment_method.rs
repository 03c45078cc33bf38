//! 支付方式的 HTTP 处理器

use crate::{
    auth::middleware::OperatorSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        payment::{CreatePaymentMethodRequest, UpdatePaymentMethodRequest},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_payment_methods(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
) -> Result<impl IntoResponse, AppError> {
    let methods = state
        .payment_method_service
        .list(session.restaurant_id)
        .await?;
    Ok(ApiResponse::ok(methods))
}

pub async fn create_payment_method(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    AppJson(req): AppJson<CreatePaymentMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    let method = state
        .payment_method_service
        .create(session.restaurant_id, req)
        .await?;
    Ok(ApiResponse::created(method))
}

pub async fn update_payment_method(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdatePaymentMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    let method = state
        .payment_method_service
        .update(session.restaurant_id, id, req)
        .await?;
    Ok(ApiResponse::ok(method))
}

pub async fn delete_payment_method(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .payment_method_service
        .delete(session.restaurant_id, id)
        .await?;
    Ok(ApiResponse::ok(Message::new("Payment method deleted")))
}
