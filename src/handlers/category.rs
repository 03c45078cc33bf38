//! 分类管理的 HTTP 处理器

use crate::{
    auth::middleware::OperatorSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        catalog::{CreateCategoryRequest, UpdateCategoryRequest},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_service.list(session.restaurant_id).await?;
    Ok(ApiResponse::ok(categories))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    AppJson(req): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .category_service
        .create(session.restaurant_id, req)
        .await?;
    Ok(ApiResponse::created(category))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .category_service
        .update(session.restaurant_id, id, req)
        .await?;
    Ok(ApiResponse::ok(category))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .category_service
        .delete(session.restaurant_id, id)
        .await?;
    Ok(ApiResponse::ok(Message::new("Category deleted")))
}
