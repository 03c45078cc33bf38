//! 菜品管理的 HTTP 处理器

use crate::{
    auth::middleware::OperatorSession,
    error::AppError,
    handlers::AppJson,
    middleware::AppState,
    models::{
        catalog::{CreateMenuItemRequest, MenuItemQuery, UpdateMenuItemRequest},
        ApiResponse, Message,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_menu_items(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Query(query): Query<MenuItemQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = state
        .menu_item_service
        .list(session.restaurant_id, &query)
        .await?;
    Ok(ApiResponse::ok(items))
}

pub async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    AppJson(req): AppJson<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .menu_item_service
        .create(session.restaurant_id, req)
        .await?;
    Ok(ApiResponse::created(item))
}

pub async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .menu_item_service
        .update(session.restaurant_id, id, req)
        .await?;
    Ok(ApiResponse::ok(item))
}

pub async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    session: OperatorSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .menu_item_service
        .delete(session.restaurant_id, id)
        .await?;
    Ok(ApiResponse::ok(Message::new("Menu item deleted")))
}
