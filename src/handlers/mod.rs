//! HTTP 处理器模块

use crate::error::AppError;
use axum::extract::FromRequest;

pub mod announcement;
pub mod auth;
pub mod category;
pub mod health;
pub mod menu_item;
pub mod order;
pub mod payment_method;
pub mod plan;
pub mod restaurant;
pub mod settings;
pub mod upload;

/// JSON 请求体提取器
///
/// 与 `axum::Json` 相同，但解析失败时返回统一的 `{success:false,error}` 400 响应。
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
