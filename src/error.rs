//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 租户状态导致的拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantBlock {
    /// 餐厅仍在等待审批
    PendingApproval,
    /// 餐厅注册被拒绝
    Rejected,
    /// 餐厅被停用
    Inactive,
}

impl TenantBlock {
    /// 稳定的机器可读错误码
    pub fn code(&self) -> &'static str {
        match self {
            TenantBlock::PendingApproval => "ACCOUNT_PENDING",
            TenantBlock::Rejected | TenantBlock::Inactive => "ACCOUNT_SUSPENDED",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            TenantBlock::PendingApproval => {
                "Your restaurant is pending approval. Please wait for an administrator to review it."
            }
            TenantBlock::Rejected => {
                "Your restaurant registration was rejected. Please contact support."
            }
            TenantBlock::Inactive => {
                "Your restaurant account has been suspended. Please contact support."
            }
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Access denied: {0}")]
    ForbiddenWith(String),

    #[error("Tenant blocked: {0:?}")]
    Tenant(TenantBlock),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// 对外暴露原始信息的 500（仅注册接口使用）
    #[error("Internal server error: {0}")]
    Exposed(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::ForbiddenWith(_) | AppError::Tenant(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::Exposed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Authentication(msg) => msg.clone(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::ForbiddenWith(msg) => msg.clone(),
            AppError::Tenant(block) => block.reason().to_string(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Exposed(msg) => msg.clone(),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// 可选的机器可读错误码
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            AppError::Tenant(block) => Some(block.code()),
            _ => None,
        }
    }

    /// 获取 HTTP 状态码数值
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    // 便捷方法
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(what.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        AppError::Validation(msg.to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// 把内部错误转换为对外暴露消息的版本
    pub fn exposed(self) -> Self {
        match self {
            AppError::Database(e) => AppError::Exposed(e.to_string()),
            AppError::Config(msg) | AppError::Internal(msg) => AppError::Exposed(msg),
            other => other,
        }
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %request_id,
                "Application error"
            );
        } else {
            tracing::debug!(
                code = self.code(),
                message = %self,
                request_id = %request_id,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            success: false,
            error: self.user_message(),
            code: self.error_code(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// 请求体解析失败统一按 400 返回
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Validation(json_data_message(&err.body_text()))
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("Malformed JSON body".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// 去掉 axum 的前缀和行列位置，保留字段路径与原因，如 "missing field `totalAmount`"
fn json_data_message(text: &str) -> String {
    let message = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    let message = message
        .split_once(" at line ")
        .map(|(head, _)| head)
        .unwrap_or(message);
    message.trim().to_string()
}

/// 校验失败时取第一个字段的错误消息
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::Validation(message)
    }
}
