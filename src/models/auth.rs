//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::restaurant::Restaurant;
use super::user::UserResponse;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Restaurant owner self-registration
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Restaurant name is required"))]
    pub restaurant_name: String,
    pub slug: Option<String>,
    pub address: Option<String>,
}

/// `?role=` query parameter used by session-aware endpoints
#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// Login response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Restaurant>,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// `/auth/me` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeData {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Restaurant>,
}

/// Registration response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub user: UserResponse,
    pub restaurant: Restaurant,
    pub message: String,
}
