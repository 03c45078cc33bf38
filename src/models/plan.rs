//! Subscription plan models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::restaurant::SubscriptionPackage;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub package: SubscriptionPackage,
    pub price: Decimal,
    pub description: Option<String>,
    /// NULL 表示不限
    pub max_categories: Option<i32>,
    pub max_menu_items: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Plan name is required"))]
    pub name: String,
    pub package: SubscriptionPackage,
    pub price: Decimal,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "maxCategories cannot be negative"))]
    pub max_categories: Option<i32>,
    #[validate(range(min = 0, message = "maxMenuItems cannot be negative"))]
    pub max_menu_items: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 100, message = "Plan name cannot be empty"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "maxCategories cannot be negative"))]
    pub max_categories: Option<i32>,
    #[validate(range(min = 0, message = "maxMenuItems cannot be negative"))]
    pub max_menu_items: Option<i32>,
    pub is_active: Option<bool>,
}
