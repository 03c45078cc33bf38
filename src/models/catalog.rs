//! Catalog models: categories and menu items

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Menu category (tenant-scoped, soft-deleted)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Update category request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Menu item (tenant-scoped, soft-deleted)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub is_available: bool,
    pub sort_order: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Create menu item request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    pub category_id: Uuid,
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Menu item name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

/// Update menu item request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 150, message = "Menu item name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Menu item list filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemQuery {
    pub category_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_missing_category_name_is_rejected() {
        let req: CreateCategoryRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        let err = crate::error::AppError::from(req.validate().unwrap_err());
        assert_eq!(err.code(), 400);
        assert_eq!(err.user_message(), "Category name is required");
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let req = CreateMenuItemRequest {
            category_id: Uuid::new_v4(),
            name: "Es Teh".to_string(),
            description: None,
            price: Decimal::from_str("-1.50").unwrap(),
            image: None,
            is_available: true,
            sort_order: 0,
        };
        let err = crate::error::AppError::from(req.validate().unwrap_err());
        assert_eq!(err.user_message(), "Price cannot be negative");
    }

    #[test]
    fn test_update_without_name_is_valid() {
        let req = UpdateCategoryRequest {
            sort_order: Some(2),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }
}
