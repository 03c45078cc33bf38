//! Order domain models

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kitchen-side order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Payment status, independent from [`OrderStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// Placed order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub table_number: Option<String>,
    pub payment_method_id: Option<Uuid>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line, price is a snapshot taken at order time
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub price: Decimal,
    pub notes: Option<String>,
}

/// Order with its items in placement order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One line of a create-order request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 999, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub price: Decimal,
    pub notes: Option<String>,
}

/// Public create-order request (QR menu checkout)
///
/// `total_amount` is accepted as sent by the client; it is not recomputed
/// from the item prices.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Restaurant slug is required"))]
    pub restaurant_slug: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Customer name is required"))]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[validate(email(message = "Customer email is invalid"))]
    pub customer_email: Option<String>,
    pub table_number: Option<String>,
    pub payment_method_id: Option<Uuid>,
    pub notes: Option<String>,
    pub total_amount: Decimal,
    #[serde(default)]
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
}

/// Status update request (operator)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Order list filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 生成订单号：ORD-YYYYMMDD-XXXXXX
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request_json(items: &str) -> String {
        format!(
            r#"{{"restaurantSlug":"warung-bu-sri","customerName":"Budi","totalAmount":25000,"items":{}}}"#,
            items
        )
    }

    #[test]
    fn test_order_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD-20261017-"));
        assert_eq!(number.len(), "ORD-20261017-".len() + 6);
        assert!(number[13..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_empty_items_rejected() {
        let req: CreateOrderRequest = serde_json::from_str(&request_json("[]")).unwrap();
        let err = crate::error::AppError::from(req.validate().unwrap_err());
        assert_eq!(err.user_message(), "Order must contain at least one item");
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let items = format!(
            r#"[{{"menuItemId":"{}","quantity":0,"price":12500}}]"#,
            Uuid::new_v4()
        );
        let req: CreateOrderRequest = serde_json::from_str(&request_json(&items)).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_order_request() {
        let items = format!(
            r#"[{{"menuItemId":"{}","quantity":2,"price":12500,"notes":"pedas"}}]"#,
            Uuid::new_v4()
        );
        let req: CreateOrderRequest = serde_json::from_str(&request_json(&items)).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.total_amount, Decimal::from(25000));
    }
}
