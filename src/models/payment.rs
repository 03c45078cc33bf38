//! Payment method models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Payment channel type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "payment_method_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    Qris,
    Gopay,
    Ovo,
    Dana,
    Shopeepay,
    BankTransfer,
    Cash,
}

/// Payment method (tenant-scoped, soft-deleted)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub qr_image: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payment method request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethodRequest {
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    #[validate(length(max = 120, message = "Account name is too long"))]
    pub account_name: Option<String>,
    #[validate(length(max = 64, message = "Account number is too long"))]
    pub account_number: Option<String>,
    pub qr_image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update payment method request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentMethodRequest {
    #[validate(length(max = 120, message = "Account name is too long"))]
    pub account_name: Option<String>,
    #[validate(length(max = 64, message = "Account number is too long"))]
    pub account_number: Option<String>,
    pub qr_image: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_type_wire_format() {
        let req: CreatePaymentMethodRequest =
            serde_json::from_str(r#"{"type":"BANK_TRANSFER","accountNumber":"0123"}"#).unwrap();
        assert_eq!(req.method_type, PaymentMethodType::BankTransfer);
        assert!(req.is_active);
    }

    #[test]
    fn test_unknown_payment_type_is_rejected() {
        let parsed: Result<CreatePaymentMethodRequest, _> =
            serde_json::from_str(r#"{"type":"BITCOIN"}"#);
        assert!(parsed.is_err());
    }
}
