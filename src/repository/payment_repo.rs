//! Payment method repository

use super::unique_violation;
use crate::{
    error::AppError,
    models::payment::{
        CreatePaymentMethodRequest, PaymentMethod, PaymentMethodType, UpdatePaymentMethodRequest,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
    /// 未删除的支付方式
    async fn list(&self, restaurant_id: Uuid) -> Result<Vec<PaymentMethod>, AppError>;

    async fn find(&self, restaurant_id: Uuid, id: Uuid)
        -> Result<Option<PaymentMethod>, AppError>;

    async fn find_by_type(
        &self,
        restaurant_id: Uuid,
        method_type: PaymentMethodType,
    ) -> Result<Option<PaymentMethod>, AppError>;

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, AppError>;

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdatePaymentMethodRequest,
    ) -> Result<Option<PaymentMethod>, AppError>;

    /// 设置 deleted_at 并停用
    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgPaymentMethodStore {
    db: PgPool,
}

impl PgPaymentMethodStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentMethodStore for PgPaymentMethodStore {
    async fn list(&self, restaurant_id: Uuid) -> Result<Vec<PaymentMethod>, AppError> {
        let methods = sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT * FROM payment_methods
            WHERE restaurant_id = $1 AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(methods)
    }

    async fn find(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<PaymentMethod>, AppError> {
        let method = sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT * FROM payment_methods
            WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(method)
    }

    async fn find_by_type(
        &self,
        restaurant_id: Uuid,
        method_type: PaymentMethodType,
    ) -> Result<Option<PaymentMethod>, AppError> {
        let method = sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT * FROM payment_methods
            WHERE restaurant_id = $1 AND method_type = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(restaurant_id)
        .bind(method_type)
        .fetch_optional(&self.db)
        .await?;

        Ok(method)
    }

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, AppError> {
        let method = sqlx::query_as::<_, PaymentMethod>(
            r#"
            INSERT INTO payment_methods (
                restaurant_id, method_type, account_name, account_number, qr_image, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(req.method_type)
        .bind(&req.account_name)
        .bind(&req.account_number)
        .bind(&req.qr_image)
        .bind(req.is_active)
        .fetch_one(&self.db)
        .await
        .map_err(|e| unique_violation(e, "Payment method of this type already exists"))?;

        Ok(method)
    }

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdatePaymentMethodRequest,
    ) -> Result<Option<PaymentMethod>, AppError> {
        let method = sqlx::query_as::<_, PaymentMethod>(
            r#"
            UPDATE payment_methods
            SET
                account_name = COALESCE($3, account_name),
                account_number = COALESCE($4, account_number),
                qr_image = COALESCE($5, qr_image),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .bind(&req.account_name)
        .bind(&req.account_number)
        .bind(&req.qr_image)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(method)
    }

    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_methods
            SET deleted_at = NOW(), is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
