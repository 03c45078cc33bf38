//! 支付方式服务：每种类型在同一餐厅只能有一个未删除的记录

use crate::{
    cache::{keys, CacheFacade},
    error::AppError,
    models::payment::{CreatePaymentMethodRequest, PaymentMethod, UpdatePaymentMethodRequest},
    repository::PaymentMethodStore,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct PaymentMethodService {
    payments: Arc<dyn PaymentMethodStore>,
    cache: CacheFacade,
}

impl PaymentMethodService {
    pub fn new(payments: Arc<dyn PaymentMethodStore>, cache: CacheFacade) -> Self {
        Self { payments, cache }
    }

    pub async fn list(&self, restaurant_id: Uuid) -> Result<Vec<PaymentMethod>, AppError> {
        self.cache
            .get_or_load(&keys::payment_methods(restaurant_id), || {
                self.payments.list(restaurant_id)
            })
            .await
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        req: CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, AppError> {
        req.validate()?;

        if self
            .payments
            .find_by_type(restaurant_id, req.method_type)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "Payment method of this type already exists".to_string(),
            ));
        }

        let method = self.payments.create(restaurant_id, &req).await?;
        self.invalidate(restaurant_id).await;

        tracing::info!(
            restaurant_id = %restaurant_id,
            payment_method_id = %method.id,
            "Payment method created"
        );
        Ok(method)
    }

    pub async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: UpdatePaymentMethodRequest,
    ) -> Result<PaymentMethod, AppError> {
        req.validate()?;

        let method = self
            .payments
            .update(restaurant_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Payment method"))?;
        self.invalidate(restaurant_id).await;

        Ok(method)
    }

    pub async fn delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.payments.soft_delete(restaurant_id, id).await? {
            return Err(AppError::not_found("Payment method"));
        }
        self.invalidate(restaurant_id).await;

        tracing::info!(
            restaurant_id = %restaurant_id,
            payment_method_id = %id,
            "Payment method deleted"
        );
        Ok(())
    }

    async fn invalidate(&self, restaurant_id: Uuid) {
        self.cache
            .invalidate_many(&keys::on_payment_method_write(restaurant_id))
            .await;
    }
}
