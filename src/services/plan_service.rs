//! 订阅套餐（公开列表带缓存）

use crate::{
    cache::{keys, CacheFacade},
    error::AppError,
    models::plan::{CreatePlanRequest, SubscriptionPlan, UpdatePlanRequest},
    repository::PlanRepository,
};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

pub struct PlanService {
    repo: PlanRepository,
    cache: CacheFacade,
}

impl PlanService {
    pub fn new(repo: PlanRepository, cache: CacheFacade) -> Self {
        Self { repo, cache }
    }

    pub async fn list(&self) -> Result<Vec<SubscriptionPlan>, AppError> {
        self.cache
            .get_or_load(keys::SUBSCRIPTION_PLANS, || self.repo.list_active())
            .await
    }

    pub async fn create(&self, req: CreatePlanRequest) -> Result<SubscriptionPlan, AppError> {
        req.validate()?;
        if req.price < Decimal::ZERO {
            return Err(AppError::validation("Price cannot be negative"));
        }

        let plan = self.repo.create(&req).await?;
        self.invalidate().await;
        Ok(plan)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdatePlanRequest,
    ) -> Result<SubscriptionPlan, AppError> {
        req.validate()?;
        if req.price.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::validation("Price cannot be negative"));
        }

        let plan = self
            .repo
            .update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription plan"))?;
        self.invalidate().await;
        Ok(plan)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Subscription plan"));
        }
        self.invalidate().await;
        Ok(())
    }

    async fn invalidate(&self) {
        self.cache.invalidate_many(&keys::on_plan_write()).await;
    }
}
