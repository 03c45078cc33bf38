//! Subscription plan repository

use super::unique_violation;
use crate::{
    error::AppError,
    models::plan::{CreatePlanRequest, SubscriptionPlan, UpdatePlanRequest},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PlanRepository {
    db: PgPool,
}

impl PlanRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_active(&self) -> Result<Vec<SubscriptionPlan>, AppError> {
        let plans = sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans WHERE is_active ORDER BY price",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn create(&self, req: &CreatePlanRequest) -> Result<SubscriptionPlan, AppError> {
        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            INSERT INTO subscription_plans (
                name, package, price, description, max_categories, max_menu_items
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.package)
        .bind(req.price)
        .bind(&req.description)
        .bind(req.max_categories)
        .bind(req.max_menu_items)
        .fetch_one(&self.db)
        .await
        .map_err(|e| unique_violation(e, "A plan for this package already exists"))?;

        Ok(plan)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdatePlanRequest,
    ) -> Result<Option<SubscriptionPlan>, AppError> {
        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            UPDATE subscription_plans
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                description = COALESCE($4, description),
                max_categories = COALESCE($5, max_categories),
                max_menu_items = COALESCE($6, max_menu_items),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(req.price)
        .bind(&req.description)
        .bind(req.max_categories)
        .bind(req.max_menu_items)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(plan)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
