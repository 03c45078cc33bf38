//! Restaurant (tenant) repository

use crate::{
    error::AppError,
    models::restaurant::{
        AdminUpdateRestaurantRequest, PlanLimits, Restaurant, RestaurantListQuery,
        SubscriptionPackage, TenantLimits, UpdateSettingsRequest,
    },
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError>;

    /// 一个用户可以拥有多家餐厅；取最早创建的一家作为登录时的租户
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Restaurant>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, AppError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// 套餐与覆盖值，用于计算分类 / 菜品上限
    async fn tenant_limits(&self, id: Uuid) -> Result<Option<TenantLimits>, AppError>;

    async fn update_settings(
        &self,
        id: Uuid,
        req: &UpdateSettingsRequest,
    ) -> Result<Option<Restaurant>, AppError>;

    async fn admin_update(
        &self,
        id: Uuid,
        req: &AdminUpdateRestaurantRequest,
    ) -> Result<Option<Restaurant>, AppError>;

    async fn list(&self, query: &RestaurantListQuery) -> Result<Vec<Restaurant>, AppError>;
}

pub struct PgRestaurantStore {
    db: PgPool,
}

impl PgRestaurantStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RestaurantStore for PgRestaurantStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(restaurant)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE owner_id = $1 ORDER BY created_at, id LIMIT 1",
        )
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(restaurant)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, AppError> {
        let restaurant =
            sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.db)
                .await?;

        Ok(restaurant)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM restaurants WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    async fn tenant_limits(&self, id: Uuid) -> Result<Option<TenantLimits>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                r.package,
                r.max_categories,
                r.max_menu_items,
                p.id IS NOT NULL AS has_plan,
                p.max_categories AS plan_max_categories,
                p.max_menu_items AS plan_max_menu_items
            FROM restaurants r
            LEFT JOIN subscription_plans p ON p.package = r.package AND p.is_active
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let has_plan: bool = row.try_get("has_plan")?;
        let plan = if has_plan {
            Some(PlanLimits {
                max_categories: row.try_get("plan_max_categories")?,
                max_menu_items: row.try_get("plan_max_menu_items")?,
            })
        } else {
            None
        };

        Ok(Some(TenantLimits {
            package: row.try_get::<SubscriptionPackage, _>("package")?,
            max_categories: row.try_get("max_categories")?,
            max_menu_items: row.try_get("max_menu_items")?,
            plan,
        }))
    }

    async fn update_settings(
        &self,
        id: Uuid,
        req: &UpdateSettingsRequest,
    ) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            UPDATE restaurants
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                logo = COALESCE($6, logo),
                tax_percent = COALESCE($7, tax_percent),
                service_charge_percent = COALESCE($8, service_charge_percent),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.phone)
        .bind(&req.logo)
        .bind(req.tax_percent)
        .bind(req.service_charge_percent)
        .fetch_optional(&self.db)
        .await?;

        Ok(restaurant)
    }

    async fn admin_update(
        &self,
        id: Uuid,
        req: &AdminUpdateRestaurantRequest,
    ) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            UPDATE restaurants
            SET
                status = COALESCE($2, status),
                is_active = COALESCE($3, is_active),
                package = COALESCE($4, package),
                max_categories = COALESCE($5, max_categories),
                max_menu_items = COALESCE($6, max_menu_items),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.status)
        .bind(req.is_active)
        .bind(req.package)
        .bind(req.max_categories)
        .bind(req.max_menu_items)
        .fetch_optional(&self.db)
        .await?;

        Ok(restaurant)
    }

    async fn list(&self, query: &RestaurantListQuery) -> Result<Vec<Restaurant>, AppError> {
        let search = query.search.as_ref().map(|s| format!("%{}%", s.trim()));

        let restaurants = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT * FROM restaurants
            WHERE ($1::restaurant_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR slug ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.status)
        .bind(search)
        .bind(query.limit.clamp(1, 200))
        .bind(query.offset.max(0))
        .fetch_all(&self.db)
        .await?;

        Ok(restaurants)
    }
}
