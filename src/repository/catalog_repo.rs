//! Catalog repository: categories and menu items
//!
//! 两张表都是软删除，所有默认查询都过滤 `deleted_at IS NULL`。

use crate::{
    error::AppError,
    models::catalog::{
        Category, CreateCategoryRequest, CreateMenuItemRequest, MenuItem, UpdateCategoryRequest,
        UpdateMenuItemRequest,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self, restaurant_id: Uuid) -> Result<Vec<Category>, AppError>;

    async fn find(&self, restaurant_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError>;

    async fn count(&self, restaurant_id: Uuid) -> Result<i64, AppError>;

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreateCategoryRequest,
    ) -> Result<Category, AppError>;

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Option<Category>, AppError>;

    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait MenuItemStore: Send + Sync {
    async fn list(
        &self,
        restaurant_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Vec<MenuItem>, AppError>;

    async fn find(&self, restaurant_id: Uuid, id: Uuid) -> Result<Option<MenuItem>, AppError>;

    async fn count(&self, restaurant_id: Uuid) -> Result<i64, AppError>;

    async fn count_in_category(
        &self,
        restaurant_id: Uuid,
        category_id: Uuid,
    ) -> Result<i64, AppError>;

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreateMenuItemRequest,
    ) -> Result<MenuItem, AppError>;

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdateMenuItemRequest,
    ) -> Result<Option<MenuItem>, AppError>;

    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgCategoryStore {
    db: PgPool,
}

impl PgCategoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list(&self, restaurant_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE restaurant_id = $1 AND deleted_at IS NULL
            ORDER BY sort_order, name
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    async fn find(&self, restaurant_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    async fn count(&self, restaurant_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE restaurant_id = $1 AND deleted_at IS NULL",
        )
        .bind(restaurant_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (restaurant_id, name, description, sort_order)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.sort_order)
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                sort_order = COALESCE($5, sort_order),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE categories
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

pub struct PgMenuItemStore {
    db: PgPool,
}

impl PgMenuItemStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MenuItemStore for PgMenuItemStore {
    async fn list(
        &self,
        restaurant_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Vec<MenuItem>, AppError> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT * FROM menu_items
            WHERE restaurant_id = $1
              AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR category_id = $2)
            ORDER BY sort_order, name
            "#,
        )
        .bind(restaurant_id)
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn find(&self, restaurant_id: Uuid, id: Uuid) -> Result<Option<MenuItem>, AppError> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(item)
    }

    async fn count(&self, restaurant_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_items WHERE restaurant_id = $1 AND deleted_at IS NULL",
        )
        .bind(restaurant_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn count_in_category(
        &self,
        restaurant_id: Uuid,
        category_id: Uuid,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM menu_items
            WHERE restaurant_id = $1 AND category_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(restaurant_id)
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn create(
        &self,
        restaurant_id: Uuid,
        req: &CreateMenuItemRequest,
    ) -> Result<MenuItem, AppError> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (
                restaurant_id, category_id, name, description, price, image, is_available, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(restaurant_id)
        .bind(req.category_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.image)
        .bind(req.is_available)
        .bind(req.sort_order)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdateMenuItemRequest,
    ) -> Result<Option<MenuItem>, AppError> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET
                category_id = COALESCE($3, category_id),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                price = COALESCE($6, price),
                image = COALESCE($7, image),
                is_available = COALESCE($8, is_available),
                sort_order = COALESCE($9, sort_order),
                updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .bind(req.category_id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.image)
        .bind(req.is_available)
        .bind(req.sort_order)
        .fetch_optional(&self.db)
        .await?;

        Ok(item)
    }

    async fn soft_delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET deleted_at = NOW(), is_available = FALSE, updated_at = NOW()
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
