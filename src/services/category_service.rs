//! 分类服务：套餐上限校验、读穿透缓存、写后失效

use crate::{
    cache::{keys, CacheFacade},
    error::AppError,
    models::catalog::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    repository::{CategoryStore, MenuItemStore, RestaurantStore},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    menu_items: Arc<dyn MenuItemStore>,
    restaurants: Arc<dyn RestaurantStore>,
    cache: CacheFacade,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        menu_items: Arc<dyn MenuItemStore>,
        restaurants: Arc<dyn RestaurantStore>,
        cache: CacheFacade,
    ) -> Self {
        Self {
            categories,
            menu_items,
            restaurants,
            cache,
        }
    }

    pub async fn list(&self, restaurant_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.cache
            .get_or_load(&keys::categories(restaurant_id), || {
                self.categories.list(restaurant_id)
            })
            .await
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        req: CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        req.validate()?;

        let limits = self
            .restaurants
            .tenant_limits(restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))?;

        if let Some(limit) = limits.category_limit() {
            let current = self.categories.count(restaurant_id).await?;
            if current >= limit {
                tracing::info!(
                    restaurant_id = %restaurant_id,
                    limit,
                    "Category limit reached"
                );
                return Err(AppError::ForbiddenWith(format!(
                    "Category limit reached ({} on the {} package). Upgrade your plan to add more.",
                    limit,
                    limits.package.as_str()
                )));
            }
        }

        let category = self.categories.create(restaurant_id, &req).await?;
        self.invalidate(restaurant_id).await;

        tracing::info!(restaurant_id = %restaurant_id, category_id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        req.validate()?;

        let category = self
            .categories
            .update(restaurant_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;
        self.invalidate(restaurant_id).await;

        Ok(category)
    }

    /// 软删除；仍有菜品的分类不能删除
    pub async fn delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.categories.find(restaurant_id, id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }
        if self.menu_items.count_in_category(restaurant_id, id).await? > 0 {
            return Err(AppError::BadRequest(
                "Category still has menu items. Move or delete them first.".to_string(),
            ));
        }

        if !self.categories.soft_delete(restaurant_id, id).await? {
            return Err(AppError::not_found("Category"));
        }
        self.invalidate(restaurant_id).await;

        tracing::info!(restaurant_id = %restaurant_id, category_id = %id, "Category deleted");
        Ok(())
    }

    async fn invalidate(&self, restaurant_id: Uuid) {
        self.cache
            .invalidate_many(&keys::on_category_write(restaurant_id))
            .await;
    }
}
