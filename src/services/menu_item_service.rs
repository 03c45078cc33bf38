//! 菜品服务

use crate::{
    cache::{keys, CacheFacade},
    error::AppError,
    models::catalog::{CreateMenuItemRequest, MenuItem, MenuItemQuery, UpdateMenuItemRequest},
    repository::{CategoryStore, MenuItemStore, RestaurantStore},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct MenuItemService {
    menu_items: Arc<dyn MenuItemStore>,
    categories: Arc<dyn CategoryStore>,
    restaurants: Arc<dyn RestaurantStore>,
    cache: CacheFacade,
}

impl MenuItemService {
    pub fn new(
        menu_items: Arc<dyn MenuItemStore>,
        categories: Arc<dyn CategoryStore>,
        restaurants: Arc<dyn RestaurantStore>,
        cache: CacheFacade,
    ) -> Self {
        Self {
            menu_items,
            categories,
            restaurants,
            cache,
        }
    }

    /// 缓存整张列表，按分类过滤在内存中完成
    pub async fn list(
        &self,
        restaurant_id: Uuid,
        query: &MenuItemQuery,
    ) -> Result<Vec<MenuItem>, AppError> {
        let items: Vec<MenuItem> = self
            .cache
            .get_or_load(&keys::menu_items(restaurant_id), || {
                self.menu_items.list(restaurant_id, None)
            })
            .await?;

        Ok(match query.category_id {
            Some(category_id) => items
                .into_iter()
                .filter(|item| item.category_id == category_id)
                .collect(),
            None => items,
        })
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        req: CreateMenuItemRequest,
    ) -> Result<MenuItem, AppError> {
        req.validate()?;
        self.ensure_category(restaurant_id, req.category_id).await?;

        let limits = self
            .restaurants
            .tenant_limits(restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))?;

        if let Some(limit) = limits.menu_item_limit() {
            let current = self.menu_items.count(restaurant_id).await?;
            if current >= limit {
                tracing::info!(
                    restaurant_id = %restaurant_id,
                    limit,
                    "Menu item limit reached"
                );
                return Err(AppError::ForbiddenWith(format!(
                    "Menu item limit reached ({} on the {} package). Upgrade your plan to add more.",
                    limit,
                    limits.package.as_str()
                )));
            }
        }

        let item = self.menu_items.create(restaurant_id, &req).await?;
        self.invalidate(restaurant_id).await;

        tracing::info!(restaurant_id = %restaurant_id, menu_item_id = %item.id, "Menu item created");
        Ok(item)
    }

    pub async fn update(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: UpdateMenuItemRequest,
    ) -> Result<MenuItem, AppError> {
        req.validate()?;
        if let Some(category_id) = req.category_id {
            self.ensure_category(restaurant_id, category_id).await?;
        }

        let item = self
            .menu_items
            .update(restaurant_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Menu item"))?;
        self.invalidate(restaurant_id).await;

        Ok(item)
    }

    pub async fn delete(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.menu_items.soft_delete(restaurant_id, id).await? {
            return Err(AppError::not_found("Menu item"));
        }
        self.invalidate(restaurant_id).await;

        tracing::info!(restaurant_id = %restaurant_id, menu_item_id = %id, "Menu item deleted");
        Ok(())
    }

    async fn ensure_category(&self, restaurant_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
        match self.categories.find(restaurant_id, category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest("Category does not exist".to_string())),
        }
    }

    async fn invalidate(&self, restaurant_id: Uuid) {
        self.cache
            .invalidate_many(&keys::on_menu_item_write(restaurant_id))
            .await;
    }
}
