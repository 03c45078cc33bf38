//! 餐厅服务：设置、公开菜单、超级管理员的租户管理

use crate::{
    cache::{keys, CacheFacade},
    error::AppError,
    models::restaurant::{
        AdminUpdateRestaurantRequest, MenuSection, PublicMenu, Restaurant, RestaurantListQuery,
        UpdateSettingsRequest,
    },
    repository::{CategoryStore, MenuItemStore, PaymentMethodStore, RestaurantStore},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantStore>,
    categories: Arc<dyn CategoryStore>,
    menu_items: Arc<dyn MenuItemStore>,
    payments: Arc<dyn PaymentMethodStore>,
    cache: CacheFacade,
}

impl RestaurantService {
    pub fn new(
        restaurants: Arc<dyn RestaurantStore>,
        categories: Arc<dyn CategoryStore>,
        menu_items: Arc<dyn MenuItemStore>,
        payments: Arc<dyn PaymentMethodStore>,
        cache: CacheFacade,
    ) -> Self {
        Self {
            restaurants,
            categories,
            menu_items,
            payments,
            cache,
        }
    }

    pub async fn settings(&self, restaurant_id: Uuid) -> Result<Restaurant, AppError> {
        self.restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))
    }

    pub async fn update_settings(
        &self,
        restaurant_id: Uuid,
        req: UpdateSettingsRequest,
    ) -> Result<Restaurant, AppError> {
        req.validate()?;
        for percent in [req.tax_percent, req.service_charge_percent]
            .into_iter()
            .flatten()
        {
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(AppError::validation("Percentage must be between 0 and 100"));
            }
        }

        let restaurant = self
            .restaurants
            .update_settings(restaurant_id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))?;
        self.cache
            .invalidate_many(&keys::on_settings_write(restaurant_id))
            .await;

        Ok(restaurant)
    }

    /// 扫码点餐用的公开菜单；未审批或停用的餐厅按不存在处理
    pub async fn public_menu(&self, slug: &str) -> Result<PublicMenu, AppError> {
        let restaurant = self
            .restaurants
            .find_by_slug(slug)
            .await?
            .filter(Restaurant::is_open_for_orders)
            .ok_or_else(|| AppError::not_found("Restaurant"))?;

        let restaurant_id = restaurant.id;
        self.cache
            .get_or_load(&keys::public_menu(restaurant_id), || {
                self.build_public_menu(restaurant)
            })
            .await
    }

    async fn build_public_menu(&self, restaurant: Restaurant) -> Result<PublicMenu, AppError> {
        let categories = self.categories.list(restaurant.id).await?;
        let mut items = self.menu_items.list(restaurant.id, None).await?;
        items.retain(|item| item.is_available);

        let sections = categories
            .into_iter()
            .filter(|c| c.is_active)
            .map(|category| {
                let items = items
                    .iter()
                    .filter(|item| item.category_id == category.id)
                    .cloned()
                    .collect();
                MenuSection { category, items }
            })
            .collect();

        let payment_methods = self
            .payments
            .list(restaurant.id)
            .await?
            .into_iter()
            .filter(|m| m.is_active)
            .collect();

        Ok(PublicMenu {
            restaurant,
            categories: sections,
            payment_methods,
        })
    }

    pub async fn admin_list(
        &self,
        query: &RestaurantListQuery,
    ) -> Result<Vec<Restaurant>, AppError> {
        self.restaurants.list(query).await
    }

    /// 审批 / 拒绝 / 停用 / 调整套餐
    pub async fn admin_update(
        &self,
        id: Uuid,
        req: AdminUpdateRestaurantRequest,
    ) -> Result<Restaurant, AppError> {
        if [req.max_categories, req.max_menu_items]
            .into_iter()
            .flatten()
            .any(|limit| limit < 0)
        {
            return Err(AppError::validation("Limits cannot be negative"));
        }

        let restaurant = self
            .restaurants
            .admin_update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))?;
        self.cache
            .invalidate_many(&keys::on_admin_restaurant_write(id))
            .await;

        tracing::info!(
            restaurant_id = %id,
            status = ?restaurant.status,
            is_active = restaurant.is_active,
            "Restaurant updated by admin"
        );
        Ok(restaurant)
    }
}
