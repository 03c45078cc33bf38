//! Restaurant (tenant) domain models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::catalog::{Category, MenuItem};
use super::payment::PaymentMethod;

/// 餐厅审批状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "restaurant_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestaurantStatus {
    Pending,
    Approved,
    Rejected,
}

/// 订阅套餐
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "subscription_package", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPackage {
    Free,
    Basic,
    Pro,
    Enterprise,
}

impl SubscriptionPackage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPackage::Free => "FREE",
            SubscriptionPackage::Basic => "BASIC",
            SubscriptionPackage::Pro => "PRO",
            SubscriptionPackage::Enterprise => "ENTERPRISE",
        }
    }

    /// 没有套餐配置时的默认分类上限（None 表示不限）
    pub fn default_category_limit(&self) -> Option<i64> {
        match self {
            SubscriptionPackage::Free => Some(5),
            SubscriptionPackage::Basic => Some(10),
            SubscriptionPackage::Pro => Some(30),
            SubscriptionPackage::Enterprise => None,
        }
    }

    /// 没有套餐配置时的默认菜品上限（None 表示不限）
    pub fn default_menu_item_limit(&self) -> Option<i64> {
        match self {
            SubscriptionPackage::Free => Some(20),
            SubscriptionPackage::Basic => Some(50),
            SubscriptionPackage::Pro => Some(200),
            SubscriptionPackage::Enterprise => None,
        }
    }
}

/// Restaurant (tenant)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub status: RestaurantStatus,
    pub is_active: bool,
    pub package: SubscriptionPackage,
    pub max_categories: Option<i32>,
    pub max_menu_items: Option<i32>,
    pub tax_percent: Decimal,
    pub service_charge_percent: Decimal,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// 是否可以对外接单
    pub fn is_open_for_orders(&self) -> bool {
        self.status == RestaurantStatus::Approved && self.is_active
    }
}

/// Insert payload for a new restaurant
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub slug: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub package: SubscriptionPackage,
}

/// Limits configured on the tenant's subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct PlanLimits {
    pub max_categories: Option<i32>,
    pub max_menu_items: Option<i32>,
}

/// Everything needed to resolve a tenant's catalog limits
#[derive(Debug, Clone)]
pub struct TenantLimits {
    pub package: SubscriptionPackage,
    pub max_categories: Option<i32>,
    pub max_menu_items: Option<i32>,
    /// None when no active plan row exists for the package
    pub plan: Option<PlanLimits>,
}

impl TenantLimits {
    pub fn category_limit(&self) -> Option<i64> {
        resolve_limit(
            self.max_categories,
            self.plan.map(|p| p.max_categories),
            self.package.default_category_limit(),
        )
    }

    pub fn menu_item_limit(&self) -> Option<i64> {
        resolve_limit(
            self.max_menu_items,
            self.plan.map(|p| p.max_menu_items),
            self.package.default_menu_item_limit(),
        )
    }
}

/// 上限解析顺序：租户覆盖值 → 套餐配置 → 套餐默认值
///
/// 返回 None 表示不限。
pub fn resolve_limit(
    tenant_override: Option<i32>,
    plan_limit: Option<Option<i32>>,
    fallback: Option<i64>,
) -> Option<i64> {
    if let Some(limit) = tenant_override {
        return Some(i64::from(limit));
    }
    match plan_limit {
        Some(limit) => limit.map(i64::from),
        None => fallback,
    }
}

/// 餐厅设置更新请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 120, message = "Restaurant name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub tax_percent: Option<Decimal>,
    pub service_charge_percent: Option<Decimal>,
}

/// 超级管理员对租户的管理操作
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateRestaurantRequest {
    pub status: Option<RestaurantStatus>,
    pub is_active: Option<bool>,
    pub package: Option<SubscriptionPackage>,
    pub max_categories: Option<i32>,
    pub max_menu_items: Option<i32>,
}

/// 租户列表过滤
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantListQuery {
    pub status: Option<RestaurantStatus>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 公开菜单中的分类（含菜品）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<MenuItem>,
}

/// 扫码点餐页面使用的公开菜单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMenu {
    pub restaurant: Restaurant,
    pub categories: Vec<MenuSection>,
    pub payment_methods: Vec<PaymentMethod>,
}
