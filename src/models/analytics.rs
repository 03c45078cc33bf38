//! Dashboard and platform analytics models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operator dashboard summary, cached per restaurant
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_orders: i64,
    pub today_revenue: Decimal,
    pub pending_orders: i64,
    pub total_categories: i64,
    pub total_menu_items: i64,
    pub active_payment_methods: i64,
}

/// Per-restaurant revenue line for the super-admin overview
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRevenue {
    pub restaurant_id: Uuid,
    pub name: String,
    pub slug: String,
    pub order_count: i64,
    pub revenue: Decimal,
}

/// Super-admin platform overview
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_restaurants: i64,
    pub pending_restaurants: i64,
    pub approved_restaurants: i64,
    pub rejected_restaurants: i64,
    pub active_restaurants: i64,
    pub total_users: i64,
    pub total_orders: i64,
    pub orders_last_30_days: i64,
    pub total_revenue: Decimal,
    pub top_restaurants: Vec<RestaurantRevenue>,
}
