//! Aggregate queries for the operator dashboard and the platform overview

use crate::{
    error::AppError,
    models::analytics::{AnalyticsOverview, DashboardSummary, RestaurantRevenue},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct AnalyticsRepository {
    db: PgPool,
}

impl AnalyticsRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 营业额只统计已支付且未取消的订单
    pub async fn dashboard_summary(
        &self,
        restaurant_id: Uuid,
        day_start: DateTime<Utc>,
    ) -> Result<DashboardSummary, AppError> {
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM orders
                  WHERE restaurant_id = $1 AND created_at >= $2) AS today_orders,
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders
                  WHERE restaurant_id = $1 AND created_at >= $2
                    AND payment_status = 'PAID' AND status <> 'CANCELLED') AS today_revenue,
                (SELECT COUNT(*) FROM orders
                  WHERE restaurant_id = $1 AND status = 'PENDING') AS pending_orders,
                (SELECT COUNT(*) FROM categories
                  WHERE restaurant_id = $1 AND deleted_at IS NULL) AS total_categories,
                (SELECT COUNT(*) FROM menu_items
                  WHERE restaurant_id = $1 AND deleted_at IS NULL) AS total_menu_items,
                (SELECT COUNT(*) FROM payment_methods
                  WHERE restaurant_id = $1 AND deleted_at IS NULL AND is_active) AS active_payment_methods
            "#,
        )
        .bind(restaurant_id)
        .bind(day_start)
        .fetch_one(&self.db)
        .await?;

        Ok(summary)
    }

    pub async fn overview(&self, since: DateTime<Utc>) -> Result<AnalyticsOverview, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM restaurants) AS total_restaurants,
                (SELECT COUNT(*) FROM restaurants WHERE status = 'PENDING') AS pending_restaurants,
                (SELECT COUNT(*) FROM restaurants WHERE status = 'APPROVED') AS approved_restaurants,
                (SELECT COUNT(*) FROM restaurants WHERE status = 'REJECTED') AS rejected_restaurants,
                (SELECT COUNT(*) FROM restaurants
                  WHERE status = 'APPROVED' AND is_active) AS active_restaurants,
                (SELECT COUNT(*) FROM users WHERE deleted_at IS NULL) AS total_users,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM orders WHERE created_at >= $1) AS orders_last_30_days,
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders
                  WHERE payment_status = 'PAID' AND status <> 'CANCELLED') AS total_revenue
            "#,
        )
        .bind(since)
        .fetch_one(&self.db)
        .await?;

        let top_restaurants = sqlx::query_as::<_, RestaurantRevenue>(
            r#"
            SELECT
                r.id AS restaurant_id,
                r.name,
                r.slug,
                COUNT(o.id) AS order_count,
                COALESCE(SUM(o.total_amount) FILTER (
                    WHERE o.payment_status = 'PAID' AND o.status <> 'CANCELLED'
                ), 0) AS revenue
            FROM restaurants r
            LEFT JOIN orders o ON o.restaurant_id = r.id
            GROUP BY r.id, r.name, r.slug
            ORDER BY revenue DESC, order_count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(AnalyticsOverview {
            total_restaurants: row.try_get("total_restaurants")?,
            pending_restaurants: row.try_get("pending_restaurants")?,
            approved_restaurants: row.try_get("approved_restaurants")?,
            rejected_restaurants: row.try_get("rejected_restaurants")?,
            active_restaurants: row.try_get("active_restaurants")?,
            total_users: row.try_get("total_users")?,
            total_orders: row.try_get("total_orders")?,
            orders_last_30_days: row.try_get("orders_last_30_days")?,
            total_revenue: row.try_get::<Decimal, _>("total_revenue")?,
            top_restaurants,
        })
    }
}
