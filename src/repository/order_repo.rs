//! Order repository

use crate::{
    error::AppError,
    models::{
        order::{
            CreateOrderRequest, Order, OrderItem, OrderListQuery, OrderWithItems,
            UpdateOrderStatusRequest,
        },
        restaurant::Restaurant,
        user::{User, UserRole},
    },
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct OrderRepository {
    db: PgPool,
}

impl OrderRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 单个事务内：确定顾客（必要时创建访客用户）、写订单、按顺序写明细
    pub async fn create(
        &self,
        restaurant: &Restaurant,
        req: &CreateOrderRequest,
        order_number: &str,
    ) -> Result<OrderWithItems, AppError> {
        let mut tx = self.db.begin().await?;

        let customer_id = Self::resolve_customer(&mut tx, restaurant, req).await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                order_number, restaurant_id, customer_id, customer_name,
                table_number, payment_method_id, total_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(order_number)
        .bind(restaurant.id)
        .bind(customer_id)
        .bind(req.customer_name.trim())
        .bind(&req.table_number)
        .bind(req.payment_method_id)
        .bind(req.total_amount)
        .bind(&req.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(req.items.len());
        for (position, line) in req.items.iter().enumerate() {
            let item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, position, quantity, price, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(order.id)
            .bind(line.menu_item_id)
            .bind(position as i32)
            .bind(line.quantity)
            .bind(line.price)
            .bind(&line.notes)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// 邮箱属于已有顾客则复用；否则新建访客顾客
    ///
    /// 邮箱被管理员账号占用时不会挂到该账号上，改用生成的访客邮箱。
    async fn resolve_customer(
        tx: &mut Transaction<'_, Postgres>,
        restaurant: &Restaurant,
        req: &CreateOrderRequest,
    ) -> Result<Uuid, AppError> {
        let mut email = None;

        if let Some(supplied) = req.customer_email.as_deref().map(str::trim) {
            let existing = sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE lower(email) = lower($1)",
            )
            .bind(supplied)
            .fetch_optional(&mut **tx)
            .await?;

            match existing {
                Some(user) if user.role == UserRole::Customer && user.deleted_at.is_none() => {
                    return Ok(user.id);
                }
                Some(user) => {
                    tracing::info!(
                        user_id = %user.id,
                        "Checkout email is held by a non-reusable account, using a guest email"
                    );
                }
                None => email = Some(supplied.to_string()),
            }
        }

        let email = email.unwrap_or_else(|| guest_email(&restaurant.slug));

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, phone, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(req.customer_name.trim())
        .bind(email)
        .bind(&req.customer_phone)
        .bind(UserRole::Customer)
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    pub async fn find(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<OrderWithItems>, AppError> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND restaurant_id = $2",
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.db)
        .await?;

        self.with_items(order).await
    }

    /// 顾客按订单号追踪（公开接口）
    pub async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderWithItems>, AppError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_optional(&self.db)
            .await?;

        self.with_items(order).await
    }

    async fn with_items(&self, order: Option<Order>) -> Result<Option<OrderWithItems>, AppError> {
        let Some(order) = order else {
            return Ok(None);
        };
        let items = self.items(order.id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    pub async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY position",
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    pub async fn list(
        &self,
        restaurant_id: Uuid,
        query: &OrderListQuery,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE restaurant_id = $1
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::payment_status IS NULL OR payment_status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(restaurant_id)
        .bind(query.status)
        .bind(query.payment_status)
        .bind(query.limit.clamp(1, 200))
        .bind(query.offset.max(0))
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    pub async fn update_status(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: &UpdateOrderStatusRequest,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET
                status = COALESCE($3, status),
                payment_status = COALESCE($4, payment_status),
                updated_at = NOW()
            WHERE id = $1 AND restaurant_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(restaurant_id)
        .bind(req.status)
        .bind(req.payment_status)
        .fetch_optional(&self.db)
        .await?;

        Ok(order)
    }
}

/// 访客邮箱：guest_<8 位随机>@<slug>.guest
pub fn guest_email(slug: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("guest_{}@{}.guest", &simple[..8], slug)
}
