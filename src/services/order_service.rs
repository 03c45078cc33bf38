//! 订单服务：扫码下单、订单追踪、后台状态流转

use crate::{
    auth::clock::Clock,
    cache::{keys, CacheFacade},
    error::AppError,
    models::order::{
        generate_order_number, CreateOrderRequest, Order, OrderListQuery, OrderWithItems,
        UpdateOrderStatusRequest,
    },
    repository::{MenuItemStore, OrderRepository, PaymentMethodStore, RestaurantStore},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct OrderService {
    orders: OrderRepository,
    restaurants: Arc<dyn RestaurantStore>,
    menu_items: Arc<dyn MenuItemStore>,
    payments: Arc<dyn PaymentMethodStore>,
    cache: CacheFacade,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        restaurants: Arc<dyn RestaurantStore>,
        menu_items: Arc<dyn MenuItemStore>,
        payments: Arc<dyn PaymentMethodStore>,
        cache: CacheFacade,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            restaurants,
            menu_items,
            payments,
            cache,
            clock,
        }
    }

    /// 顾客下单
    ///
    /// `totalAmount` 按客户端提交的值保存。
    pub async fn create(&self, req: CreateOrderRequest) -> Result<OrderWithItems, AppError> {
        req.validate()?;

        let restaurant = self
            .restaurants
            .find_by_slug(req.restaurant_slug.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant"))?;
        if !restaurant.is_open_for_orders() {
            return Err(AppError::BadRequest(
                "Restaurant is not accepting orders".to_string(),
            ));
        }

        if let Some(payment_method_id) = req.payment_method_id {
            let usable = self
                .payments
                .find(restaurant.id, payment_method_id)
                .await?
                .map(|m| m.is_active)
                .unwrap_or(false);
            if !usable {
                return Err(AppError::BadRequest("Invalid payment method".to_string()));
            }
        }

        for line in &req.items {
            let available = self
                .menu_items
                .find(restaurant.id, line.menu_item_id)
                .await?
                .map(|item| item.is_available)
                .unwrap_or(false);
            if !available {
                return Err(AppError::BadRequest(format!(
                    "Menu item {} is not available",
                    line.menu_item_id
                )));
            }
        }

        let order_number = generate_order_number(self.clock.now());
        let order = self.orders.create(&restaurant, &req, &order_number).await?;
        self.invalidate(restaurant.id).await;

        tracing::info!(
            restaurant_id = %restaurant.id,
            order_number = %order.order.order_number,
            items = order.items.len(),
            "Order placed"
        );
        Ok(order)
    }

    pub async fn track(&self, order_number: &str) -> Result<OrderWithItems, AppError> {
        self.orders
            .find_by_number(order_number)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))
    }

    pub async fn list(
        &self,
        restaurant_id: Uuid,
        query: &OrderListQuery,
    ) -> Result<Vec<Order>, AppError> {
        self.orders.list(restaurant_id, query).await
    }

    pub async fn get(&self, restaurant_id: Uuid, id: Uuid) -> Result<OrderWithItems, AppError> {
        self.orders
            .find(restaurant_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))
    }

    pub async fn update_status(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        req: UpdateOrderStatusRequest,
    ) -> Result<Order, AppError> {
        if req.status.is_none() && req.payment_status.is_none() {
            return Err(AppError::validation("status or paymentStatus is required"));
        }

        let order = self
            .orders
            .update_status(restaurant_id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;
        self.invalidate(restaurant_id).await;

        tracing::info!(
            restaurant_id = %restaurant_id,
            order_id = %id,
            status = ?order.status,
            payment_status = ?order.payment_status,
            "Order status updated"
        );
        Ok(order)
    }

    async fn invalidate(&self, restaurant_id: Uuid) {
        self.cache
            .invalidate_many(&keys::on_order_write(restaurant_id))
            .await;
    }
}
