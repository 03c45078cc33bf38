//! HTTP 中间件与应用状态
//! 请求追踪（trace_id / request_id、指标、访问日志）

use crate::{
    auth::{clock::Clock, jwt::TokenService, password::PasswordHasher, session::SessionCookies},
    cache::CacheFacade,
    config::AppConfig,
    error::AppError,
    repository::{
        AnalyticsRepository, AnnouncementRepository, CategoryStore, MenuItemStore,
        OrderRepository, PaymentMethodStore, PgCategoryStore, PgMenuItemStore,
        PgPaymentMethodStore, PgRefreshTokenStore, PgRestaurantStore, PgUserStore,
        PlanRepository, RefreshTokenStore, RestaurantStore, UserStore,
    },
    services::{
        AnalyticsService, AnnouncementService, AuthService, CategoryService, MenuItemService,
        OrderService, PaymentMethodService, PlanService, RestaurantService,
    },
};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 可替换的存储实现（测试中使用内存版本）
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub restaurants: Arc<dyn RestaurantStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub menu_items: Arc<dyn MenuItemStore>,
    pub payment_methods: Arc<dyn PaymentMethodStore>,
}

impl Stores {
    pub fn postgres(db: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(db.clone())),
            restaurants: Arc::new(PgRestaurantStore::new(db.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenStore::new(db.clone())),
            categories: Arc::new(PgCategoryStore::new(db.clone())),
            menu_items: Arc::new(PgMenuItemStore::new(db.clone())),
            payment_methods: Arc::new(PgPaymentMethodStore::new(db.clone())),
        }
    }
}

/// 应用状态
///
/// 以 `Arc<AppState>` 共享给所有请求；密钥、缓存句柄和时钟都在构造时传入。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: PgPool,
    pub cache: CacheFacade,
    pub tokens: Arc<TokenService>,
    pub cookies: SessionCookies,
    pub auth_service: Arc<AuthService>,
    pub category_service: Arc<CategoryService>,
    pub menu_item_service: Arc<MenuItemService>,
    pub payment_method_service: Arc<PaymentMethodService>,
    pub order_service: Arc<OrderService>,
    pub restaurant_service: Arc<RestaurantService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub plan_service: Arc<PlanService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: PgPool,
        cache: CacheFacade,
        clock: Arc<dyn Clock>,
        stores: Stores,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::from_config(&config.security, clock.clone())?);
        let cookies = SessionCookies::from_config(&config.security);
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);

        let auth_service = AuthService::new(
            stores.users.clone(),
            stores.restaurants.clone(),
            stores.refresh_tokens.clone(),
            tokens.clone(),
            hasher,
        );
        let category_service = CategoryService::new(
            stores.categories.clone(),
            stores.menu_items.clone(),
            stores.restaurants.clone(),
            cache.clone(),
        );
        let menu_item_service = MenuItemService::new(
            stores.menu_items.clone(),
            stores.categories.clone(),
            stores.restaurants.clone(),
            cache.clone(),
        );
        let payment_method_service =
            PaymentMethodService::new(stores.payment_methods.clone(), cache.clone());
        let order_service = OrderService::new(
            OrderRepository::new(db.clone()),
            stores.restaurants.clone(),
            stores.menu_items.clone(),
            stores.payment_methods.clone(),
            cache.clone(),
            clock.clone(),
        );
        let restaurant_service = RestaurantService::new(
            stores.restaurants.clone(),
            stores.categories.clone(),
            stores.menu_items.clone(),
            stores.payment_methods.clone(),
            cache.clone(),
        );
        let analytics_service =
            AnalyticsService::new(AnalyticsRepository::new(db.clone()), cache.clone(), clock);
        let announcement_service =
            AnnouncementService::new(AnnouncementRepository::new(db.clone()));
        let plan_service = PlanService::new(PlanRepository::new(db.clone()), cache.clone());

        Ok(Self {
            config,
            db,
            cache,
            tokens,
            cookies,
            auth_service: Arc::new(auth_service),
            category_service: Arc::new(category_service),
            menu_item_service: Arc::new(menu_item_service),
            payment_method_service: Arc::new(payment_method_service),
            order_service: Arc::new(order_service),
            restaurant_service: Arc::new(restaurant_service),
            analytics_service: Arc::new(analytics_service),
            announcement_service: Arc::new(announcement_service),
            plan_service: Arc::new(plan_service),
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let elapsed = start.elapsed();

        let status = response.status();
        metrics::counter!(
            "http_requests_total",
            "method" => method_label(method.as_str()),
            "status" => status_label(status.as_u16())
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

// 指标标签只使用静态字符串，避免基数爆炸
fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        _ => "OTHER",
    }
}

fn status_label(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400 => "400",
        401 => "401",
        403 => "403",
        404 => "404",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "test-trace-123".parse().unwrap());
        assert_eq!(extract_or_generate_trace_id(&headers), "test-trace-123");

        let headers = HeaderMap::new();
        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(Uuid::parse_str(&trace_id).is_ok());
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(method_label("PATCH"), "PATCH");
        assert_eq!(method_label("OPTIONS"), "OTHER");
        assert_eq!(status_label(201), "2xx");
        assert_eq!(status_label(307), "3xx");
        assert_eq!(status_label(403), "403");
        assert_eq!(status_label(422), "4xx");
        assert_eq!(status_label(503), "5xx");
    }
}
