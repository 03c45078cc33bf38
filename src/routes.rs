//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

use crate::{auth::middleware::page_guard, handlers, middleware::AppState};

/// 请求体上限
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// `/api` 下的所有接口；权限由各处理器的会话提取器决定
fn api_routes() -> Router<Arc<AppState>> {
    // 认证
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me));

    // 餐厅后台
    let operator_routes = Router::new()
        .route(
            "/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::category::update_category).delete(handlers::category::delete_category),
        )
        .route(
            "/menu-items",
            get(handlers::menu_item::list_menu_items).post(handlers::menu_item::create_menu_item),
        )
        .route(
            "/menu-items/{id}",
            put(handlers::menu_item::update_menu_item)
                .delete(handlers::menu_item::delete_menu_item),
        )
        .route(
            "/payment-methods",
            get(handlers::payment_method::list_payment_methods)
                .post(handlers::payment_method::create_payment_method),
        )
        .route(
            "/payment-methods/{id}",
            put(handlers::payment_method::update_payment_method)
                .delete(handlers::payment_method::delete_payment_method),
        )
        .route(
            "/orders",
            get(handlers::order::list_orders).post(handlers::order::create_order),
        )
        .route("/orders/track/{order_number}", get(handlers::order::track_order))
        .route("/orders/{id}", get(handlers::order::get_order))
        .route(
            "/orders/{id}/status",
            patch(handlers::order::update_order_status),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/dashboard/summary", get(handlers::settings::dashboard));

    // 平台
    let platform_routes = Router::new()
        .route(
            "/announcements",
            get(handlers::announcement::list_announcements)
                .post(handlers::announcement::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(handlers::announcement::update_announcement)
                .delete(handlers::announcement::delete_announcement),
        )
        .route(
            "/subscription-plans",
            get(handlers::plan::list_plans).post(handlers::plan::create_plan),
        )
        .route(
            "/subscription-plans/{id}",
            put(handlers::plan::update_plan).delete(handlers::plan::delete_plan),
        )
        .route("/restaurants/{slug}", get(handlers::restaurant::public_menu))
        .route(
            "/admin/restaurants",
            get(handlers::restaurant::list_restaurants),
        )
        .route(
            "/admin/restaurants/{id}",
            patch(handlers::restaurant::update_restaurant),
        )
        .route("/analytics", get(handlers::restaurant::analytics_overview))
        .route("/uploads/{filename}", get(handlers::upload::serve_upload));

    Router::new()
        .merge(auth_routes)
        .merge(operator_routes)
        .merge(platform_routes)
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api", api_routes());

    // 前端页面（可选）
    if let Some(dir) = &state.config.server.static_dir {
        tracing::info!(dir = %dir, "Serving static pages");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(axum::middleware::from_fn_with_state(state.clone(), page_guard))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}
