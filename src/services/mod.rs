//! Business logic services layer

pub mod analytics_service;
pub mod announcement_service;
pub mod auth_service;
pub mod category_service;
pub mod menu_item_service;
pub mod order_service;
pub mod payment_method_service;
pub mod plan_service;
pub mod restaurant_service;

pub use analytics_service::AnalyticsService;
pub use announcement_service::AnnouncementService;
pub use auth_service::{AuthService, LoginOutcome};
pub use category_service::CategoryService;
pub use menu_item_service::MenuItemService;
pub use order_service::OrderService;
pub use payment_method_service::PaymentMethodService;
pub use plan_service::PlanService;
pub use restaurant_service::RestaurantService;
