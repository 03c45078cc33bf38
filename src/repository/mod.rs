//! Database repository layer
//!
//! 认证和菜单相关的存储通过 trait 暴露（`Arc<dyn ...>`），测试中用内存实现替换；
//! 其余仓库直接基于 `PgPool`。

pub mod analytics_repo;
pub mod announcement_repo;
pub mod catalog_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod plan_repo;
pub mod restaurant_repo;
pub mod token_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepository;
pub use announcement_repo::AnnouncementRepository;
pub use catalog_repo::{CategoryStore, MenuItemStore, PgCategoryStore, PgMenuItemStore};
pub use order_repo::OrderRepository;
pub use payment_repo::{PaymentMethodStore, PgPaymentMethodStore};
pub use plan_repo::PlanRepository;
pub use restaurant_repo::{PgRestaurantStore, RestaurantStore};
pub use token_repo::{hash_token, PgRefreshTokenStore, RefreshTokenStore, StoredRefreshToken};
pub use user_repo::{PgUserStore, UserStore};

use crate::error::AppError;

/// 唯一约束冲突映射为 400，其它错误原样返回
pub(crate) fn unique_violation(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest(message.to_string())
        }
        _ => AppError::Database(e),
    }
}
