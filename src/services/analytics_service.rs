//! 仪表盘与平台统计（带缓存）

use crate::{
    auth::clock::Clock,
    cache::{keys, CacheFacade},
    error::AppError,
    models::analytics::{AnalyticsOverview, DashboardSummary},
    repository::AnalyticsRepository,
};
use chrono::{Duration, Timelike};
use std::sync::Arc;
use uuid::Uuid;

pub struct AnalyticsService {
    repo: AnalyticsRepository,
    cache: CacheFacade,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository, cache: CacheFacade, clock: Arc<dyn Clock>) -> Self {
        Self { repo, cache, clock }
    }

    pub async fn dashboard(&self, restaurant_id: Uuid) -> Result<DashboardSummary, AppError> {
        let now = self.clock.now();
        // 当天 00:00 (UTC)
        let day_start = now
            - Duration::seconds(i64::from(now.num_seconds_from_midnight()))
            - Duration::nanoseconds(i64::from(now.nanosecond()));

        self.cache
            .get_or_load(&keys::dashboard(restaurant_id), || {
                self.repo.dashboard_summary(restaurant_id, day_start)
            })
            .await
    }

    pub async fn overview(&self) -> Result<AnalyticsOverview, AppError> {
        let since = self.clock.now() - Duration::days(30);
        self.cache
            .get_or_load(keys::ANALYTICS_OVERVIEW, || self.repo.overview(since))
            .await
    }
}
