//! Cache facade
//!
//! JSON 值的读穿透缓存。后端任何错误都记录 WARN 并当作未命中处理，
//! 请求始终回落到数据库。

pub mod backend;
pub mod keys;

pub use backend::{CacheBackend, CacheError};

use crate::config::CacheConfig;
use crate::error::Result;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Clone)]
pub struct CacheFacade {
    backend: CacheBackend,
    default_ttl: Duration,
}

impl CacheFacade {
    pub fn new(backend: CacheBackend, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// In-process cache
    pub fn local(default_ttl: Duration) -> Self {
        Self::new(CacheBackend::new_local(), default_ttl)
    }

    /// Build from config: Redis when a URL is set and reachable, local otherwise.
    pub async fn from_config(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.default_ttl_secs);

        let Some(url) = config.redis_url.as_ref() else {
            tracing::info!("No Redis URL configured, using local cache");
            return Self::local(ttl);
        };

        let redis_config = deadpool_redis::Config::from_url(url.expose_secret().as_str());
        let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to create Redis pool. Falling back to local cache."
                );
                return Self::local(ttl);
            }
        };

        let backend = CacheBackend::new_redis(pool);
        match backend.ping().await {
            Ok(()) => {
                tracing::info!("Redis cache connected");
                Self::new(backend, ttl)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Redis not reachable. Falling back to local cache."
                );
                Self::local(ttl)
            }
        }
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                metrics::counter!("cache_errors_total").increment(1);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                metrics::counter!("cache_hits_total").increment(1);
                tracing::debug!(key = %key, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cached value is not valid JSON");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        self.set_json_with_ttl(key, value, self.default_ttl).await
    }

    pub async fn set_json_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize cache value");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, raw, ttl).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
            metrics::counter!("cache_errors_total").increment(1);
        }
    }

    /// Drop an exact key or a `*` pattern. Failures are logged only.
    pub async fn invalidate(&self, key_or_pattern: &str) {
        match self.backend.invalidate(key_or_pattern).await {
            Ok(removed) => {
                tracing::debug!(key = %key_or_pattern, removed, "cache invalidated");
            }
            Err(e) => {
                tracing::warn!(key = %key_or_pattern, error = %e, "Cache invalidation failed");
                metrics::counter!("cache_errors_total").increment(1);
            }
        }
    }

    pub async fn invalidate_many<S: AsRef<str>>(&self, keys: &[S]) {
        for key in keys {
            self.invalidate(key.as_ref()).await;
        }
    }

    /// Read-through: return the cached value or load, store and return it.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.get_json(key).await {
            return Ok(hit);
        }

        let value = load().await?;
        self.set_json(key, &value).await;
        Ok(value)
    }

    pub async fn is_healthy(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Cache health check failed");
                false
            }
        }
    }
}
