//! 缓存后端：本地 DashMap（单实例 / 测试）或 Redis（多实例共享）

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Backend failure; callers log it and fall back to the database
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// A cached entry with TTL support.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<String>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: String, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

#[derive(Clone)]
pub enum CacheBackend {
    /// In-process map, used when no Redis URL is configured
    Local(Arc<DashMap<String, CachedEntry>>),

    /// Shared Redis, so invalidation is seen by every instance
    Redis(Pool),
}

impl CacheBackend {
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    pub fn new_redis(pool: Pool) -> Self {
        CacheBackend::Redis(pool)
    }

    pub fn mode(&self) -> &'static str {
        match self {
            CacheBackend::Local(_) => "local",
            CacheBackend::Redis(_) => "redis",
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            CacheBackend::Local(map) => {
                let hit = map.get(key).map(|entry| entry.clone());
                match hit {
                    Some(entry) if entry.is_expired() => {
                        map.remove(key);
                        Ok(None)
                    }
                    Some(entry) => Ok(Some(entry.data.as_ref().clone())),
                    None => Ok(None),
                }
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
        }
    }

    pub async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        match self {
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
                Ok(())
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?;
                Ok(())
            }
        }
    }

    /// Delete an exact key, or every key matching a `*` glob.
    pub async fn invalidate(&self, key_or_pattern: &str) -> Result<usize, CacheError> {
        let is_pattern = key_or_pattern.contains('*');

        match self {
            CacheBackend::Local(map) => {
                if is_pattern {
                    let before = map.len();
                    map.retain(|key, _| !glob_match(key_or_pattern, key));
                    Ok(before.saturating_sub(map.len()))
                } else {
                    Ok(usize::from(map.remove(key_or_pattern).is_some()))
                }
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                if !is_pattern {
                    let removed: usize = conn.del(key_or_pattern).await?;
                    return Ok(removed);
                }

                let keys: Vec<String> = {
                    let mut iter = conn.scan_match::<_, String>(key_or_pattern).await?;
                    let mut keys = Vec::new();
                    while let Some(key) = iter.next_item().await {
                        keys.push(key);
                    }
                    keys
                };

                if keys.is_empty() {
                    return Ok(0);
                }
                let removed: usize = conn.del(keys).await?;
                Ok(removed)
            }
        }
    }

    /// Readiness probe
    pub async fn ping(&self) -> Result<(), CacheError> {
        match self {
            CacheBackend::Local(_) => Ok(()),
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(())
            }
        }
    }
}

/// Redis-style glob matching restricted to `*`.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !key.starts_with(first) || key.len() < first.len() + last.len() {
        return false;
    }

    let mut rest = &key[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("dashboard:*", "dashboard:42"));
        assert!(glob_match("*", "anything"));
        assert!(glob_match("public-menu:*:v1", "public-menu:42:v1"));
        assert!(!glob_match("dashboard:*", "categories:42"));
        assert!(!glob_match("a*b", "ab-a"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exact2"));
    }

    #[tokio::test]
    async fn test_local_set_get_and_expiry() {
        let backend = CacheBackend::new_local();
        backend
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("v".to_string()));

        backend
            .set("short", "v".to_string(), Duration::from_millis(0))
            .await
            .unwrap();
        assert_eq!(backend.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_local_pattern_invalidation() {
        let backend = CacheBackend::new_local();
        let ttl = Duration::from_secs(60);
        for key in ["dashboard:1", "dashboard:2", "categories:1"] {
            backend.set(key, "x".to_string(), ttl).await.unwrap();
        }

        assert_eq!(backend.invalidate("dashboard:*").await.unwrap(), 2);
        assert_eq!(backend.get("dashboard:1").await.unwrap(), None);
        assert!(backend.get("categories:1").await.unwrap().is_some());

        assert_eq!(backend.invalidate("categories:1").await.unwrap(), 1);
        assert_eq!(backend.invalidate("categories:1").await.unwrap(), 0);
    }
}
