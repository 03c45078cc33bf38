//! Refresh token repository (刷新令牌存储)
//!
//! 只保存令牌的 SHA-256 摘要。

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Persisted refresh token state
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredRefreshToken {
    pub user_id: Uuid,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
}

impl StoredRefreshToken {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 保存新签发的刷新令牌
    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Returns the record regardless of revocation or expiry.
    async fn lookup(&self, token: &str) -> Result<Option<StoredRefreshToken>, AppError>;

    /// 撤销令牌；重复撤销不报错
    async fn revoke(&self, token: &str) -> Result<bool, AppError>;

    /// 撤销用户的所有刷新令牌
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError>;
}

/// 哈希令牌用于存储
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct PgRefreshTokenStore {
    db: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 清理过期的刷新令牌
    pub async fn cleanup_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(hash_token(token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<StoredRefreshToken>, AppError> {
        let record = sqlx::query_as::<_, StoredRefreshToken>(
            "SELECT user_id, revoked, expires_at FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(hash_token(token))
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn revoke(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE token_hash = $1 AND revoked = FALSE",
        )
        .bind(hash_token(token))
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token("refresh-token");
        assert_eq!(a, hash_token("refresh-token"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_token("refresh-token2"));
    }

    #[test]
    fn test_usable_requires_unrevoked_and_unexpired() {
        let now = Utc::now();
        let mut record = StoredRefreshToken {
            user_id: Uuid::new_v4(),
            revoked: false,
            expires_at: now + Duration::days(7),
        };
        assert!(record.is_usable(now));

        record.revoked = true;
        assert!(!record.is_usable(now));

        record.revoked = false;
        record.expires_at = now;
        assert!(!record.is_usable(now));
    }
}
