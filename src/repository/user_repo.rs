//! User repository (数据库访问层)

use super::unique_violation;
use crate::{
    error::AppError,
    models::{
        restaurant::{NewRestaurant, Restaurant},
        user::{NewUser, User},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// 按邮箱查找未删除的用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// 按 ID 查找（包括已删除的用户，由调用方判断）
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// 邮箱是否已被占用（包括已删除的用户）
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Create an owner account and its PENDING restaurant in one transaction.
    async fn register_owner(
        &self,
        user: NewUser,
        restaurant: NewRestaurant,
    ) -> Result<(User, Restaurant), AppError>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE lower(email) = lower($1) AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
                .bind(email)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    async fn register_owner(
        &self,
        user: NewUser,
        restaurant: NewRestaurant,
    ) -> Result<(User, Restaurant), AppError> {
        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, "Email already registered"))?;

        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurants (slug, name, phone, address, package, status, owner_id)
            VALUES ($1, $2, $3, $4, $5, 'PENDING', $6)
            RETURNING *
            "#,
        )
        .bind(&restaurant.slug)
        .bind(&restaurant.name)
        .bind(&restaurant.phone)
        .bind(&restaurant.address)
        .bind(restaurant.package)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, "Restaurant slug already taken"))?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            restaurant_id = %restaurant.id,
            slug = %restaurant.slug,
            "Registered restaurant owner"
        );

        Ok((user, restaurant))
    }
}
