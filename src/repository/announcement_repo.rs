//! Announcement repository

use crate::{
    error::AppError,
    models::announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AnnouncementRepository {
    db: PgPool,
}

impl AnnouncementRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Announcement>, AppError> {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT * FROM announcements
            WHERE (NOT $1 OR is_active)
            ORDER BY created_at DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.db)
        .await?;

        Ok(announcements)
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        req: &CreateAnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (title, content, is_active, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(req.title.trim())
        .bind(&req.content)
        .bind(req.is_active)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(announcement)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>, AppError> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(&req.content)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(announcement)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
