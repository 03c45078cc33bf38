//! 平台公告

use crate::{
    error::AppError,
    models::announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    repository::AnnouncementRepository,
};
use uuid::Uuid;
use validator::Validate;

pub struct AnnouncementService {
    repo: AnnouncementRepository,
}

impl AnnouncementService {
    pub fn new(repo: AnnouncementRepository) -> Self {
        Self { repo }
    }

    /// 管理员看到全部，餐厅只看到启用的公告
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Announcement>, AppError> {
        self.repo.list(!include_inactive).await
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        req.validate()?;
        self.repo.create(created_by, &req).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateAnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        req.validate()?;
        self.repo
            .update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("Announcement"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Announcement"));
        }
        Ok(())
    }
}
