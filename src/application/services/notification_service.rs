//! Notification Service
//!
//! Per-user notification listing and read-state management.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Notification, NotificationRepository};

/// Notification service trait
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// The user's notifications, newest first.
    async fn list(&self, user_id: i64, limit: i64)
        -> Result<Vec<Notification>, NotificationError>;

    /// Count of unread notifications.
    async fn unread_count(&self, user_id: i64) -> Result<i64, NotificationError>;

    /// Mark one notification read.
    async fn mark_read(&self, user_id: i64, notification_id: i64)
        -> Result<(), NotificationError>;

    /// Mark all of the user's notifications read. Returns rows affected.
    async fn mark_all_read(&self, user_id: i64) -> Result<i64, NotificationError>;
}

/// Notification service errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for NotificationError {
    fn from(e: crate::shared::error::AppError) -> Self {
        match e {
            crate::shared::error::AppError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// NotificationService implementation
pub struct NotificationServiceImpl<R>
where
    R: NotificationRepository,
{
    notification_repo: Arc<R>,
}

impl<R> NotificationServiceImpl<R>
where
    R: NotificationRepository,
{
    pub fn new(notification_repo: Arc<R>) -> Self {
        Self { notification_repo }
    }
}

#[async_trait]
impl<R> NotificationService for NotificationServiceImpl<R>
where
    R: NotificationRepository + 'static,
{
    async fn list(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationError> {
        Ok(self
            .notification_repo
            .list_for_user(user_id, limit.clamp(1, 100))
            .await?)
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, NotificationError> {
        Ok(self.notification_repo.unread_count(user_id).await?)
    }

    async fn mark_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<(), NotificationError> {
        Ok(self
            .notification_repo
            .mark_read(notification_id, user_id)
            .await?)
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<i64, NotificationError> {
        Ok(self.notification_repo.mark_all_read(user_id).await?)
    }
}
