//! Notification entity and repository trait.
//!
//! Maps to the `notifications` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// What triggered the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
    Achievement,
    GroupReminder,
    GroupCancelled,
}

impl NotificationKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "friend_request" => Some(Self::FriendRequest),
            "friend_accepted" => Some(Self::FriendAccepted),
            "achievement" => Some(Self::Achievement),
            "group_reminder" => Some(Self::GroupReminder),
            "group_cancelled" => Some(Self::GroupCancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequest => "friend_request",
            Self::FriendAccepted => "friend_accepted",
            Self::Achievement => "achievement",
            Self::GroupReminder => "group_reminder",
            Self::GroupCancelled => "group_cancelled",
        }
    }
}

/// A notification delivered to one user.
///
/// Maps to the `notifications` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - kind: VARCHAR(32) NOT NULL
/// - body: TEXT NOT NULL
/// - read: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(id: i64, user_id: i64, kind: NotificationKind, body: String) -> Self {
        Self {
            id,
            user_id,
            kind,
            body,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for notification data access.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification.
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;

    /// List a user's notifications, newest first, capped at `limit`.
    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError>;

    /// Count of unread notifications for a user.
    async fn unread_count(&self, user_id: i64) -> Result<i64, AppError>;

    /// Mark one notification read. Errors if it belongs to another user.
    async fn mark_read(&self, id: i64, user_id: i64) -> Result<(), AppError>;

    /// Mark all of a user's notifications read. Returns rows affected.
    async fn mark_all_read(&self, user_id: i64) -> Result<i64, AppError>;
}
