//! Friendship entity and repository trait.
//!
//! Maps to the `friendships` table. A row is a directed request from
//! `requester_id` to `addressee_id`; acceptance makes the pair friends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Friendship request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Blocked,
}

impl FriendshipStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "blocked" => Self::Blocked,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Blocked => "blocked",
        }
    }
}

/// A friendship between two users.
///
/// Maps to the `friendships` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - requester_id / addressee_id: BIGINT NOT NULL REFERENCES users(id)
/// - status: VARCHAR(20) NOT NULL DEFAULT 'pending'
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - responded_at: TIMESTAMPTZ NULL
/// - UNIQUE (requester_id, addressee_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Friendship {
    /// New pending request.
    pub fn request(id: i64, requester_id: i64, addressee_id: i64) -> Self {
        Self {
            id,
            requester_id,
            addressee_id,
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// New blocked relationship, recorded from the blocker's side.
    pub fn block(id: i64, blocker_id: i64, blocked_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            requester_id: blocker_id,
            addressee_id: blocked_id,
            status: FriendshipStatus::Blocked,
            created_at: now,
            responded_at: Some(now),
        }
    }

    /// The other party from `user_id`'s perspective.
    pub fn other_user(&self, user_id: i64) -> i64 {
        if self.requester_id == user_id {
            self.addressee_id
        } else {
            self.requester_id
        }
    }

    /// Whether `user_id` participates in this friendship.
    pub fn involves(&self, user_id: i64) -> bool {
        self.requester_id == user_id || self.addressee_id == user_id
    }
}

/// Repository trait for friendship data access.
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Find a friendship by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Friendship>, AppError>;

    /// Find the row between two users, in either direction.
    async fn find_between(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Friendship>, AppError>;

    /// Persist a new request.
    async fn create(&self, friendship: &Friendship) -> Result<Friendship, AppError>;

    /// Update status and responded_at.
    async fn update(&self, friendship: &Friendship) -> Result<Friendship, AppError>;

    /// Delete a friendship row.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// IDs of a user's accepted friends.
    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Pending requests addressed to a user.
    async fn pending_for_user(&self, user_id: i64) -> Result<Vec<Friendship>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_user() {
        let friendship = Friendship::request(1, 10, 20);
        assert_eq!(friendship.other_user(10), 20);
        assert_eq!(friendship.other_user(20), 10);
    }

    #[test]
    fn test_involves() {
        let friendship = Friendship::request(1, 10, 20);
        assert!(friendship.involves(10));
        assert!(friendship.involves(20));
        assert!(!friendship.involves(30));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            FriendshipStatus::Pending,
            FriendshipStatus::Accepted,
            FriendshipStatus::Declined,
            FriendshipStatus::Blocked,
        ] {
            assert_eq!(FriendshipStatus::from_str(status.as_str()), status);
        }
    }
}
