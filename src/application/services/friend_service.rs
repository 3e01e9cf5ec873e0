//! Friend Service
//!
//! Friend requests and relationships: send, accept, decline, block, remove,
//! and friend/pending listings. Request and acceptance events produce
//! notifications for the affected user.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Friendship, FriendshipRepository, FriendshipStatus, Notification, NotificationKind,
    NotificationRepository, User, UserRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Friend service trait
#[async_trait]
pub trait FriendService: Send + Sync {
    /// Send a friend request to another user.
    async fn send_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Friendship, FriendError>;

    /// Accept a pending request addressed to `user_id`.
    async fn accept_request(&self, user_id: i64, request_id: i64)
        -> Result<Friendship, FriendError>;

    /// Decline a pending request addressed to `user_id`.
    async fn decline_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<Friendship, FriendError>;

    /// Block another user, replacing any existing relationship.
    async fn block_user(&self, user_id: i64, target_id: i64) -> Result<Friendship, FriendError>;

    /// Remove an accepted friendship (either side may remove).
    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<(), FriendError>;

    /// The user's accepted friends as profiles.
    async fn list_friends(&self, user_id: i64) -> Result<Vec<User>, FriendError>;

    /// Pending requests addressed to the user.
    async fn list_pending(&self, user_id: i64) -> Result<Vec<Friendship>, FriendError>;
}

/// Friend service errors
#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("Cannot befriend yourself")]
    SelfRequest,

    #[error("User not found")]
    UserNotFound,

    #[error("Friendship already exists")]
    AlreadyExists,

    #[error("User is blocked")]
    Blocked,

    #[error("Friend request not found")]
    RequestNotFound,

    #[error("Request is not addressed to you")]
    NotAddressee,

    #[error("Request is not pending")]
    NotPending,

    #[error("Friendship not found")]
    NotFriends,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for FriendError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// FriendService implementation
pub struct FriendServiceImpl<F, U, N>
where
    F: FriendshipRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    friendship_repo: Arc<F>,
    user_repo: Arc<U>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<F, U, N> FriendServiceImpl<F, U, N>
where
    F: FriendshipRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(
        friendship_repo: Arc<F>,
        user_repo: Arc<U>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            friendship_repo,
            user_repo,
            notification_repo,
            id_generator,
        }
    }

    async fn notify(&self, user_id: i64, kind: NotificationKind, body: String) {
        let notification =
            Notification::new(self.id_generator.generate(), user_id, kind, body);
        // Notification failures never fail the friendship operation.
        if let Err(e) = self.notification_repo.create(&notification).await {
            tracing::warn!(user_id, error = %e, "Failed to create notification");
        }
    }

    /// Fetch a pending request addressed to `user_id`.
    async fn pending_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<Friendship, FriendError> {
        let friendship = self
            .friendship_repo
            .find_by_id(request_id)
            .await?
            .ok_or(FriendError::RequestNotFound)?;

        if friendship.addressee_id != user_id {
            return Err(FriendError::NotAddressee);
        }
        if friendship.status != FriendshipStatus::Pending {
            return Err(FriendError::NotPending);
        }

        Ok(friendship)
    }
}

#[async_trait]
impl<F, U, N> FriendService for FriendServiceImpl<F, U, N>
where
    F: FriendshipRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn send_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Friendship, FriendError> {
        if requester_id == addressee_id {
            return Err(FriendError::SelfRequest);
        }

        let addressee = self
            .user_repo
            .find_by_id(addressee_id)
            .await?
            .ok_or(FriendError::UserNotFound)?;

        if let Some(existing) = self
            .friendship_repo
            .find_between(requester_id, addressee_id)
            .await?
        {
            return Err(match existing.status {
                FriendshipStatus::Blocked => FriendError::Blocked,
                _ => FriendError::AlreadyExists,
            });
        }

        let friendship = Friendship::request(
            self.id_generator.generate(),
            requester_id,
            addressee_id,
        );
        let created = self.friendship_repo.create(&friendship).await?;

        let requester_name = self
            .user_repo
            .find_by_id(requester_id)
            .await?
            .map(|u| u.display_name_or_username().to_string())
            .unwrap_or_else(|| "Someone".to_string());

        self.notify(
            addressee.id,
            NotificationKind::FriendRequest,
            format!("{} sent you a friend request", requester_name),
        )
        .await;

        Ok(created)
    }

    async fn accept_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<Friendship, FriendError> {
        let mut friendship = self.pending_request(user_id, request_id).await?;

        friendship.status = FriendshipStatus::Accepted;
        friendship.responded_at = Some(Utc::now());
        let updated = self.friendship_repo.update(&friendship).await?;

        let accepter_name = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.display_name_or_username().to_string())
            .unwrap_or_else(|| "Someone".to_string());

        self.notify(
            updated.requester_id,
            NotificationKind::FriendAccepted,
            format!("{} accepted your friend request", accepter_name),
        )
        .await;

        Ok(updated)
    }

    async fn decline_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<Friendship, FriendError> {
        let mut friendship = self.pending_request(user_id, request_id).await?;

        friendship.status = FriendshipStatus::Declined;
        friendship.responded_at = Some(Utc::now());

        Ok(self.friendship_repo.update(&friendship).await?)
    }

    async fn block_user(&self, user_id: i64, target_id: i64) -> Result<Friendship, FriendError> {
        if user_id == target_id {
            return Err(FriendError::SelfRequest);
        }

        self.user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(FriendError::UserNotFound)?;

        // One row per pair: drop whatever relationship exists first.
        if let Some(existing) = self.friendship_repo.find_between(user_id, target_id).await? {
            if existing.status == FriendshipStatus::Blocked && existing.requester_id == user_id {
                return Ok(existing);
            }
            self.friendship_repo.delete(existing.id).await?;
        }

        let blocked = Friendship::block(self.id_generator.generate(), user_id, target_id);
        Ok(self.friendship_repo.create(&blocked).await?)
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<(), FriendError> {
        let friendship = self
            .friendship_repo
            .find_between(user_id, friend_id)
            .await?
            .ok_or(FriendError::NotFriends)?;

        if friendship.status != FriendshipStatus::Accepted {
            return Err(FriendError::NotFriends);
        }

        Ok(self.friendship_repo.delete(friendship.id).await?)
    }

    async fn list_friends(&self, user_id: i64) -> Result<Vec<User>, FriendError> {
        let ids = self.friendship_repo.accepted_friend_ids(user_id).await?;

        let mut friends = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.user_repo.find_by_id(id).await? {
                friends.push(user);
            }
        }

        Ok(friends)
    }

    async fn list_pending(&self, user_id: i64) -> Result<Vec<Friendship>, FriendError> {
        Ok(self.friendship_repo.pending_for_user(user_id).await?)
    }
}
