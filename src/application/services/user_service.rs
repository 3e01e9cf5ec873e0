//! User Service
//!
//! Handles user profile management operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{User, UserRepository};

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, user_id: i64) -> Result<User, UserError>;

    /// Update user profile
    async fn update_profile(&self, user_id: i64, update: UpdateProfileDto)
        -> Result<User, UserError>;

    /// Delete user account
    async fn delete_user(&self, user_id: i64) -> Result<(), UserError>;
}

/// Update profile request
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub timezone: Option<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn get_user(&self, user_id: i64) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileDto,
    ) -> Result<User, UserError> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        // Username changes must keep uniqueness.
        if let Some(ref new_username) = update.username {
            if new_username != &user.username {
                let exists = self
                    .user_repo
                    .username_exists(new_username)
                    .await
                    .map_err(|e| UserError::Internal(e.to_string()))?;

                if exists {
                    return Err(UserError::UsernameTaken);
                }
                user.username = new_username.clone();
            }
        }

        if let Some(display_name) = update.display_name {
            user.display_name = Some(display_name);
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(timezone) = update.timezone {
            user.timezone = Some(timezone);
        }

        self.user_repo
            .update(&user)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), UserError> {
        self.user_repo
            .delete(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        Ok(())
    }
}
