//! Journal Service
//!
//! Owner-scoped CRUD over private journal entries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{JournalEntry, JournalRepository};
use crate::shared::snowflake::SnowflakeGenerator;

/// New journal entry payload.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub mood: Option<i16>,
    pub tags: Vec<String>,
}

/// Journal entry update payload.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    pub tags: Option<Vec<String>>,
}

/// Journal service trait
#[async_trait]
pub trait JournalService: Send + Sync {
    /// Create a new entry for the user.
    async fn create_entry(&self, user_id: i64, new: NewEntry)
        -> Result<JournalEntry, JournalError>;

    /// Fetch one of the user's entries.
    async fn get_entry(&self, user_id: i64, entry_id: i64) -> Result<JournalEntry, JournalError>;

    /// Update one of the user's entries.
    async fn update_entry(
        &self,
        user_id: i64,
        entry_id: i64,
        update: EntryUpdate,
    ) -> Result<JournalEntry, JournalError>;

    /// Delete one of the user's entries.
    async fn delete_entry(&self, user_id: i64, entry_id: i64) -> Result<(), JournalError>;

    /// List the user's entries, newest first.
    async fn list_entries(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<JournalEntry>, JournalError>;
}

/// Journal service errors
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Journal entry not found")]
    NotFound,

    #[error("Journal entry belongs to another user")]
    NotOwner,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for JournalError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// JournalService implementation
pub struct JournalServiceImpl<R>
where
    R: JournalRepository,
{
    journal_repo: Arc<R>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R> JournalServiceImpl<R>
where
    R: JournalRepository,
{
    pub fn new(journal_repo: Arc<R>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            journal_repo,
            id_generator,
        }
    }

    /// Fetch an entry and check ownership.
    async fn owned_entry(&self, user_id: i64, entry_id: i64) -> Result<JournalEntry, JournalError> {
        let entry = self
            .journal_repo
            .find_by_id(entry_id)
            .await?
            .ok_or(JournalError::NotFound)?;

        if entry.user_id != user_id {
            return Err(JournalError::NotOwner);
        }

        Ok(entry)
    }
}

#[async_trait]
impl<R> JournalService for JournalServiceImpl<R>
where
    R: JournalRepository + 'static,
{
    async fn create_entry(
        &self,
        user_id: i64,
        new: NewEntry,
    ) -> Result<JournalEntry, JournalError> {
        let mut entry =
            JournalEntry::new(self.id_generator.generate(), user_id, new.title, new.content);
        entry.mood = new.mood;
        entry.tags = new.tags;

        Ok(self.journal_repo.create(&entry).await?)
    }

    async fn get_entry(&self, user_id: i64, entry_id: i64) -> Result<JournalEntry, JournalError> {
        self.owned_entry(user_id, entry_id).await
    }

    async fn update_entry(
        &self,
        user_id: i64,
        entry_id: i64,
        update: EntryUpdate,
    ) -> Result<JournalEntry, JournalError> {
        let mut entry = self.owned_entry(user_id, entry_id).await?;

        if let Some(title) = update.title {
            entry.title = title;
        }
        if let Some(content) = update.content {
            entry.content = content;
        }
        if let Some(mood) = update.mood {
            entry.mood = Some(mood);
        }
        if let Some(tags) = update.tags {
            entry.tags = tags;
        }
        entry.updated_at = Utc::now();

        Ok(self.journal_repo.update(&entry).await?)
    }

    async fn delete_entry(&self, user_id: i64, entry_id: i64) -> Result<(), JournalError> {
        self.owned_entry(user_id, entry_id).await?;
        Ok(self.journal_repo.delete(entry_id).await?)
    }

    async fn list_entries(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(self
            .journal_repo
            .list_for_user(user_id, limit.clamp(1, 100))
            .await?)
    }
}
