//! Journal entry entity and repository trait.
//!
//! Maps to the `journal_entries` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A private journal entry.
///
/// Maps to the `journal_entries` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - title: VARCHAR(120) NOT NULL
/// - content: TEXT NOT NULL
/// - mood: SMALLINT NULL (1-10)
/// - tags: TEXT[] NOT NULL DEFAULT '{}'
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owner of the entry
    pub user_id: i64,

    /// Entry title
    pub title: String,

    /// Entry body
    pub content: String,

    /// Mood at time of writing (1-10)
    pub mood: Option<i16>,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a new entry.
    pub fn new(id: i64, user_id: i64, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            title,
            content,
            mood: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for journal entry data access.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Find an entry by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<JournalEntry>, AppError>;

    /// Persist a new entry.
    async fn create(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError>;

    /// Update title, content, mood, and tags.
    async fn update(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError>;

    /// Delete an entry.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// List a user's entries, newest first, capped at `limit`.
    async fn list_for_user(&self, user_id: i64, limit: i64)
        -> Result<Vec<JournalEntry>, AppError>;
}
