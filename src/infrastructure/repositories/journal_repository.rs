//! Journal Repository Implementation
//!
//! PostgreSQL implementation of the JournalRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{JournalEntry, JournalRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct JournalRow {
    id: i64,
    user_id: i64,
    title: String,
    content: String,
    mood: Option<i16>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JournalRow {
    fn into_entry(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            mood: self.mood,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const JOURNAL_COLUMNS: &str = "id, user_id, title, content, mood, tags, created_at, updated_at";

/// PostgreSQL journal repository implementation.
#[derive(Clone)]
pub struct PgJournalRepository {
    pool: PgPool,
}

impl PgJournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JournalRepository for PgJournalRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<JournalEntry>, AppError> {
        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journal_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_entry()))
    }

    async fn create(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError> {
        let row = sqlx::query_as::<_, JournalRow>(&format!(
            r#"
            INSERT INTO journal_entries (id, user_id, title, content, mood, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JOURNAL_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.mood)
        .bind(&entry.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_entry())
    }

    async fn update(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError> {
        let row = sqlx::query_as::<_, JournalRow>(&format!(
            r#"
            UPDATE journal_entries
            SET title = $2,
                content = $3,
                mood = $4,
                tags = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOURNAL_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.mood)
        .bind(&entry.tags)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Journal entry {} not found", entry.id)))?;

        Ok(row.into_entry())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Journal entry {} not found", id)));
        }

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<JournalEntry>, AppError> {
        let rows = sqlx::query_as::<_, JournalRow>(&format!(
            r#"
            SELECT {JOURNAL_COLUMNS}
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_entry()).collect())
    }
}
