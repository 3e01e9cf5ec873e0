//! Friendship Repository Implementation
//!
//! PostgreSQL implementation of the FriendshipRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Friendship, FriendshipRepository, FriendshipStatus};
use crate::shared::error::AppError;

const FRIENDSHIP_COLUMNS: &str =
    "id, requester_id, addressee_id, status, created_at, responded_at";

#[derive(Debug, sqlx::FromRow)]
struct FriendshipRow {
    id: i64,
    requester_id: i64,
    addressee_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl FriendshipRow {
    fn into_friendship(self) -> Friendship {
        Friendship {
            id: self.id,
            requester_id: self.requester_id,
            addressee_id: self.addressee_id,
            status: FriendshipStatus::from_str(&self.status),
            created_at: self.created_at,
            responded_at: self.responded_at,
        }
    }
}

/// PostgreSQL friendship repository implementation.
#[derive(Clone)]
pub struct PgFriendshipRepository {
    pool: PgPool,
}

impl PgFriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipRepository for PgFriendshipRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Friendship>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(&format!(
            "SELECT {FRIENDSHIP_COLUMNS} FROM friendships WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_friendship()))
    }

    async fn find_between(&self, a: i64, b: i64) -> Result<Option<Friendship>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(&format!(
            r#"
            SELECT {FRIENDSHIP_COLUMNS} FROM friendships
            WHERE (requester_id = $1 AND addressee_id = $2)
               OR (requester_id = $2 AND addressee_id = $1)
            "#
        ))
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_friendship()))
    }

    async fn create(&self, friendship: &Friendship) -> Result<Friendship, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(&format!(
            r#"
            INSERT INTO friendships (id, requester_id, addressee_id, status, created_at, responded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FRIENDSHIP_COLUMNS}
            "#
        ))
        .bind(friendship.id)
        .bind(friendship.requester_id)
        .bind(friendship.addressee_id)
        .bind(friendship.status.as_str())
        .bind(friendship.created_at)
        .bind(friendship.responded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Friendship already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_friendship())
    }

    async fn update(&self, friendship: &Friendship) -> Result<Friendship, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(&format!(
            r#"
            UPDATE friendships
            SET status = $2, responded_at = $3
            WHERE id = $1
            RETURNING {FRIENDSHIP_COLUMNS}
            "#
        ))
        .bind(friendship.id)
        .bind(friendship.status.as_str())
        .bind(friendship.responded_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Friendship not found".to_string()))?;

        Ok(row.into_friendship())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Friendship not found".to_string()));
        }

        Ok(())
    }

    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT CASE WHEN requester_id = $1 THEN addressee_id ELSE requester_id END
            FROM friendships
            WHERE (requester_id = $1 OR addressee_id = $1) AND status = 'accepted'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn pending_for_user(&self, user_id: i64) -> Result<Vec<Friendship>, AppError> {
        let rows = sqlx::query_as::<_, FriendshipRow>(&format!(
            r#"
            SELECT {FRIENDSHIP_COLUMNS} FROM friendships
            WHERE addressee_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_friendship()).collect())
    }
}
