//! Group Session Repository Implementation
//!
//! PostgreSQL implementation of the GroupSessionRepository trait. Enrollment
//! lives in the `group_participants` join table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{GroupSession, GroupSessionRepository, GroupSessionStatus, SessionType};
use crate::shared::error::AppError;

const GROUP_COLUMNS: &str = "id, host_id, title, description, session_type, status, \
     scheduled_at, duration_secs, max_participants, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: i64,
    host_id: i64,
    title: String,
    description: Option<String>,
    session_type: String,
    status: String,
    scheduled_at: DateTime<Utc>,
    duration_secs: i32,
    max_participants: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group_session(self) -> Result<GroupSession, AppError> {
        let session_type = SessionType::from_str(&self.session_type).ok_or_else(|| {
            AppError::Internal(format!("unknown session type: {}", self.session_type))
        })?;

        Ok(GroupSession {
            id: self.id,
            host_id: self.host_id,
            title: self.title,
            description: self.description,
            session_type,
            status: GroupSessionStatus::from_str(&self.status),
            scheduled_at: self.scheduled_at,
            duration_secs: self.duration_secs,
            max_participants: self.max_participants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL group session repository implementation.
#[derive(Clone)]
pub struct PgGroupSessionRepository {
    pool: PgPool,
}

impl PgGroupSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupSessionRepository for PgGroupSessionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<GroupSession>, AppError> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            "SELECT {GROUP_COLUMNS} FROM group_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_group_session()).transpose()
    }

    async fn create(&self, session: &GroupSession) -> Result<GroupSession, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            INSERT INTO group_sessions
                (id, host_id, title, description, session_type, status,
                 scheduled_at, duration_secs, max_participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.host_id)
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.session_type.as_str())
        .bind(session.status.as_str())
        .bind(session.scheduled_at)
        .bind(session.duration_secs)
        .bind(session.max_participants)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        // The host always occupies the first seat.
        sqlx::query(
            "INSERT INTO group_participants (group_session_id, user_id, joined_at) VALUES ($1, $2, $3)",
        )
        .bind(session.id)
        .bind(session.host_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_group_session()
    }

    async fn update(&self, session: &GroupSession) -> Result<GroupSession, AppError> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            UPDATE group_sessions
            SET title = $2, description = $3, status = $4, scheduled_at = $5,
                duration_secs = $6, max_participants = $7, updated_at = $8
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.status.as_str())
        .bind(session.scheduled_at)
        .bind(session.duration_secs)
        .bind(session.max_participants)
        .bind(session.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Group session not found".to_string()))?;

        row.into_group_session()
    }

    async fn list_upcoming(&self, limit: i64) -> Result<Vec<GroupSession>, AppError> {
        let rows = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            SELECT {GROUP_COLUMNS} FROM group_sessions
            WHERE status IN ('scheduled', 'active')
            ORDER BY scheduled_at ASC
            LIMIT $1
            "#
        ))
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_group_session()).collect()
    }

    async fn participant_ids(&self, session_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM group_participants WHERE group_session_id = $1 ORDER BY joined_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn participant_count(&self, session_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM group_participants WHERE group_session_id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO group_participants (group_session_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_session_id, user_id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM group_participants WHERE group_session_id = $1 AND user_id = $2",
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
