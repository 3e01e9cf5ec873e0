//! Wellness Session Repository Implementation
//!
//! PostgreSQL implementation of the WellnessSessionRepository trait.
//! All session subtypes live in one table; the `session_type` column is the
//! discriminator and the subtype payload is stored as tagged JSONB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    SessionDetail, SessionFilter, SessionStatus, SessionType, TypeCount, WellnessSession,
    WellnessSessionRepository,
};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    session_type: String,
    status: String,
    planned_duration_secs: Option<i32>,
    active_secs: i64,
    mood_before: Option<i16>,
    mood_after: Option<i16>,
    notes: Option<String>,
    detail: serde_json::Value,
    started_at: DateTime<Utc>,
    last_resumed_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Result<WellnessSession, AppError> {
        let session_type = SessionType::from_str(&self.session_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown session type: {}", self.session_type))
        })?;
        let detail: SessionDetail = serde_json::from_value(self.detail)
            .map_err(|e| AppError::Internal(format!("Corrupt session detail: {}", e)))?;

        Ok(WellnessSession {
            id: self.id,
            user_id: self.user_id,
            session_type,
            status: SessionStatus::from_str(&self.status),
            planned_duration_secs: self.planned_duration_secs,
            active_secs: self.active_secs,
            mood_before: self.mood_before,
            mood_after: self.mood_after,
            notes: self.notes,
            detail,
            started_at: self.started_at,
            last_resumed_at: self.last_resumed_at,
            paused_at: self.paused_at,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SESSION_COLUMNS: &str = "id, user_id, session_type, status, planned_duration_secs, \
                               active_secs, mood_before, mood_after, notes, detail, \
                               started_at, last_resumed_at, paused_at, completed_at, \
                               created_at, updated_at";

/// PostgreSQL wellness session repository implementation.
#[derive(Clone)]
pub struct PgWellnessSessionRepository {
    pool: PgPool,
}

impl PgWellnessSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn detail_json(session: &WellnessSession) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(&session.detail)
            .map_err(|e| AppError::Internal(format!("Session detail serialization failed: {}", e)))
    }
}

#[async_trait]
impl WellnessSessionRepository for PgWellnessSessionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<WellnessSession>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM wellness_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn find_open_for_user(&self, user_id: i64) -> Result<Option<WellnessSession>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM wellness_sessions
            WHERE user_id = $1 AND status IN ('active', 'paused')
            ORDER BY started_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn create(&self, session: &WellnessSession) -> Result<WellnessSession, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            INSERT INTO wellness_sessions
                (id, user_id, session_type, status, planned_duration_secs, active_secs,
                 mood_before, mood_after, notes, detail, started_at, last_resumed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.session_type.as_str())
        .bind(session.status.as_str())
        .bind(session.planned_duration_secs)
        .bind(session.active_secs)
        .bind(session.mood_before)
        .bind(session.mood_after)
        .bind(&session.notes)
        .bind(Self::detail_json(session)?)
        .bind(session.started_at)
        .bind(session.last_resumed_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_session()
    }

    async fn update(&self, session: &WellnessSession) -> Result<WellnessSession, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            UPDATE wellness_sessions
            SET status = $2,
                active_secs = $3,
                mood_after = $4,
                notes = $5,
                detail = $6,
                last_resumed_at = $7,
                paused_at = $8,
                completed_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.status.as_str())
        .bind(session.active_secs)
        .bind(session.mood_after)
        .bind(&session.notes)
        .bind(Self::detail_json(session)?)
        .bind(session.last_resumed_at)
        .bind(session.paused_at)
        .bind(session.completed_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session with id {} not found", session.id)))?;

        row.into_session()
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        filter: &SessionFilter,
    ) -> Result<Vec<WellnessSession>, AppError> {
        let limit = filter.limit.unwrap_or(50).clamp(1, 100);

        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM wellness_sessions
            WHERE user_id = $1
              AND ($2::VARCHAR IS NULL OR session_type = $2)
              AND ($3::VARCHAR IS NULL OR status = $3)
            ORDER BY started_at DESC
            LIMIT $4
            "#
        ))
        .bind(user_id)
        .bind(filter.session_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_session()).collect()
    }

    async fn list_completed_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<WellnessSession>, AppError> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM wellness_sessions
            WHERE user_id = $1 AND status = 'completed'
            ORDER BY completed_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_session()).collect()
    }

    async fn completed_counts_by_type(&self, user_id: i64) -> Result<Vec<TypeCount>, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT session_type, COUNT(*)
            FROM wellness_sessions
            WHERE user_id = $1 AND status = 'completed'
            GROUP BY session_type
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(session_type, completed)| {
                SessionType::from_str(&session_type).map(|session_type| TypeCount {
                    session_type,
                    completed,
                })
            })
            .collect())
    }

    async fn completed_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM wellness_sessions WHERE user_id = $1 AND status = 'completed'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn abandoned_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM wellness_sessions WHERE user_id = $1 AND status = 'abandoned'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
