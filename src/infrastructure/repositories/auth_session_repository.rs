//! Auth Session Repository Implementation
//!
//! PostgreSQL implementation of the AuthSessionRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AuthSession, AuthSessionRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AuthSessionRow {
    id: Uuid,
    user_id: i64,
    refresh_token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            id: self.id,
            user_id: self.user_id,
            refresh_token_hash: self.refresh_token_hash,
            expires_at: self.expires_at,
            created_at: self.created_at,
            last_used_at: self.last_used_at,
            revoked_at: self.revoked_at,
        }
    }
}

/// PostgreSQL auth session repository implementation.
#[derive(Clone)]
pub struct PgAuthSessionRepository {
    pool: PgPool,
}

impl PgAuthSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthSessionRepository for PgAuthSessionRepository {
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<AuthSession>, AppError> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT id, user_id, refresh_token_hash, expires_at, created_at, last_used_at, revoked_at
            FROM auth_sessions
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn create(&self, session: &AuthSession) -> Result<AuthSession, AppError> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            INSERT INTO auth_sessions (id, user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, refresh_token_hash, expires_at, created_at, last_used_at, revoked_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_session())
    }

    async fn update_token_hash(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE auth_sessions
            SET refresh_token_hash = $2,
                expires_at = $3,
                last_used_at = NOW()
            WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Auth session not found".to_string()));
        }

        Ok(())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE auth_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Auth session not found".to_string()));
        }

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    async fn cleanup_expired(&self) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM auth_sessions
            WHERE expires_at < NOW() - INTERVAL '7 days'
               OR revoked_at < NOW() - INTERVAL '30 days'
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }
}
