//! Achievement Repository Implementation
//!
//! PostgreSQL implementation of the AchievementRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Achievement, AchievementCategory, AchievementRepository, SessionType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AchievementRow {
    id: i64,
    code: String,
    name: String,
    description: String,
    category: String,
    session_type: Option<String>,
    threshold: i32,
    points: i64,
}

impl AchievementRow {
    fn into_achievement(self) -> Result<Achievement, AppError> {
        let category = AchievementCategory::from_str(&self.category).ok_or_else(|| {
            AppError::Internal(format!("Unknown achievement category: {}", self.category))
        })?;

        Ok(Achievement {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            category,
            session_type: self.session_type.as_deref().and_then(SessionType::from_str),
            threshold: self.threshold,
            points: self.points,
        })
    }
}

const ACHIEVEMENT_COLUMNS: &str =
    "id, code, name, description, category, session_type, threshold, points";

/// PostgreSQL achievement repository implementation.
#[derive(Clone)]
pub struct PgAchievementRepository {
    pool: PgPool,
}

impl PgAchievementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AchievementRepository for PgAchievementRepository {
    async fn list_all(&self) -> Result<Vec<Achievement>, AppError> {
        let rows = sqlx::query_as::<_, AchievementRow>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements ORDER BY points ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_achievement()).collect()
    }

    async fn list_earned(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Achievement, DateTime<Utc>)>, AppError> {
        #[derive(Debug, sqlx::FromRow)]
        struct EarnedRow {
            #[sqlx(flatten)]
            achievement: AchievementRow,
            earned_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, EarnedRow>(&format!(
            r#"
            SELECT a.id, a.code, a.name, a.description, a.category, a.session_type,
                   a.threshold, a.points, ua.earned_at
            FROM achievements a
            JOIN user_achievements ua ON ua.achievement_id = a.id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| Ok((r.achievement.into_achievement()?, r.earned_at)))
            .collect()
    }

    async fn earned_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT achievement_id FROM user_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn award(&self, user_id: i64, achievement_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_achievements (user_id, achievement_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
