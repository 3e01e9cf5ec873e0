//! User Points Repository Implementation
//!
//! PostgreSQL implementation of the UserPointsRepository trait, including
//! the ranking queries behind the leaderboard.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::{LeaderboardRow, UserPoints, UserPointsRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PointsRow {
    user_id: i64,
    total_points: i64,
    current_streak_days: i32,
    longest_streak_days: i32,
    last_activity_date: Option<NaiveDate>,
}

impl PointsRow {
    fn into_points(self) -> UserPoints {
        UserPoints {
            user_id: self.user_id,
            total_points: self.total_points,
            current_streak_days: self.current_streak_days,
            longest_streak_days: self.longest_streak_days,
            last_activity_date: self.last_activity_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RankedRow {
    rank: i64,
    user_id: i64,
    username: String,
    display_name: Option<String>,
    total_points: i64,
    current_streak_days: i32,
}

impl RankedRow {
    fn into_row(self) -> LeaderboardRow {
        LeaderboardRow {
            rank: self.rank,
            user_id: self.user_id,
            username: self.username,
            display_name: self.display_name,
            total_points: self.total_points,
            current_streak_days: self.current_streak_days,
        }
    }
}

/// PostgreSQL user points repository implementation.
#[derive(Clone)]
pub struct PgUserPointsRepository {
    pool: PgPool,
}

impl PgUserPointsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserPointsRepository for PgUserPointsRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<UserPoints>, AppError> {
        let row = sqlx::query_as::<_, PointsRow>(
            r#"
            SELECT user_id, total_points, current_streak_days, longest_streak_days, last_activity_date
            FROM user_points
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_points()))
    }

    async fn upsert(&self, points: &UserPoints) -> Result<UserPoints, AppError> {
        let row = sqlx::query_as::<_, PointsRow>(
            r#"
            INSERT INTO user_points
                (user_id, total_points, current_streak_days, longest_streak_days, last_activity_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET total_points = EXCLUDED.total_points,
                current_streak_days = EXCLUDED.current_streak_days,
                longest_streak_days = EXCLUDED.longest_streak_days,
                last_activity_date = EXCLUDED.last_activity_date
            RETURNING user_id, total_points, current_streak_days, longest_streak_days, last_activity_date
            "#,
        )
        .bind(points.user_id)
        .bind(points.total_points)
        .bind(points.current_streak_days)
        .bind(points.longest_streak_days)
        .bind(points.last_activity_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_points())
    }

    async fn top_global(&self, limit: i64) -> Result<Vec<LeaderboardRow>, AppError> {
        let rows = sqlx::query_as::<_, RankedRow>(
            r#"
            SELECT RANK() OVER (ORDER BY p.total_points DESC) AS rank,
                   p.user_id, u.username, u.display_name,
                   p.total_points, p.current_streak_days
            FROM user_points p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.total_points DESC, p.user_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_row()).collect())
    }

    async fn top_among(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<LeaderboardRow>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RankedRow>(
            r#"
            SELECT RANK() OVER (ORDER BY p.total_points DESC) AS rank,
                   p.user_id, u.username, u.display_name,
                   p.total_points, p.current_streak_days
            FROM user_points p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = ANY($1)
            ORDER BY p.total_points DESC, p.user_id ASC
            LIMIT $2
            "#,
        )
        .bind(user_ids)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_row()).collect())
    }

    async fn rank_of(&self, user_id: i64) -> Result<Option<i64>, AppError> {
        let rank = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT rank FROM (
                SELECT user_id, RANK() OVER (ORDER BY total_points DESC) AS rank
                FROM user_points
            ) ranked
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rank)
    }
}
