//! Stress Assessment Repository Implementation
//!
//! PostgreSQL implementation of the StressAssessmentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{StressAssessment, StressAssessmentRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AssessmentRow {
    id: i64,
    user_id: i64,
    stress_level: i16,
    anxiety_level: Option<i16>,
    sleep_quality: Option<i16>,
    energy_level: Option<i16>,
    notes: Option<String>,
    assessed_at: DateTime<Utc>,
}

impl AssessmentRow {
    fn into_assessment(self) -> StressAssessment {
        StressAssessment {
            id: self.id,
            user_id: self.user_id,
            stress_level: self.stress_level,
            anxiety_level: self.anxiety_level,
            sleep_quality: self.sleep_quality,
            energy_level: self.energy_level,
            notes: self.notes,
            assessed_at: self.assessed_at,
        }
    }
}

const ASSESSMENT_COLUMNS: &str =
    "id, user_id, stress_level, anxiety_level, sleep_quality, energy_level, notes, assessed_at";

/// PostgreSQL stress assessment repository implementation.
#[derive(Clone)]
pub struct PgStressAssessmentRepository {
    pool: PgPool,
}

impl PgStressAssessmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StressAssessmentRepository for PgStressAssessmentRepository {
    async fn create(&self, assessment: &StressAssessment) -> Result<StressAssessment, AppError> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            INSERT INTO stress_assessments
                (id, user_id, stress_level, anxiety_level, sleep_quality, energy_level, notes, assessed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ASSESSMENT_COLUMNS}
            "#
        ))
        .bind(assessment.id)
        .bind(assessment.user_id)
        .bind(assessment.stress_level)
        .bind(assessment.anxiety_level)
        .bind(assessment.sleep_quality)
        .bind(assessment.energy_level)
        .bind(&assessment.notes)
        .bind(assessment.assessed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_assessment())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<StressAssessment>, AppError> {
        // Oldest first so analysis sees the series in time order.
        let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            SELECT {ASSESSMENT_COLUMNS}
            FROM (
                SELECT {ASSESSMENT_COLUMNS}
                FROM stress_assessments
                WHERE user_id = $1
                ORDER BY assessed_at DESC
                LIMIT $2
            ) recent
            ORDER BY assessed_at ASC
            "#
        ))
        .bind(user_id)
        .bind(limit.clamp(1, 500))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_assessment()).collect())
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<StressAssessment>, AppError> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            SELECT {ASSESSMENT_COLUMNS}
            FROM stress_assessments
            WHERE user_id = $1
            ORDER BY assessed_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_assessment()))
    }
}
