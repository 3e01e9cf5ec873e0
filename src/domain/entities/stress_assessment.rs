//! Stress assessment entity and repository trait.
//!
//! Maps to the `stress_assessments` table. Point-in-time self-reports used
//! by the stress analysis and recommendation services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A self-reported stress check-in (all levels on a 1-10 scale).
///
/// Maps to the `stress_assessments` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - stress_level: SMALLINT NOT NULL
/// - anxiety_level / sleep_quality / energy_level: SMALLINT NULL
/// - notes: TEXT NULL
/// - assessed_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressAssessment {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owner of the assessment
    pub user_id: i64,

    /// Overall stress (1 = calm, 10 = overwhelmed)
    pub stress_level: i16,

    /// Anxiety level, if reported
    pub anxiety_level: Option<i16>,

    /// Last night's sleep quality, if reported
    pub sleep_quality: Option<i16>,

    /// Current energy level, if reported
    pub energy_level: Option<i16>,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the check-in was recorded
    pub assessed_at: DateTime<Utc>,
}

impl StressAssessment {
    /// Create a new assessment recorded now.
    pub fn new(id: i64, user_id: i64, stress_level: i16) -> Self {
        Self {
            id,
            user_id,
            stress_level,
            anxiety_level: None,
            sleep_quality: None,
            energy_level: None,
            notes: None,
            assessed_at: Utc::now(),
        }
    }
}

/// Repository trait for stress assessment data access.
#[async_trait]
pub trait StressAssessmentRepository: Send + Sync {
    /// Persist a new assessment.
    async fn create(&self, assessment: &StressAssessment) -> Result<StressAssessment, AppError>;

    /// List a user's assessments, oldest first, capped at `limit`.
    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<StressAssessment>, AppError>;

    /// The user's most recent assessment, if any.
    async fn latest_for_user(&self, user_id: i64) -> Result<Option<StressAssessment>, AppError>;
}
