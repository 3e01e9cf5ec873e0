//! Stress Service
//!
//! Records stress check-ins and computes the stress analysis: descriptive
//! statistics over recent assessments plus a trend label.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::services::statistics::{label_trend, mean, std_dev, Trend};
use crate::domain::{StressAssessment, StressAssessmentRepository};
use crate::shared::snowflake::SnowflakeGenerator;

/// Default number of assessments considered by the analysis.
const ANALYSIS_WINDOW: i64 = 30;

/// New assessment payload.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub stress_level: i16,
    pub anxiety_level: Option<i16>,
    pub sleep_quality: Option<i16>,
    pub energy_level: Option<i16>,
    pub notes: Option<String>,
}

/// Computed stress analysis over recent assessments.
#[derive(Debug, Clone, Serialize)]
pub struct StressAnalysis {
    pub assessment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_stress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev_stress: Option<f64>,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_stress: Option<i16>,
}

/// Stress service trait
#[async_trait]
pub trait StressService: Send + Sync {
    /// Record a new assessment.
    async fn create_assessment(
        &self,
        user_id: i64,
        new: NewAssessment,
    ) -> Result<StressAssessment, StressError>;

    /// Recent assessments for a user, oldest first.
    async fn list_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<StressAssessment>, StressError>;

    /// Statistics and trend over the user's recent assessments.
    async fn analyze(&self, user_id: i64) -> Result<StressAnalysis, StressError>;
}

/// Stress service errors
#[derive(Debug, thiserror::Error)]
pub enum StressError {
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for StressError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// StressService implementation
pub struct StressServiceImpl<R>
where
    R: StressAssessmentRepository,
{
    assessment_repo: Arc<R>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R> StressServiceImpl<R>
where
    R: StressAssessmentRepository,
{
    pub fn new(assessment_repo: Arc<R>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            assessment_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<R> StressService for StressServiceImpl<R>
where
    R: StressAssessmentRepository + 'static,
{
    async fn create_assessment(
        &self,
        user_id: i64,
        new: NewAssessment,
    ) -> Result<StressAssessment, StressError> {
        let mut assessment =
            StressAssessment::new(self.id_generator.generate(), user_id, new.stress_level);
        assessment.anxiety_level = new.anxiety_level;
        assessment.sleep_quality = new.sleep_quality;
        assessment.energy_level = new.energy_level;
        assessment.notes = new.notes;

        Ok(self.assessment_repo.create(&assessment).await?)
    }

    async fn list_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<StressAssessment>, StressError> {
        Ok(self
            .assessment_repo
            .list_for_user(user_id, limit.clamp(1, 100))
            .await?)
    }

    async fn analyze(&self, user_id: i64) -> Result<StressAnalysis, StressError> {
        let assessments = self
            .assessment_repo
            .list_for_user(user_id, ANALYSIS_WINDOW)
            .await?;

        let levels: Vec<f64> = assessments.iter().map(|a| a.stress_level as f64).collect();

        Ok(StressAnalysis {
            assessment_count: assessments.len(),
            mean_stress: mean(&levels),
            std_dev_stress: std_dev(&levels),
            trend: label_trend(&levels),
            latest_stress: assessments.last().map(|a| a.stress_level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serializes_trend_lowercase() {
        let analysis = StressAnalysis {
            assessment_count: 0,
            mean_stress: None,
            std_dev_stress: None,
            trend: Trend::Stable,
            latest_stress: None,
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"trend\":\"stable\""));
    }
}
