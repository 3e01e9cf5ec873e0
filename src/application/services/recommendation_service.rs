//! Recommendation Service
//!
//! Suggests session types to try next, based on how often the user has
//! practiced each type and their most recent stress level.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    SessionType, StressAssessmentRepository, WellnessSessionRepository,
};

/// Stress level at or above which calming work is suggested first.
const HIGH_STRESS_THRESHOLD: i16 = 7;

/// Maximum number of recommendations returned.
const MAX_RECOMMENDATIONS: usize = 3;

/// One recommended session type with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub session_type: String,
    pub reason: String,
}

/// Recommendation service trait
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Ordered session type suggestions for the user.
    async fn recommend(&self, user_id: i64) -> Result<Vec<Recommendation>, RecommendationError>;
}

/// Recommendation service errors
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for RecommendationError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// RecommendationService implementation
pub struct RecommendationServiceImpl<W, S>
where
    W: WellnessSessionRepository,
    S: StressAssessmentRepository,
{
    session_repo: Arc<W>,
    assessment_repo: Arc<S>,
}

impl<W, S> RecommendationServiceImpl<W, S>
where
    W: WellnessSessionRepository,
    S: StressAssessmentRepository,
{
    pub fn new(session_repo: Arc<W>, assessment_repo: Arc<S>) -> Self {
        Self {
            session_repo,
            assessment_repo,
        }
    }
}

#[async_trait]
impl<W, S> RecommendationService for RecommendationServiceImpl<W, S>
where
    W: WellnessSessionRepository + 'static,
    S: StressAssessmentRepository + 'static,
{
    async fn recommend(&self, user_id: i64) -> Result<Vec<Recommendation>, RecommendationError> {
        let counts = self.session_repo.completed_counts_by_type(user_id).await?;
        let latest_stress = self
            .assessment_repo
            .latest_for_user(user_id)
            .await?
            .map(|a| a.stress_level);

        // Completed count per type, zero-filled for types never practiced.
        let count_of = |t: SessionType| -> i64 {
            counts
                .iter()
                .find(|c| c.session_type == t)
                .map(|c| c.completed)
                .unwrap_or(0)
        };

        let mut recommendations: Vec<Recommendation> = Vec::new();

        fn push(list: &mut Vec<Recommendation>, t: SessionType, reason: String) {
            if !list.iter().any(|r| r.session_type == t.as_str()) {
                list.push(Recommendation {
                    session_type: t.as_str().to_string(),
                    reason,
                });
            }
        }

        // High recent stress puts calming work first.
        if let Some(level) = latest_stress {
            if level >= HIGH_STRESS_THRESHOLD {
                push(
                    &mut recommendations,
                    SessionType::Breathing,
                    format!("Your last stress check-in was {level}/10; a breathing session can bring it down quickly"),
                );
                push(
                    &mut recommendations,
                    SessionType::Stress,
                    "Working through the trigger in a stress-management session may help".to_string(),
                );
            }
        }

        // Then favor the least-practiced types for balance.
        let mut by_frequency: Vec<SessionType> = SessionType::all().to_vec();
        by_frequency.sort_by_key(|t| count_of(*t));

        for session_type in by_frequency {
            if recommendations.len() >= MAX_RECOMMENDATIONS {
                break;
            }
            let count = count_of(session_type);
            let reason = if count == 0 {
                format!("You haven't tried a {session_type} session yet")
            } else {
                format!("Your least practiced type, with {count} completed")
            };
            push(&mut recommendations, session_type, reason);
        }

        recommendations.truncate(MAX_RECOMMENDATIONS);
        Ok(recommendations)
    }
}
