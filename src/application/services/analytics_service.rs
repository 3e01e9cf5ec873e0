//! Session Analytics Service
//!
//! Builds a per-user practice summary from completed sessions: counts by
//! type, time practiced, completion rate, average mood change, and the
//! current day streak. Summaries are cached briefly in Redis.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::services::statistics::mean;
use crate::domain::{UserPoints, UserPointsRepository, WellnessSessionRepository};
use crate::infrastructure::cache::{keys, Cache, CacheStatsService, RedisCache};

/// Summary cache TTL in seconds.
const SUMMARY_TTL_SECS: u64 = 60;

/// Per-type completion count as rendered in the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub session_type: String,
    pub completed: i64,
}

/// Per-user practice summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub completed_sessions: i64,
    pub abandoned_sessions: i64,
    pub by_type: Vec<TypeBreakdown>,
    pub total_active_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_active_secs: Option<f64>,
    /// completed / (completed + abandoned); 0.0 with no finished sessions.
    pub completion_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_mood_delta: Option<f64>,
    pub current_streak_days: i32,
}

/// Analytics service trait
#[async_trait]
pub trait SessionAnalyticsService: Send + Sync {
    /// Build (or fetch from cache) the user's practice summary.
    async fn summary(&self, user_id: i64) -> Result<SessionSummary, AnalyticsError>;
}

/// Analytics service errors
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for AnalyticsError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// SessionAnalyticsService implementation
pub struct SessionAnalyticsServiceImpl<W, P>
where
    W: WellnessSessionRepository,
    P: UserPointsRepository,
{
    session_repo: Arc<W>,
    points_repo: Arc<P>,
    cache: RedisCache,
    cache_stats: CacheStatsService,
}

impl<W, P> SessionAnalyticsServiceImpl<W, P>
where
    W: WellnessSessionRepository,
    P: UserPointsRepository,
{
    pub fn new(
        session_repo: Arc<W>,
        points_repo: Arc<P>,
        cache: RedisCache,
        cache_stats: CacheStatsService,
    ) -> Self {
        Self {
            session_repo,
            points_repo,
            cache,
            cache_stats,
        }
    }

    async fn build_summary(&self, user_id: i64) -> Result<SessionSummary, AnalyticsError> {
        let completed = self.session_repo.list_completed_for_user(user_id).await?;
        let abandoned_sessions = self.session_repo.abandoned_count(user_id).await?;

        let by_type = self
            .session_repo
            .completed_counts_by_type(user_id)
            .await?
            .into_iter()
            .map(|c| TypeBreakdown {
                session_type: c.session_type.as_str().to_string(),
                completed: c.completed,
            })
            .collect();

        let completed_sessions = completed.len() as i64;
        let total_active_secs: i64 = completed.iter().map(|s| s.active_secs).sum();
        let durations: Vec<f64> = completed.iter().map(|s| s.active_secs as f64).collect();
        let mood_deltas: Vec<f64> = completed
            .iter()
            .filter_map(|s| s.mood_delta())
            .map(f64::from)
            .collect();

        let finished = completed_sessions + abandoned_sessions;
        let completion_rate = if finished > 0 {
            completed_sessions as f64 / finished as f64
        } else {
            0.0
        };

        let points = self
            .points_repo
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| UserPoints::new(user_id));
        let current_streak_days = points.effective_streak(Utc::now().date_naive());

        Ok(SessionSummary {
            completed_sessions,
            abandoned_sessions,
            by_type,
            total_active_secs,
            avg_active_secs: mean(&durations),
            completion_rate,
            avg_mood_delta: mean(&mood_deltas),
            current_streak_days,
        })
    }
}

#[async_trait]
impl<W, P> SessionAnalyticsService for SessionAnalyticsServiceImpl<W, P>
where
    W: WellnessSessionRepository + 'static,
    P: UserPointsRepository + 'static,
{
    async fn summary(&self, user_id: i64) -> Result<SessionSummary, AnalyticsError> {
        let key = keys::summary(user_id);

        if let Some(cached) = self
            .cache
            .get::<SessionSummary>(&key)
            .await
            .map_err(|e| AnalyticsError::Internal(e.to_string()))?
        {
            let _ = self.cache_stats.record_hit().await;
            return Ok(cached);
        }
        let _ = self.cache_stats.record_miss().await;

        let summary = self.build_summary(user_id).await?;

        self.cache
            .set_ex(&key, &summary, SUMMARY_TTL_SECS)
            .await
            .map_err(|e| AnalyticsError::Internal(e.to_string()))?;
        let _ = self.cache_stats.record_set().await;

        Ok(summary)
    }
}
