//! Analytics Handlers
//!
//! Practice summaries and session type recommendations.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::application::services::{
    AnalyticsError, Recommendation, RecommendationError, RecommendationService,
    RecommendationServiceImpl, SessionAnalyticsService, SessionAnalyticsServiceImpl,
    SessionSummary,
};
use crate::infrastructure::repositories::{
    PgStressAssessmentRepository, PgUserPointsRepository, PgWellnessSessionRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn analytics_service(
    state: &AppState,
) -> SessionAnalyticsServiceImpl<PgWellnessSessionRepository, PgUserPointsRepository> {
    SessionAnalyticsServiceImpl::new(
        Arc::new(PgWellnessSessionRepository::new(state.db.clone())),
        Arc::new(PgUserPointsRepository::new(state.db.clone())),
        state.cache.clone(),
        state.cache_stats.clone(),
    )
}

fn recommendation_service(
    state: &AppState,
) -> RecommendationServiceImpl<PgWellnessSessionRepository, PgStressAssessmentRepository> {
    RecommendationServiceImpl::new(
        Arc::new(PgWellnessSessionRepository::new(state.db.clone())),
        Arc::new(PgStressAssessmentRepository::new(state.db.clone())),
    )
}

/// The user's practice summary (cached)
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = analytics_service(&state)
        .summary(auth_user.user_id)
        .await
        .map_err(|AnalyticsError::Internal(msg)| AppError::Internal(msg))?;

    Ok(Json(summary))
}

/// Ordered session type suggestions
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let recommendations = recommendation_service(&state)
        .recommend(auth_user.user_id)
        .await
        .map_err(|RecommendationError::Internal(msg)| AppError::Internal(msg))?;

    Ok(Json(recommendations))
}
