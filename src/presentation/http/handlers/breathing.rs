//! Breathing Exercise Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::RecordCyclesRequest;
use crate::application::dto::response::SessionResponse;
use crate::application::services::{
    BreathingError, BreathingPattern, BreathingService, BreathingServiceImpl, PatternStats,
};
use crate::infrastructure::repositories::PgWellnessSessionRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::user::parse_id;

fn breathing_service(state: &AppState) -> BreathingServiceImpl<PgWellnessSessionRepository> {
    BreathingServiceImpl::new(Arc::new(PgWellnessSessionRepository::new(state.db.clone())))
}

fn map_err(e: BreathingError) -> AppError {
    match e {
        BreathingError::NotFound => AppError::NotFound("Session not found".into()),
        BreathingError::NotOwner => AppError::Forbidden("Session belongs to another user".into()),
        BreathingError::NotBreathing => {
            AppError::BadRequest("Session is not a breathing session".into())
        }
        BreathingError::SessionFinished => AppError::Conflict("Session is already finished".into()),
        BreathingError::InvalidPattern(msg) => AppError::BadRequest(msg),
        BreathingError::Internal(msg) => AppError::Internal(msg),
    }
}

/// The built-in breathing pattern catalog
pub async fn list_patterns(State(state): State<AppState>) -> Json<&'static [BreathingPattern]> {
    Json(breathing_service(&state).patterns())
}

/// Record completed cycles on an open breathing session
pub async fn record_cycles(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
    Json(body): Json<RecordCyclesRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let session_id = parse_id(&session_id)?;

    let session = breathing_service(&state)
        .record_cycles(auth_user.user_id, session_id, body.cycles)
        .await
        .map_err(map_err)?;

    Ok(Json(SessionResponse::from(session)))
}

/// Per-pattern statistics over completed breathing sessions
pub async fn pattern_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<PatternStats>>, AppError> {
    let stats = breathing_service(&state)
        .pattern_stats(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(stats))
}
