//! Wellness Session Handlers
//!
//! Session lifecycle endpoints. Completion additionally runs the points
//! and achievement award pass and reports its results.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CompleteSessionRequest, SessionQueryParams, StartSessionRequest,
};
use crate::application::dto::response::{CompletionResponse, SessionResponse};
use crate::application::services::{
    AchievementServiceImpl, SessionError, SessionService, SessionServiceImpl,
};
use crate::domain::{SessionFilter, SessionStatus, SessionType};
use crate::infrastructure::repositories::{
    PgAchievementRepository, PgNotificationRepository, PgUserPointsRepository,
    PgWellnessSessionRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::user::parse_id;

type AchievementServiceAlias = AchievementServiceImpl<
    PgAchievementRepository,
    PgUserPointsRepository,
    PgWellnessSessionRepository,
    PgNotificationRepository,
>;

pub(super) fn achievement_service(state: &AppState) -> AchievementServiceAlias {
    AchievementServiceImpl::new(
        Arc::new(PgAchievementRepository::new(state.db.clone())),
        Arc::new(PgUserPointsRepository::new(state.db.clone())),
        Arc::new(PgWellnessSessionRepository::new(state.db.clone())),
        Arc::new(PgNotificationRepository::new(state.db.clone())),
        state.snowflake.clone(),
        state.settings.gamification.clone(),
    )
}

fn session_service(
    state: &AppState,
) -> SessionServiceImpl<PgWellnessSessionRepository, AchievementServiceAlias> {
    SessionServiceImpl::new(
        Arc::new(PgWellnessSessionRepository::new(state.db.clone())),
        Arc::new(achievement_service(state)),
        state.snowflake.clone(),
    )
}

fn map_err(e: SessionError) -> AppError {
    match e {
        SessionError::NotFound => AppError::NotFound("Session not found".into()),
        SessionError::NotOwner => AppError::Forbidden("Session belongs to another user".into()),
        SessionError::AlreadyOpen => {
            AppError::Conflict("An active or paused session already exists".into())
        }
        SessionError::InvalidDetail(msg) => AppError::BadRequest(msg),
        SessionError::InvalidTransition { from, to } => {
            AppError::Conflict(format!("Cannot transition session from {} to {}", from, to))
        }
        SessionError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Start a new wellness session
pub async fn start_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    body.validate()
        .map_err(validation_error)?;

    let session = session_service(&state)
        .start_session(
            auth_user.user_id,
            body.detail,
            body.planned_duration_secs,
            body.mood_before,
        )
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// List the authenticated user's sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<SessionQueryParams>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let session_type = match params.session_type.as_deref() {
        Some(raw) => Some(
            SessionType::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown session type: {}", raw)))?,
        ),
        None => None,
    };

    let status = match params.status.as_deref() {
        Some(raw @ ("active" | "paused" | "completed" | "abandoned")) => {
            Some(SessionStatus::from_str(raw))
        }
        Some(raw) => {
            return Err(AppError::BadRequest(format!(
                "Unknown session status: {}",
                raw
            )))
        }
        None => None,
    };

    let filter = SessionFilter {
        session_type,
        status,
        limit: params.limit,
    };

    let sessions = session_service(&state)
        .list_sessions(auth_user.user_id, filter)
        .await
        .map_err(map_err)?;

    Ok(Json(
        sessions.into_iter().map(SessionResponse::from).collect(),
    ))
}

/// Fetch one session
pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let session = session_service(&state)
        .get_session(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SessionResponse::from(session)))
}

/// Pause an active session
pub async fn pause_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let session = session_service(&state)
        .pause_session(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SessionResponse::from(session)))
}

/// Resume a paused session
pub async fn resume_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let session = session_service(&state)
        .resume_session(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SessionResponse::from(session)))
}

/// Complete a session and run the award pass
pub async fn complete_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
    Json(body): Json<CompleteSessionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let session_id = parse_id(&session_id)?;

    let (session, award) = session_service(&state)
        .complete_session(auth_user.user_id, session_id, body.mood_after, body.notes)
        .await
        .map_err(map_err)?;

    Ok(Json(CompletionResponse::new(session, award)))
}

/// Abandon an open session
pub async fn abandon_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let session = session_service(&state)
        .abandon_session(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SessionResponse::from(session)))
}
