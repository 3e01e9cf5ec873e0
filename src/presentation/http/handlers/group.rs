//! Group Session Handlers
//!
//! Scheduled group sessions: create, browse, join/leave, and the
//! host-gated lifecycle.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateGroupRequest, ListQueryParams};
use crate::application::dto::response::GroupSessionResponse;
use crate::application::services::{
    GroupError, GroupSessionService, GroupSessionServiceImpl, GroupSessionView, NewGroupSession,
};
use crate::domain::SessionType;
use crate::infrastructure::repositories::{PgGroupSessionRepository, PgNotificationRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::user::parse_id;

fn group_service(
    state: &AppState,
) -> GroupSessionServiceImpl<PgGroupSessionRepository, PgNotificationRepository> {
    GroupSessionServiceImpl::new(
        Arc::new(PgGroupSessionRepository::new(state.db.clone())),
        Arc::new(PgNotificationRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_err(e: GroupError) -> AppError {
    match e {
        GroupError::NotFound => AppError::NotFound("Group session not found".into()),
        GroupError::NotHost => AppError::Forbidden("Only the host may do this".into()),
        GroupError::Full => AppError::Conflict("Group session is full".into()),
        GroupError::NotJoinable => AppError::Conflict("Group session cannot be joined".into()),
        GroupError::AlreadyJoined => AppError::Conflict("Already joined".into()),
        GroupError::NotParticipant => AppError::Conflict("Not a participant".into()),
        GroupError::HostCannotLeave => {
            AppError::Conflict("Host cannot leave their own session".into())
        }
        GroupError::ScheduledInPast => {
            AppError::BadRequest("Scheduled time must be in the future".into())
        }
        GroupError::Conflict(msg) => AppError::Conflict(msg),
        GroupError::Internal(msg) => AppError::Internal(msg),
    }
}

fn to_response(view: GroupSessionView) -> GroupSessionResponse {
    GroupSessionResponse::from_session(view.session, view.participant_count)
}

/// Schedule a new group session
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupSessionResponse>), AppError> {
    body.validate()
        .map_err(validation_error)?;

    let session_type = SessionType::from_str(&body.session_type).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown session type: {}", body.session_type))
    })?;

    let new = NewGroupSession {
        title: body.title,
        description: body.description,
        session_type,
        scheduled_at: body.scheduled_at,
        duration_secs: body.duration_secs,
        max_participants: body.max_participants,
    };

    let view = group_service(&state)
        .create(auth_user.user_id, new)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(to_response(view))))
}

/// Upcoming group sessions, soonest first
pub async fn list_upcoming(
    State(state): State<AppState>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<Vec<GroupSessionResponse>>, AppError> {
    let views = group_service(&state)
        .list_upcoming(params.limit.unwrap_or(20))
        .await
        .map_err(map_err)?;

    Ok(Json(views.into_iter().map(to_response).collect()))
}

/// Fetch a group session with its enrollment count
pub async fn get_group(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<GroupSessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let view = group_service(&state)
        .get(session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(to_response(view)))
}

/// Join a joinable group session
pub async fn join_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<GroupSessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let view = group_service(&state)
        .join(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(to_response(view)))
}

/// Leave a group session
pub async fn leave_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id = parse_id(&session_id)?;

    group_service(&state)
        .leave(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Host starts the session
pub async fn start_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<GroupSessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let view = group_service(&state)
        .start(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(to_response(view)))
}

/// Host completes a running session
pub async fn complete_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<GroupSessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let view = group_service(&state)
        .complete(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(to_response(view)))
}

/// Host cancels a scheduled session
pub async fn cancel_group(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<GroupSessionResponse>, AppError> {
    let session_id = parse_id(&session_id)?;

    let view = group_service(&state)
        .cancel(auth_user.user_id, session_id)
        .await
        .map_err(map_err)?;

    Ok(Json(to_response(view)))
}
