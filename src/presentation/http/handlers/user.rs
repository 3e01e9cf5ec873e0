//! User Profile Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::UpdateUserRequest;
use crate::application::dto::response::UserResponse;
use crate::application::services::{
    UpdateProfileDto, UserError, UserService, UserServiceImpl,
};
use crate::infrastructure::repositories::PgUserRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn user_service(state: &AppState) -> UserServiceImpl<PgUserRepository> {
    UserServiceImpl::new(Arc::new(PgUserRepository::new(state.db.clone())))
}

fn map_err(e: UserError) -> AppError {
    match e {
        UserError::NotFound => AppError::NotFound("User not found".into()),
        UserError::UsernameTaken => AppError::Conflict("Username already taken".into()),
        UserError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Parse a string path segment as a snowflake ID
pub(super) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid ID format".into()))
}

/// Get the authenticated user's profile
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service(&state)
        .get_user(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Update the authenticated user's profile
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let update = UpdateProfileDto {
        username: body.username,
        display_name: body.display_name,
        avatar_url: body.avatar_url,
        bio: body.bio,
        timezone: body.timezone,
    };

    let user = user_service(&state)
        .update_profile(auth_user.user_id, update)
        .await
        .map_err(map_err)?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Delete the authenticated user's account
pub async fn delete_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    user_service(&state)
        .delete_user(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get another user's public profile (no email)
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_id(&user_id)?;

    let user = user_service(&state)
        .get_user(user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(UserResponse::from_user(user, false)))
}
