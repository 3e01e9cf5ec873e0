//! Friendship Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::application::dto::request::CreateFriendRequest;
use crate::application::dto::response::{FriendshipResponse, UserResponse};
use crate::application::services::{FriendError, FriendService, FriendServiceImpl};
use crate::infrastructure::repositories::{
    PgFriendshipRepository, PgNotificationRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::user::parse_id;

fn friend_service(
    state: &AppState,
) -> FriendServiceImpl<PgFriendshipRepository, PgUserRepository, PgNotificationRepository> {
    FriendServiceImpl::new(
        Arc::new(PgFriendshipRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgNotificationRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_err(e: FriendError) -> AppError {
    match e {
        FriendError::SelfRequest => AppError::BadRequest("Cannot befriend yourself".into()),
        FriendError::UserNotFound => AppError::NotFound("User not found".into()),
        FriendError::AlreadyExists => AppError::Conflict("Friendship already exists".into()),
        FriendError::Blocked => AppError::Forbidden("User is blocked".into()),
        FriendError::RequestNotFound => AppError::NotFound("Friend request not found".into()),
        FriendError::NotAddressee => {
            AppError::Forbidden("Request is not addressed to you".into())
        }
        FriendError::NotPending => AppError::Conflict("Request is not pending".into()),
        FriendError::NotFriends => AppError::NotFound("Friendship not found".into()),
        FriendError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Send a friend request
pub async fn send_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateFriendRequest>,
) -> Result<(StatusCode, Json<FriendshipResponse>), AppError> {
    let addressee_id = parse_id(&body.user_id)?;

    let friendship = friend_service(&state)
        .send_request(auth_user.user_id, addressee_id)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(FriendshipResponse::from(friendship))))
}

/// Accept a pending friend request
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let request_id = parse_id(&request_id)?;

    let friendship = friend_service(&state)
        .accept_request(auth_user.user_id, request_id)
        .await
        .map_err(map_err)?;

    Ok(Json(FriendshipResponse::from(friendship)))
}

/// Decline a pending friend request
pub async fn decline_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let request_id = parse_id(&request_id)?;

    let friendship = friend_service(&state)
        .decline_request(auth_user.user_id, request_id)
        .await
        .map_err(map_err)?;

    Ok(Json(FriendshipResponse::from(friendship)))
}

/// Block a user, dropping any existing relationship
pub async fn block_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(target_id): Path<String>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let target_id = parse_id(&target_id)?;

    let friendship = friend_service(&state)
        .block_user(auth_user.user_id, target_id)
        .await
        .map_err(map_err)?;

    Ok(Json(FriendshipResponse::from(friendship)))
}

/// Remove an accepted friend
pub async fn remove_friend(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(friend_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let friend_id = parse_id(&friend_id)?;

    friend_service(&state)
        .remove_friend(auth_user.user_id, friend_id)
        .await
        .map_err(map_err)?;

    Ok(StatusCode::NO_CONTENT)
}

/// The user's accepted friends
pub async fn list_friends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let friends = friend_service(&state)
        .list_friends(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(
        friends
            .into_iter()
            .map(|user| UserResponse::from_user(user, false))
            .collect(),
    ))
}

/// Pending requests addressed to the user
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<FriendshipResponse>>, AppError> {
    let pending = friend_service(&state)
        .list_pending(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(
        pending.into_iter().map(FriendshipResponse::from).collect(),
    ))
}
