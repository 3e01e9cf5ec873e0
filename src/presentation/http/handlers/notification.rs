//! Notification Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::application::dto::request::ListQueryParams;
use crate::application::dto::response::NotificationResponse;
use crate::application::services::{
    NotificationError, NotificationService, NotificationServiceImpl,
};
use crate::infrastructure::repositories::PgNotificationRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::user::parse_id;

fn notification_service(state: &AppState) -> NotificationServiceImpl<PgNotificationRepository> {
    NotificationServiceImpl::new(Arc::new(PgNotificationRepository::new(state.db.clone())))
}

fn map_err(e: NotificationError) -> AppError {
    match e {
        NotificationError::NotFound => AppError::NotFound("Notification not found".into()),
        NotificationError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Notification list with the unread count alongside
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
}

/// The user's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<NotificationListResponse>, AppError> {
    let service = notification_service(&state);

    let notifications = service
        .list(auth_user.user_id, params.limit.unwrap_or(50))
        .await
        .map_err(map_err)?;
    let unread_count = service
        .unread_count(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(NotificationListResponse {
        notifications: notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
        unread_count,
    }))
}

/// Mark one notification read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(notification_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let notification_id = parse_id(&notification_id)?;

    notification_service(&state)
        .mark_read(auth_user.user_id, notification_id)
        .await
        .map_err(map_err)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Marked-count response for bulk reads
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: i64,
}

/// Mark all of the user's notifications read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let marked = notification_service(&state)
        .mark_all_read(auth_user.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(MarkAllReadResponse { marked }))
}
