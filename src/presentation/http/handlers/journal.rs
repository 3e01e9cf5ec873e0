//! Journal Entry Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateJournalRequest, ListQueryParams, UpdateJournalRequest,
};
use crate::application::dto::response::JournalResponse;
use crate::application::services::{
    EntryUpdate, JournalError, JournalService, JournalServiceImpl, NewEntry,
};
use crate::infrastructure::repositories::PgJournalRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::user::parse_id;

fn journal_service(state: &AppState) -> JournalServiceImpl<PgJournalRepository> {
    JournalServiceImpl::new(
        Arc::new(PgJournalRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_err(e: JournalError) -> AppError {
    match e {
        JournalError::NotFound => AppError::NotFound("Journal entry not found".into()),
        JournalError::NotOwner => {
            AppError::Forbidden("Journal entry belongs to another user".into())
        }
        JournalError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Create a journal entry
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateJournalRequest>,
) -> Result<(StatusCode, Json<JournalResponse>), AppError> {
    body.validate()
        .map_err(validation_error)?;

    let new = NewEntry {
        title: body.title,
        content: body.content,
        mood: body.mood,
        tags: body.tags,
    };

    let entry = journal_service(&state)
        .create_entry(auth_user.user_id, new)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(JournalResponse::from(entry))))
}

/// List the user's entries, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<Vec<JournalResponse>>, AppError> {
    let entries = journal_service(&state)
        .list_entries(auth_user.user_id, params.limit.unwrap_or(20))
        .await
        .map_err(map_err)?;

    Ok(Json(entries.into_iter().map(JournalResponse::from).collect()))
}

/// Fetch one entry
pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<Json<JournalResponse>, AppError> {
    let entry_id = parse_id(&entry_id)?;

    let entry = journal_service(&state)
        .get_entry(auth_user.user_id, entry_id)
        .await
        .map_err(map_err)?;

    Ok(Json(JournalResponse::from(entry)))
}

/// Update one entry
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
    Json(body): Json<UpdateJournalRequest>,
) -> Result<Json<JournalResponse>, AppError> {
    body.validate()
        .map_err(validation_error)?;

    let entry_id = parse_id(&entry_id)?;

    let update = EntryUpdate {
        title: body.title,
        content: body.content,
        mood: body.mood,
        tags: body.tags,
    };

    let entry = journal_service(&state)
        .update_entry(auth_user.user_id, entry_id, update)
        .await
        .map_err(map_err)?;

    Ok(Json(JournalResponse::from(entry)))
}

/// Delete one entry
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let entry_id = parse_id(&entry_id)?;

    journal_service(&state)
        .delete_entry(auth_user.user_id, entry_id)
        .await
        .map_err(map_err)?;

    Ok(StatusCode::NO_CONTENT)
}
