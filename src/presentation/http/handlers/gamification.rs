//! Gamification Handlers
//!
//! Achievement catalog, earned achievements, points and leaderboards.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::application::dto::request::LeaderboardQueryParams;
use crate::application::dto::response::{
    AchievementResponse, LeaderboardEntryResponse, LeaderboardResponse, PointsResponse,
};
use crate::application::services::{
    AchievementError, AchievementService, LeaderboardError, LeaderboardScope,
    LeaderboardService, LeaderboardServiceImpl,
};
use crate::infrastructure::repositories::{PgFriendshipRepository, PgUserPointsRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::session::achievement_service;

fn leaderboard_service(
    state: &AppState,
) -> LeaderboardServiceImpl<PgUserPointsRepository, PgFriendshipRepository> {
    LeaderboardServiceImpl::new(
        Arc::new(PgUserPointsRepository::new(state.db.clone())),
        Arc::new(PgFriendshipRepository::new(state.db.clone())),
        state.cache.clone(),
        state.cache_stats.clone(),
        state.settings.gamification.clone(),
    )
}

fn map_achievement_err(e: AchievementError) -> AppError {
    match e {
        AchievementError::Internal(msg) => AppError::Internal(msg),
    }
}

fn map_leaderboard_err(e: LeaderboardError) -> AppError {
    match e {
        LeaderboardError::UnknownScope => AppError::BadRequest("Unknown leaderboard scope".into()),
        LeaderboardError::Internal(msg) => AppError::Internal(msg),
    }
}

/// The full achievement catalog
pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<AchievementResponse>>, AppError> {
    let catalog = achievement_service(&state)
        .list_catalog()
        .await
        .map_err(map_achievement_err)?;

    Ok(Json(
        catalog
            .into_iter()
            .map(AchievementResponse::from_achievement)
            .collect(),
    ))
}

/// Achievements the user has earned
pub async fn list_earned(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<AchievementResponse>>, AppError> {
    let earned = achievement_service(&state)
        .list_earned(auth_user.user_id)
        .await
        .map_err(map_achievement_err)?;

    Ok(Json(
        earned
            .into_iter()
            .map(|(achievement, earned_at)| AchievementResponse::earned(achievement, earned_at))
            .collect(),
    ))
}

/// The user's points and streaks
pub async fn get_points(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<PointsResponse>, AppError> {
    let points = achievement_service(&state)
        .get_points(auth_user.user_id)
        .await
        .map_err(map_achievement_err)?;

    Ok(Json(PointsResponse::from(points)))
}

/// The leaderboard at the requested scope
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<LeaderboardQueryParams>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let scope = match params.scope.as_deref() {
        Some(raw) => LeaderboardScope::from_str(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown leaderboard scope: {}", raw)))?,
        None => LeaderboardScope::Global,
    };

    let leaderboard = leaderboard_service(&state)
        .leaderboard(auth_user.user_id, scope, params.limit)
        .await
        .map_err(map_leaderboard_err)?;

    Ok(Json(LeaderboardResponse {
        scope: leaderboard.scope.as_str().to_string(),
        entries: leaderboard
            .entries
            .into_iter()
            .map(LeaderboardEntryResponse::from)
            .collect(),
        my_rank: leaderboard.my_rank,
    }))
}
