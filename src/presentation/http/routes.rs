//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, rate_limit_api, rate_limit_auth, track_http_metrics,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Cache counters
        .route("/cache/stats", get(handlers::health::cache_stats))
        .layer(middleware::from_fn(track_http_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes (auth has its own stricter rate limiting)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes (require authentication)
        .nest("/users", user_routes(state.clone()))
        .nest("/sessions", session_routes(state.clone()))
        .nest("/breathing", breathing_routes(state.clone()))
        .nest("/stress", stress_routes(state.clone()))
        .nest("/journal", journal_routes(state.clone()))
        .nest("/friends", friend_routes(state.clone()))
        .nest("/groups", group_routes(state.clone()))
        .nest("/notifications", notification_routes(state.clone()))
        .merge(gamification_routes(state.clone()))
        .merge(analytics_routes(state.clone()))
        // Apply API rate limiting to all API routes
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}

/// Authentication routes (public, with stricter rate limiting)
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_auth))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/@me", patch(handlers::user::update_current_user))
        .route("/@me", delete(handlers::user::delete_current_user))
        .route("/{user_id}", get(handlers::user::get_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Wellness session routes (protected)
fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::session::start_session))
        .route("/", get(handlers::session::list_sessions))
        .route("/{session_id}", get(handlers::session::get_session))
        .route("/{session_id}/pause", post(handlers::session::pause_session))
        .route("/{session_id}/resume", post(handlers::session::resume_session))
        .route(
            "/{session_id}/complete",
            post(handlers::session::complete_session),
        )
        .route(
            "/{session_id}/abandon",
            post(handlers::session::abandon_session),
        )
        .route(
            "/{session_id}/cycles",
            post(handlers::breathing::record_cycles),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Breathing exercise routes (protected)
fn breathing_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/patterns", get(handlers::breathing::list_patterns))
        .route("/stats", get(handlers::breathing::pattern_stats))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stress assessment routes (protected)
fn stress_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/assessments", post(handlers::stress::create_assessment))
        .route("/assessments", get(handlers::stress::list_assessments))
        .route("/analysis", get(handlers::stress::analyze))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Journal routes (protected)
fn journal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::journal::create_entry))
        .route("/", get(handlers::journal::list_entries))
        .route("/{entry_id}", get(handlers::journal::get_entry))
        .route("/{entry_id}", patch(handlers::journal::update_entry))
        .route("/{entry_id}", delete(handlers::journal::delete_entry))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Gamification routes (protected)
fn gamification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/achievements", get(handlers::gamification::list_achievements))
        .route(
            "/achievements/earned",
            get(handlers::gamification::list_earned),
        )
        .route("/points", get(handlers::gamification::get_points))
        .route("/leaderboard", get(handlers::gamification::get_leaderboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Analytics routes (protected)
fn analytics_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(handlers::analytics::summary))
        .route(
            "/recommendations",
            get(handlers::analytics::recommendations),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Friendship routes (protected)
fn friend_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::friend::list_friends))
        .route("/requests", post(handlers::friend::send_request))
        .route("/requests", get(handlers::friend::list_pending))
        .route(
            "/requests/{request_id}/accept",
            post(handlers::friend::accept_request),
        )
        .route(
            "/requests/{request_id}/decline",
            post(handlers::friend::decline_request),
        )
        .route("/{user_id}", delete(handlers::friend::remove_friend))
        .route("/{user_id}/block", post(handlers::friend::block_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Group session routes (protected)
fn group_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::group::create_group))
        .route("/", get(handlers::group::list_upcoming))
        .route("/{session_id}", get(handlers::group::get_group))
        .route("/{session_id}/join", post(handlers::group::join_group))
        .route("/{session_id}/leave", post(handlers::group::leave_group))
        .route("/{session_id}/start", post(handlers::group::start_group))
        .route(
            "/{session_id}/complete",
            post(handlers::group::complete_group),
        )
        .route("/{session_id}/cancel", post(handlers::group::cancel_group))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Notification routes (protected)
fn notification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::notification::list_notifications))
        .route(
            "/{notification_id}/read",
            post(handlers::notification::mark_read),
        )
        .route("/read-all", post(handlers::notification::mark_all_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
