//! Rate Limiting Middleware
//!
//! Redis-backed fixed-window rate limiting. Counters live in Redis so the
//! limits hold across multiple server instances.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::infrastructure::cache::{keys, Cache};
use crate::presentation::middleware::auth::AuthUser;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

/// Scope of the rate limit, each with its own counter namespace and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    /// Authentication endpoints. Strict, to slow down credential stuffing.
    Auth,
    /// Standard API endpoints.
    Api,
}

impl RateLimitScope {
    fn name(&self) -> &'static str {
        match self {
            RateLimitScope::Auth => "auth",
            RateLimitScope::Api => "api",
        }
    }

    fn limit(&self, settings: &crate::config::RateLimitSettings) -> u32 {
        match self {
            RateLimitScope::Auth => settings.auth_requests_per_window,
            RateLimitScope::Api => settings.api_requests_per_window,
        }
    }
}

/// Rate limit status attached to responses as `X-RateLimit-*` headers.
#[derive(Debug, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the window resets
    pub reset_at: i64,
}

#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

/// Rate limiting middleware for authentication endpoints.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, RateLimitScope::Auth).await
}

/// Rate limiting middleware for standard API endpoints.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, RateLimitScope::Api).await
}

async fn rate_limit_inner(
    state: AppState,
    request: Request,
    next: Next,
    scope: RateLimitScope,
) -> Response {
    let identifier = extract_identifier(&request);

    let window_seconds = state.settings.rate_limit.window_seconds;
    let limit = scope.limit(&state.settings.rate_limit);
    let key = keys::rate_limit(scope.name(), &identifier);

    // Fixed window: first INCR in a window creates the key, EXPIRE bounds it.
    // On Redis failure the request is allowed; rate limiting is best-effort.
    let count = match state.cache.incr(&key).await {
        Ok(count) => {
            if count == 1 {
                let _ = state.cache.expire(&key, window_seconds).await;
            }
            count
        }
        Err(e) => {
            tracing::error!("Rate limiter Redis error: {}", e);
            return next.run(request).await;
        }
    };

    let reset_at = match state.cache.ttl(&key).await {
        Ok(Some(ttl)) if ttl > 0 => Utc::now().timestamp() + ttl,
        _ => Utc::now().timestamp() + window_seconds as i64,
    };

    let info = RateLimitInfo {
        limit,
        remaining: limit.saturating_sub(count.min(u32::MAX as i64) as u32),
        reset_at,
    };

    if count > limit as i64 {
        tracing::warn!(
            identifier = %identifier,
            scope = scope.name(),
            "Rate limit exceeded"
        );
        return create_rate_limit_response(info);
    }

    let mut response = next.run(request).await;
    add_rate_limit_headers(response.headers_mut(), &info);
    response
}

/// Extract the rate limit identifier from a request.
///
/// Authenticated user ID when present, otherwise the client IP
/// (X-Forwarded-For from a proxy, then the connection address that
/// `into_make_service_with_connect_info` stashes in the extensions).
fn extract_identifier(request: &Request) -> String {
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return format!("ip:{}", ip);
            }
        }
    }

    match request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
    {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

fn add_rate_limit_headers(headers: &mut header::HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

fn create_rate_limit_response(info: RateLimitInfo) -> Response {
    let retry_after = (info.reset_at - Utc::now().timestamp()).max(0);

    let body = RateLimitExceededResponse {
        error: ErrorResponse {
            code: 20006,
            message: "You are being rate limited. Please slow down.".to_string(),
            errors: None,
        },
        rate_limit: RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
        },
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(v) = header::HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, v);
    }
    add_rate_limit_headers(
        response.headers_mut(),
        &RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
        },
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names() {
        assert_eq!(RateLimitScope::Auth.name(), "auth");
        assert_eq!(RateLimitScope::Api.name(), "api");
    }

    #[test]
    fn test_identifier_from_extensions() {
        let mut request = Request::new(axum::body::Body::empty());
        assert_eq!(extract_identifier(&request), "ip:unknown");

        let addr: SocketAddr = "10.1.2.3:5000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(extract_identifier(&request), "ip:10.1.2.3");

        request.extensions_mut().insert(AuthUser { user_id: 42 });
        assert_eq!(extract_identifier(&request), "user:42");
    }

    #[test]
    fn test_identifier_prefers_forwarded_for_over_connect_info() {
        let mut request = Request::new(axum::body::Body::empty());
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        let addr: SocketAddr = "10.1.2.3:5000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(extract_identifier(&request), "ip:203.0.113.9");
    }

    #[test]
    fn test_scope_limits_from_settings() {
        let settings = crate::config::RateLimitSettings {
            api_requests_per_window: 60,
            auth_requests_per_window: 5,
            window_seconds: 60,
        };
        assert_eq!(RateLimitScope::Api.limit(&settings), 60);
        assert_eq!(RateLimitScope::Auth.limit(&settings), 5);
    }
}
