//! Cache Module
//!
//! Redis connection management and caching utilities.
//!
//! This module provides:
//! - Redis connection management with automatic reconnection
//! - A generic `Cache` trait for abstracting cache operations
//! - A `RedisCache` implementation backed by a ConnectionManager
//! - Predefined key prefixes for consistent cache key naming
//! - A `CacheStatsService` tracking hit/miss counters
//!
//! # Example
//!
//! ```rust,ignore
//! use wellness_server::infrastructure::cache::{Cache, RedisCache, create_redis_client};
//! use wellness_server::config::RedisSettings;
//!
//! let settings = RedisSettings { url: "redis://localhost:6379".into() };
//! let conn = create_redis_client(&settings).await?;
//! let cache = RedisCache::new(conn);
//!
//! cache.set_ex("leaderboard:global", &rows, 60).await?;
//! let rows: Option<Vec<LeaderboardRow>> = cache.get("leaderboard:global").await?;
//! ```

mod cache_service;
mod cache_stats;

pub use cache_service::{Cache, RedisCache};
pub use cache_stats::{CacheStats, CacheStatsService};

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
///
/// The connection manager handles connection pooling and automatic
/// reconnection when the connection is lost.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Cache key prefixes for different data types.
///
/// Use these constants to ensure consistent key naming across the application.
pub mod keys {
    /// Prefix for leaderboard snapshots (e.g., "leaderboard:global")
    pub const LEADERBOARD: &str = "leaderboard:";

    /// Prefix for per-user analytics summaries (e.g., "summary:user_id")
    pub const SUMMARY: &str = "summary:";

    /// Prefix for rate limiting counters (e.g., "ratelimit:scope:ip")
    pub const RATE_LIMIT: &str = "ratelimit:";

    /// Prefix for cache hit/miss statistics counters
    pub const STATS: &str = "cache:stats:";

    /// Generates the global leaderboard key
    #[inline]
    pub fn leaderboard_global() -> String {
        format!("{}global", LEADERBOARD)
    }

    /// Generates an analytics summary key for a user
    #[inline]
    pub fn summary(user_id: impl std::fmt::Display) -> String {
        format!("{}{}", SUMMARY, user_id)
    }

    /// Generates a rate limit key scoped by limiter name and client
    #[inline]
    pub fn rate_limit(scope: &str, client: impl std::fmt::Display) -> String {
        format!("{}{}:{}", RATE_LIMIT, scope, client)
    }
}
