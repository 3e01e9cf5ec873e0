//! Cache Statistics
//!
//! Hit/miss/set counters stored in Redis so that numbers survive restarts
//! and aggregate across instances.

use serde::Serialize;

use super::{keys, Cache, RedisCache};
use crate::shared::error::AppError;

/// Snapshot of cache effectiveness counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: i64,
    pub misses: i64,
    pub sets: i64,
    /// hits / (hits + misses), or 0.0 when no lookups have happened.
    pub hit_rate: f64,
}

/// Tracks cache hit/miss/set counts in Redis.
#[derive(Clone)]
pub struct CacheStatsService {
    cache: RedisCache,
}

impl CacheStatsService {
    pub fn new(cache: RedisCache) -> Self {
        Self { cache }
    }

    pub async fn record_hit(&self) -> Result<(), AppError> {
        self.cache.incr(&format!("{}hits", keys::STATS)).await?;
        Ok(())
    }

    pub async fn record_miss(&self) -> Result<(), AppError> {
        self.cache.incr(&format!("{}misses", keys::STATS)).await?;
        Ok(())
    }

    pub async fn record_set(&self) -> Result<(), AppError> {
        self.cache.incr(&format!("{}sets", keys::STATS)).await?;
        Ok(())
    }

    /// Reads the current counters and derives the hit rate.
    pub async fn snapshot(&self) -> Result<CacheStats, AppError> {
        let hits = self.read_counter("hits").await?;
        let misses = self.read_counter("misses").await?;
        let sets = self.read_counter("sets").await?;

        let lookups = hits + misses;
        let hit_rate = if lookups > 0 {
            hits as f64 / lookups as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            hits,
            misses,
            sets,
            hit_rate,
        })
    }

    async fn read_counter(&self, name: &str) -> Result<i64, AppError> {
        // INCR stores plain integers, which parse as JSON numbers.
        let value: Option<i64> = self.cache.get(&format!("{}{}", keys::STATS, name)).await?;
        Ok(value.unwrap_or(0))
    }
}
