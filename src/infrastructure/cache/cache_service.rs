//! Cache Service
//!
//! Generic cache trait and Redis implementation for application-wide caching.
//!
//! This module provides:
//! - A `Cache` trait defining common caching operations
//! - A `RedisCache` implementation using Redis as the backing store
//! - JSON serialization/deserialization for complex types

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::shared::error::AppError;

/// Generic cache trait for abstracting cache operations.
///
/// All operations are async and return `Result<T, AppError>` for proper
/// error handling.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Retrieves a value from the cache by key.
    ///
    /// # Returns
    /// * `Ok(Some(T))` - If the key exists and deserialization succeeds
    /// * `Ok(None)` - If the key does not exist
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Stores a value in the cache without expiration.
    async fn set<T: Serialize + Sync + Send>(&self, key: &str, value: &T) -> Result<(), AppError>;

    /// Stores a value in the cache with an expiration time in seconds.
    async fn set_ex<T: Serialize + Sync + Send>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), AppError>;

    /// Deletes a key from the cache. Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Checks if a key exists in the cache.
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Increments an integer value stored at the key.
    ///
    /// If the key does not exist, it is set to 0 before incrementing.
    async fn incr(&self, key: &str) -> Result<i64, AppError>;

    /// Increments an integer value by a specific amount.
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, AppError>;

    /// Sets an expiration time on an existing key.
    ///
    /// # Returns
    /// * `Ok(true)` - If the expiration was set
    /// * `Ok(false)` - If the key does not exist
    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, AppError>;

    /// Retrieves the TTL of a key in seconds, or None if the key is
    /// missing or has no expiration.
    async fn ttl(&self, key: &str) -> Result<Option<i64>, AppError>;
}

/// Redis-backed cache implementation.
///
/// Uses a Redis ConnectionManager for efficient connection pooling and
/// automatic reconnection handling.
#[derive(Clone)]
pub struct RedisCache {
    /// Redis connection manager with automatic reconnection
    conn: ConnectionManager,
    /// Optional key prefix for namespacing
    prefix: Option<Arc<str>>,
}

impl RedisCache {
    /// Creates a new RedisCache instance.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn, prefix: None }
    }

    /// Creates a new RedisCache instance with a key prefix.
    ///
    /// All keys will be automatically prefixed, useful for logical
    /// separation of data.
    pub fn with_prefix(conn: ConnectionManager, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            conn,
            prefix: Some(prefix.into()),
        }
    }

    /// Formats a key with the optional prefix.
    fn format_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Serializes a value to JSON string.
    fn serialize<T: Serialize>(value: &T) -> Result<String, AppError> {
        serde_json::to_string(value).map_err(|e| {
            warn!("Cache serialization error: {}", e);
            AppError::Internal(format!("Cache serialization failed: {}", e))
        })
    }

    /// Deserializes a JSON string to the target type.
    fn deserialize<T: DeserializeOwned>(data: &str) -> Result<T, AppError> {
        serde_json::from_str(data).map_err(|e| {
            warn!("Cache deserialization error: {}", e);
            AppError::Internal(format!("Cache deserialization failed: {}", e))
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    #[instrument(skip(self), level = "debug")]
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&full_key).await?;

        match result {
            Some(data) => {
                debug!(key = %full_key, "Cache hit");
                let value = Self::deserialize(&data)?;
                Ok(Some(value))
            }
            None => {
                debug!(key = %full_key, "Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set<T: Serialize + Sync + Send>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let full_key = self.format_key(key);
        let data = Self::serialize(value)?;
        let mut conn = self.conn.clone();

        let _: () = conn.set(&full_key, data).await?;
        debug!(key = %full_key, "Cache set");

        Ok(())
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_ex<T: Serialize + Sync + Send>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), AppError> {
        let full_key = self.format_key(key);
        let data = Self::serialize(value)?;
        let mut conn = self.conn.clone();

        let _: () = conn.set_ex(&full_key, data, seconds).await?;
        debug!(key = %full_key, ttl = seconds, "Cache set with expiry");

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let deleted: u64 = conn.del(&full_key).await?;
        let existed = deleted > 0;

        debug!(key = %full_key, deleted = existed, "Cache delete");

        Ok(existed)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let exists: bool = conn.exists(&full_key).await?;
        debug!(key = %full_key, exists = exists, "Cache exists check");

        Ok(exists)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr(&self, key: &str) -> Result<i64, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let value: i64 = conn.incr(&full_key, 1).await?;
        debug!(key = %full_key, value = value, "Cache increment");

        Ok(value)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let value: i64 = conn.incr(&full_key, delta).await?;
        debug!(key = %full_key, value = value, delta = delta, "Cache increment by");

        Ok(value)
    }

    #[instrument(skip(self), level = "debug")]
    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        // Redis EXPIRE returns 1 if timeout was set, 0 if key does not exist
        let result: i32 = conn.expire(&full_key, seconds as i64).await?;
        let success = result == 1;

        debug!(key = %full_key, seconds = seconds, success = success, "Cache expire");

        Ok(success)
    }

    #[instrument(skip(self), level = "debug")]
    async fn ttl(&self, key: &str) -> Result<Option<i64>, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let ttl: i64 = conn.ttl(&full_key).await?;

        // Redis TTL returns:
        // -2 if key does not exist
        // -1 if key exists but has no expiration
        // positive value for remaining seconds
        let result = match ttl {
            -2 => None,
            -1 => None,
            _ => Some(ttl),
        };

        debug!(key = %full_key, ttl = ?result, "Cache TTL check");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Connection-level behavior is covered by integration tests; these
    // exercise the pure serialization helpers.

    #[test]
    fn test_serialize_roundtrip() {
        let data = vec![1i64, 2, 3];
        let json = RedisCache::serialize(&data).unwrap();
        let back: Vec<i64> = RedisCache::deserialize(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let result: Result<Vec<i64>, AppError> = RedisCache::deserialize("not json");
        assert!(result.is_err());
    }
}
