//! Leaderboard Service
//!
//! Points leaderboards, global and friends-only, with the requesting user's
//! own rank. The global board is cached briefly in Redis.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::GamificationSettings;
use crate::domain::{FriendshipRepository, LeaderboardRow, UserPointsRepository};
use crate::infrastructure::cache::{keys, Cache, CacheStatsService, RedisCache};

/// Global leaderboard cache TTL in seconds.
const LEADERBOARD_TTL_SECS: u64 = 30;

/// Leaderboard scope requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardScope {
    Global,
    Friends,
}

impl LeaderboardScope {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global" => Some(Self::Global),
            "friends" => Some(Self::Friends),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Friends => "friends",
        }
    }
}

/// A scored leaderboard with the caller's rank.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub scope: LeaderboardScope,
    pub entries: Vec<LeaderboardRow>,
    pub my_rank: Option<i64>,
}

/// Leaderboard service trait
#[async_trait]
pub trait LeaderboardService: Send + Sync {
    /// The leaderboard at the requested scope, viewed by `user_id`.
    async fn leaderboard(
        &self,
        user_id: i64,
        scope: LeaderboardScope,
        limit: Option<i64>,
    ) -> Result<Leaderboard, LeaderboardError>;
}

/// Leaderboard service errors
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Unknown leaderboard scope")]
    UnknownScope,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for LeaderboardError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// LeaderboardService implementation
pub struct LeaderboardServiceImpl<P, F>
where
    P: UserPointsRepository,
    F: FriendshipRepository,
{
    points_repo: Arc<P>,
    friendship_repo: Arc<F>,
    cache: RedisCache,
    cache_stats: CacheStatsService,
    settings: GamificationSettings,
}

impl<P, F> LeaderboardServiceImpl<P, F>
where
    P: UserPointsRepository,
    F: FriendshipRepository,
{
    pub fn new(
        points_repo: Arc<P>,
        friendship_repo: Arc<F>,
        cache: RedisCache,
        cache_stats: CacheStatsService,
        settings: GamificationSettings,
    ) -> Self {
        Self {
            points_repo,
            friendship_repo,
            cache,
            cache_stats,
            settings,
        }
    }

    async fn global_rows(&self, limit: i64) -> Result<Vec<LeaderboardRow>, LeaderboardError> {
        let key = keys::leaderboard_global();

        if let Some(cached) = self
            .cache
            .get::<Vec<LeaderboardRow>>(&key)
            .await
            .map_err(|e| LeaderboardError::Internal(e.to_string()))?
        {
            let _ = self.cache_stats.record_hit().await;
            if cached.len() >= limit as usize {
                return Ok(cached.into_iter().take(limit as usize).collect());
            }
        } else {
            let _ = self.cache_stats.record_miss().await;
        }

        let rows = self.points_repo.top_global(limit).await?;

        self.cache
            .set_ex(&key, &rows, LEADERBOARD_TTL_SECS)
            .await
            .map_err(|e| LeaderboardError::Internal(e.to_string()))?;
        let _ = self.cache_stats.record_set().await;

        Ok(rows)
    }
}

#[async_trait]
impl<P, F> LeaderboardService for LeaderboardServiceImpl<P, F>
where
    P: UserPointsRepository + 'static,
    F: FriendshipRepository + 'static,
{
    async fn leaderboard(
        &self,
        user_id: i64,
        scope: LeaderboardScope,
        limit: Option<i64>,
    ) -> Result<Leaderboard, LeaderboardError> {
        let limit = limit
            .unwrap_or(self.settings.leaderboard_size)
            .clamp(1, 100);

        let entries = match scope {
            LeaderboardScope::Global => self.global_rows(limit).await?,
            LeaderboardScope::Friends => {
                // Friends boards always include the viewer.
                let mut ids = self.friendship_repo.accepted_friend_ids(user_id).await?;
                ids.push(user_id);
                self.points_repo.top_among(&ids, limit).await?
            }
        };

        let my_rank = match scope {
            LeaderboardScope::Global => self.points_repo.rank_of(user_id).await?,
            LeaderboardScope::Friends => entries
                .iter()
                .find(|row| row.user_id == user_id)
                .map(|row| row.rank),
        };

        Ok(Leaderboard {
            scope,
            entries,
            my_rank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parsing() {
        assert_eq!(LeaderboardScope::from_str("global"), Some(LeaderboardScope::Global));
        assert_eq!(LeaderboardScope::from_str("Friends"), Some(LeaderboardScope::Friends));
        assert_eq!(LeaderboardScope::from_str("galaxy"), None);
    }
}
