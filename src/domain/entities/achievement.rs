//! Achievement entities and repository trait.
//!
//! Maps to the `achievements` catalog table and the `user_achievements`
//! join table recording which user earned what, and when.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use super::wellness_session::SessionType;

/// What an achievement threshold counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Total completed sessions of any type
    TotalSessions,
    /// Completed sessions of one specific type
    TypeSessions,
    /// Consecutive-day activity streak
    Streak,
}

impl AchievementCategory {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "total_sessions" => Some(Self::TotalSessions),
            "type_sessions" => Some(Self::TypeSessions),
            "streak" => Some(Self::Streak),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSessions => "total_sessions",
            Self::TypeSessions => "type_sessions",
            Self::Streak => "streak",
        }
    }
}

/// An achievement definition from the catalog.
///
/// Maps to the `achievements` table:
/// - id: BIGINT PRIMARY KEY
/// - code: VARCHAR(64) NOT NULL UNIQUE (stable machine name)
/// - name / description: VARCHAR / TEXT NOT NULL
/// - category: VARCHAR(32) NOT NULL
/// - session_type: VARCHAR(20) NULL (only for type_sessions category)
/// - threshold: INT NOT NULL
/// - points: BIGINT NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub session_type: Option<SessionType>,
    pub threshold: i32,
    pub points: i64,
}

impl Achievement {
    /// Whether `value` (a count or streak length) satisfies this achievement.
    pub fn is_satisfied_by(&self, value: i64) -> bool {
        value >= self.threshold as i64
    }
}

/// An achievement earned by a user.
///
/// Maps to the `user_achievements` table:
/// - user_id + achievement_id: composite PRIMARY KEY
/// - earned_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAchievement {
    pub user_id: i64,
    pub achievement_id: i64,
    pub earned_at: DateTime<Utc>,
}

/// Repository trait for achievement data access.
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// The full achievement catalog.
    async fn list_all(&self) -> Result<Vec<Achievement>, AppError>;

    /// Achievements a user has earned, with earn timestamps.
    async fn list_earned(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Achievement, DateTime<Utc>)>, AppError>;

    /// IDs of achievements the user already holds.
    async fn earned_ids(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Record that a user earned an achievement. Idempotent on conflict.
    async fn award(&self, user_id: i64, achievement_id: i64) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_satisfied_by() {
        let achievement = Achievement {
            id: 1,
            code: "sessions_10".into(),
            name: "Dedicated".into(),
            description: "Complete 10 sessions".into(),
            category: AchievementCategory::TotalSessions,
            session_type: None,
            threshold: 10,
            points: 50,
        };

        assert!(!achievement.is_satisfied_by(9));
        assert!(achievement.is_satisfied_by(10));
        assert!(achievement.is_satisfied_by(11));
    }

    #[test]
    fn test_category_roundtrip() {
        for category in [
            AchievementCategory::TotalSessions,
            AchievementCategory::TypeSessions,
            AchievementCategory::Streak,
        ] {
            assert_eq!(
                AchievementCategory::from_str(category.as_str()),
                Some(category)
            );
        }
    }
}
