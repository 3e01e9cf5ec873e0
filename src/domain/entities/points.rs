//! User points entity and repository trait.
//!
//! Maps to the `user_points` table. One row per user, tracking total points
//! and day-streak counters used by achievements and the leaderboard.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Accumulated points and streak state for a user.
///
/// Maps to the `user_points` table:
/// - user_id: BIGINT PRIMARY KEY REFERENCES users(id)
/// - total_points: BIGINT NOT NULL DEFAULT 0
/// - current_streak_days / longest_streak_days: INT NOT NULL DEFAULT 0
/// - last_activity_date: DATE NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPoints {
    pub user_id: i64,
    pub total_points: i64,
    pub current_streak_days: i32,
    pub longest_streak_days: i32,
    pub last_activity_date: Option<NaiveDate>,
}

impl UserPoints {
    /// Fresh row for a user with no activity yet.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            total_points: 0,
            current_streak_days: 0,
            longest_streak_days: 0,
            last_activity_date: None,
        }
    }

    /// Add points and roll the streak forward for activity on `today`.
    ///
    /// Same-day activity keeps the streak, next-day extends it, and any
    /// gap resets it to 1.
    pub fn record_activity(&mut self, points: i64, today: NaiveDate) {
        self.total_points += points;

        self.current_streak_days = match self.last_activity_date {
            Some(last) if last == today => self.current_streak_days,
            Some(last) if last.succ_opt() == Some(today) => self.current_streak_days + 1,
            _ => 1,
        };

        if self.current_streak_days > self.longest_streak_days {
            self.longest_streak_days = self.current_streak_days;
        }
        self.last_activity_date = Some(today);
    }

    /// Current streak, treating a streak broken before `today` as 0.
    pub fn effective_streak(&self, today: NaiveDate) -> i32 {
        match self.last_activity_date {
            Some(last) if last == today || last.succ_opt() == Some(today) => {
                self.current_streak_days
            }
            _ => 0,
        }
    }
}

impl Default for UserPoints {
    fn default() -> Self {
        Self::new(0)
    }
}

/// One row of a points leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub total_points: i64,
    pub current_streak_days: i32,
}

/// Repository trait for user points data access.
#[async_trait]
pub trait UserPointsRepository: Send + Sync {
    /// Fetch a user's points row, if one exists.
    async fn find_by_user(&self, user_id: i64) -> Result<Option<UserPoints>, AppError>;

    /// Insert or update a user's points row.
    async fn upsert(&self, points: &UserPoints) -> Result<UserPoints, AppError>;

    /// Top rows by total points across all users.
    async fn top_global(&self, limit: i64) -> Result<Vec<LeaderboardRow>, AppError>;

    /// Top rows by total points restricted to the given user IDs.
    async fn top_among(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<LeaderboardRow>, AppError>;

    /// A user's global rank by total points (1-based), if they have points.
    async fn rank_of(&self, user_id: i64) -> Result<Option<i64>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let mut points = UserPoints::new(1);
        points.record_activity(20, date(2026, 3, 1));

        assert_eq!(points.total_points, 20);
        assert_eq!(points.current_streak_days, 1);
        assert_eq!(points.longest_streak_days, 1);
    }

    #[test]
    fn test_same_day_activity_keeps_streak() {
        let mut points = UserPoints::new(1);
        points.record_activity(20, date(2026, 3, 1));
        points.record_activity(15, date(2026, 3, 1));

        assert_eq!(points.total_points, 35);
        assert_eq!(points.current_streak_days, 1);
    }

    #[test]
    fn test_next_day_extends_streak() {
        let mut points = UserPoints::new(1);
        points.record_activity(20, date(2026, 3, 1));
        points.record_activity(20, date(2026, 3, 2));
        points.record_activity(20, date(2026, 3, 3));

        assert_eq!(points.current_streak_days, 3);
        assert_eq!(points.longest_streak_days, 3);
    }

    #[test]
    fn test_gap_resets_streak_but_keeps_longest() {
        let mut points = UserPoints::new(1);
        points.record_activity(20, date(2026, 3, 1));
        points.record_activity(20, date(2026, 3, 2));
        points.record_activity(20, date(2026, 3, 5));

        assert_eq!(points.current_streak_days, 1);
        assert_eq!(points.longest_streak_days, 2);
    }

    #[test]
    fn test_effective_streak_zero_after_gap() {
        let mut points = UserPoints::new(1);
        points.record_activity(20, date(2026, 3, 1));

        assert_eq!(points.effective_streak(date(2026, 3, 2)), 1);
        assert_eq!(points.effective_streak(date(2026, 3, 4)), 0);
    }
}
