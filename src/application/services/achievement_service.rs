//! Achievement Service
//!
//! Awards points for completed sessions, maintains day streaks, and checks
//! catalog achievements against the user's counts after each completion.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::GamificationSettings;
use crate::domain::{
    Achievement, AchievementCategory, AchievementRepository, Notification, NotificationKind,
    NotificationRepository, UserPoints, UserPointsRepository, WellnessSession,
    WellnessSessionRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Achievement service trait
#[async_trait]
pub trait AchievementService: Send + Sync {
    /// The full achievement catalog.
    async fn list_catalog(&self) -> Result<Vec<Achievement>, AchievementError>;

    /// Achievements the user has earned, with timestamps.
    async fn list_earned(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Achievement, chrono::DateTime<Utc>)>, AchievementError>;

    /// The user's points and streak row (zeroed if none yet).
    async fn get_points(&self, user_id: i64) -> Result<UserPoints, AchievementError>;

    /// Award session points, roll the streak, and check achievements.
    ///
    /// Called by the session service after a session reaches Completed.
    async fn handle_session_completed(
        &self,
        session: &WellnessSession,
    ) -> Result<CompletionAward, AchievementError>;
}

/// Outcome of the award pass after a completed session.
#[derive(Debug, Clone)]
pub struct CompletionAward {
    /// Points granted for the session itself (duration + bonus).
    pub session_points: i64,
    /// Achievements newly earned by this completion.
    pub new_achievements: Vec<Achievement>,
    /// Points state after all awards.
    pub points: UserPoints,
}

/// Achievement service errors
#[derive(Debug, thiserror::Error)]
pub enum AchievementError {
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for AchievementError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// AchievementService implementation
pub struct AchievementServiceImpl<A, P, W, N>
where
    A: AchievementRepository,
    P: UserPointsRepository,
    W: WellnessSessionRepository,
    N: NotificationRepository,
{
    achievement_repo: Arc<A>,
    points_repo: Arc<P>,
    session_repo: Arc<W>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
    settings: GamificationSettings,
}

impl<A, P, W, N> AchievementServiceImpl<A, P, W, N>
where
    A: AchievementRepository,
    P: UserPointsRepository,
    W: WellnessSessionRepository,
    N: NotificationRepository,
{
    pub fn new(
        achievement_repo: Arc<A>,
        points_repo: Arc<P>,
        session_repo: Arc<W>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
        settings: GamificationSettings,
    ) -> Self {
        Self {
            achievement_repo,
            points_repo,
            session_repo,
            notification_repo,
            id_generator,
            settings,
        }
    }

    /// Points for one completed session: per-minute rate plus a flat bonus.
    fn session_points(&self, session: &WellnessSession) -> i64 {
        let minutes = session.active_secs / 60;
        minutes * self.settings.points_per_minute + self.settings.completion_bonus
    }

    /// The count an achievement's threshold is checked against.
    fn progress_value(
        &self,
        achievement: &Achievement,
        total_completed: i64,
        type_counts: &[(crate::domain::SessionType, i64)],
        streak: i32,
    ) -> i64 {
        match achievement.category {
            AchievementCategory::TotalSessions => total_completed,
            AchievementCategory::TypeSessions => achievement
                .session_type
                .and_then(|t| type_counts.iter().find(|(ty, _)| *ty == t))
                .map(|(_, n)| *n)
                .unwrap_or(0),
            AchievementCategory::Streak => streak as i64,
        }
    }
}

#[async_trait]
impl<A, P, W, N> AchievementService for AchievementServiceImpl<A, P, W, N>
where
    A: AchievementRepository + 'static,
    P: UserPointsRepository + 'static,
    W: WellnessSessionRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn list_catalog(&self) -> Result<Vec<Achievement>, AchievementError> {
        Ok(self.achievement_repo.list_all().await?)
    }

    async fn list_earned(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Achievement, chrono::DateTime<Utc>)>, AchievementError> {
        Ok(self.achievement_repo.list_earned(user_id).await?)
    }

    async fn get_points(&self, user_id: i64) -> Result<UserPoints, AchievementError> {
        let points = self
            .points_repo
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| UserPoints::new(user_id));
        Ok(points)
    }

    async fn handle_session_completed(
        &self,
        session: &WellnessSession,
    ) -> Result<CompletionAward, AchievementError> {
        let user_id = session.user_id;
        let today = Utc::now().date_naive();

        // 1. Session points and streak.
        let session_points = self.session_points(session);
        let mut points = self
            .points_repo
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| UserPoints::new(user_id));
        points.record_activity(session_points, today);

        // 2. Gather progress figures after this completion.
        let total_completed = self.session_repo.completed_count(user_id).await?;
        let type_counts: Vec<_> = self
            .session_repo
            .completed_counts_by_type(user_id)
            .await?
            .into_iter()
            .map(|c| (c.session_type, c.completed))
            .collect();
        let streak = points.current_streak_days;

        // 3. Check unearned achievements against those figures.
        let catalog = self.achievement_repo.list_all().await?;
        let earned_ids = self.achievement_repo.earned_ids(user_id).await?;

        let mut new_achievements = Vec::new();
        for achievement in catalog {
            if earned_ids.contains(&achievement.id) {
                continue;
            }
            let value = self.progress_value(&achievement, total_completed, &type_counts, streak);
            if !achievement.is_satisfied_by(value) {
                continue;
            }
            // award() is idempotent; only a fresh award pays out.
            if self.achievement_repo.award(user_id, achievement.id).await? {
                points.total_points += achievement.points;
                new_achievements.push(achievement);
            }
        }

        let points = self.points_repo.upsert(&points).await?;

        // 4. Notify about each new achievement.
        for achievement in &new_achievements {
            let notification = Notification::new(
                self.id_generator.generate(),
                user_id,
                NotificationKind::Achievement,
                format!("Achievement unlocked: {}", achievement.name),
            );
            self.notification_repo.create(&notification).await?;
        }

        Ok(CompletionAward {
            session_points,
            new_achievements,
            points,
        })
    }
}
