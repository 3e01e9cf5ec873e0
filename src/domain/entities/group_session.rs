//! Group session entity and repository trait.
//!
//! Maps to the `group_sessions` table plus the `group_participants` join
//! table. A host schedules a shared practice; others join up to capacity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use super::wellness_session::SessionType;

/// Group session lifecycle status.
///
/// Scheduled -> Active -> Completed; Scheduled -> Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupSessionStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl GroupSessionStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check whether the lifecycle permits moving to `next`.
    pub fn can_transition_to(&self, next: GroupSessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Active)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::Active, Self::Completed)
        )
    }
}

/// A scheduled shared wellness session.
///
/// Maps to the `group_sessions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - host_id: BIGINT NOT NULL REFERENCES users(id)
/// - title: VARCHAR(120) NOT NULL
/// - description: TEXT NULL
/// - session_type: VARCHAR(20) NOT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'scheduled'
/// - scheduled_at: TIMESTAMPTZ NOT NULL
/// - duration_secs: INT NOT NULL
/// - max_participants: INT NOT NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSession {
    pub id: i64,
    pub host_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub session_type: SessionType,
    pub status: GroupSessionStatus,
    pub scheduled_at: DateTime<Utc>,
    pub duration_secs: i32,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupSession {
    /// Guarded lifecycle transition.
    pub fn transition_to(&mut self, next: GroupSessionStatus) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot move group session from {} to {}",
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether new participants may still join.
    pub fn is_joinable(&self) -> bool {
        matches!(self.status, GroupSessionStatus::Scheduled | GroupSessionStatus::Active)
    }
}

/// Repository trait for group session data access.
#[async_trait]
pub trait GroupSessionRepository: Send + Sync {
    /// Find a group session by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<GroupSession>, AppError>;

    /// Persist a new group session, enrolling the host as a participant.
    async fn create(&self, session: &GroupSession) -> Result<GroupSession, AppError>;

    /// Update status and metadata.
    async fn update(&self, session: &GroupSession) -> Result<GroupSession, AppError>;

    /// Upcoming (scheduled or active) sessions, soonest first.
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<GroupSession>, AppError>;

    /// Participant user IDs for a session.
    async fn participant_ids(&self, session_id: i64) -> Result<Vec<i64>, AppError>;

    /// Number of enrolled participants.
    async fn participant_count(&self, session_id: i64) -> Result<i64, AppError>;

    /// Enroll a participant. Returns false if already enrolled.
    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Remove a participant. Returns false if they were not enrolled.
    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled() -> GroupSession {
        let now = Utc::now();
        GroupSession {
            id: 1,
            host_id: 10,
            title: "Morning breathing".into(),
            description: None,
            session_type: SessionType::Breathing,
            status: GroupSessionStatus::Scheduled,
            scheduled_at: now,
            duration_secs: 900,
            max_participants: 8,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_scheduled_to_active_to_completed() {
        let mut session = scheduled();
        session.transition_to(GroupSessionStatus::Active).unwrap();
        session.transition_to(GroupSessionStatus::Completed).unwrap();
        assert_eq!(session.status, GroupSessionStatus::Completed);
    }

    #[test]
    fn test_cancel_only_while_scheduled() {
        let mut session = scheduled();
        session.transition_to(GroupSessionStatus::Active).unwrap();
        assert!(session.transition_to(GroupSessionStatus::Cancelled).is_err());
    }

    #[test]
    fn test_completed_is_not_joinable() {
        let mut session = scheduled();
        assert!(session.is_joinable());
        session.transition_to(GroupSessionStatus::Active).unwrap();
        session.transition_to(GroupSessionStatus::Completed).unwrap();
        assert!(!session.is_joinable());
    }
}
