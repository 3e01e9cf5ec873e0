//! Wellness session entity and repository trait.
//!
//! Maps to the `wellness_sessions` table. All session subtypes (meditation,
//! breathing, PMR, stress management) share one table, distinguished by the
//! `session_type` discriminator column with subtype payload stored as JSONB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Session subtype discriminator matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Meditation,
    Breathing,
    Pmr,
    Stress,
}

impl SessionType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "meditation" => Some(Self::Meditation),
            "breathing" => Some(Self::Breathing),
            "pmr" => Some(Self::Pmr),
            "stress" => Some(Self::Stress),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meditation => "meditation",
            Self::Breathing => "breathing",
            Self::Pmr => "pmr",
            Self::Stress => "stress",
        }
    }

    /// All known session types.
    pub fn all() -> [SessionType; 4] {
        [Self::Meditation, Self::Breathing, Self::Pmr, Self::Stress]
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session lifecycle status.
///
/// Transitions:
/// - Active -> Paused | Completed | Abandoned
/// - Paused -> Active | Abandoned
/// - Completed and Abandoned are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Abandoned,
}

impl SessionStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "paused" => Self::Paused,
            "completed" => Self::Completed,
            "abandoned" => Self::Abandoned,
            _ => Self::Active,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Check whether the lifecycle permits moving to `next`.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Paused)
                | (Self::Active, Self::Completed)
                | (Self::Active, Self::Abandoned)
                | (Self::Paused, Self::Active)
                | (Self::Paused, Self::Abandoned)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error raised when a lifecycle transition is not permitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot transition session from {from} to {to}")]
pub struct InvalidTransition {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// Subtype-specific payload, stored as tagged JSON in the `detail` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionDetail {
    Meditation {
        technique: String,
        guided: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        background_sound: Option<String>,
    },
    Breathing {
        pattern: String,
        inhale_secs: u16,
        hold_secs: u16,
        exhale_secs: u16,
        target_cycles: u32,
        completed_cycles: u32,
    },
    Pmr {
        muscle_groups_total: u16,
        muscle_groups_completed: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        tension_before: Option<i16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tension_after: Option<i16>,
    },
    Stress {
        #[serde(skip_serializing_if = "Option::is_none")]
        trigger: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        coping_strategy: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stress_before: Option<i16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stress_after: Option<i16>,
    },
}

impl SessionDetail {
    /// Discriminator value this payload belongs to.
    pub fn session_type(&self) -> SessionType {
        match self {
            Self::Meditation { .. } => SessionType::Meditation,
            Self::Breathing { .. } => SessionType::Breathing,
            Self::Pmr { .. } => SessionType::Pmr,
            Self::Stress { .. } => SessionType::Stress,
        }
    }
}

/// A timed wellness activity (meditation, breathing, PMR, stress management).
///
/// Maps to the `wellness_sessions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - session_type: VARCHAR(20) NOT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'active'
/// - planned_duration_secs: INT NULL
/// - active_secs: BIGINT NOT NULL DEFAULT 0
/// - mood_before / mood_after: SMALLINT NULL (1-10)
/// - notes: TEXT NULL
/// - detail: JSONB NOT NULL (tagged subtype payload)
/// - started_at / last_resumed_at: TIMESTAMPTZ NOT NULL
/// - paused_at / completed_at: TIMESTAMPTZ NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessSession {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owner of the session
    pub user_id: i64,

    /// Subtype discriminator
    pub session_type: SessionType,

    /// Lifecycle status
    pub status: SessionStatus,

    /// Intended session length, if the user set one
    pub planned_duration_secs: Option<i32>,

    /// Accumulated active time, excluding paused intervals
    pub active_secs: i64,

    /// Self-reported mood before the session (1-10)
    pub mood_before: Option<i16>,

    /// Self-reported mood after the session (1-10)
    pub mood_after: Option<i16>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Subtype payload
    pub detail: SessionDetail,

    /// When the session was started
    pub started_at: DateTime<Utc>,

    /// Start of the current active interval
    pub last_resumed_at: DateTime<Utc>,

    /// When the session was paused (None while active)
    pub paused_at: Option<DateTime<Utc>>,

    /// When the session reached a terminal status
    pub completed_at: Option<DateTime<Utc>>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl WellnessSession {
    /// Start a new session owned by `user_id`.
    pub fn start(
        id: i64,
        user_id: i64,
        detail: SessionDetail,
        planned_duration_secs: Option<i32>,
        mood_before: Option<i16>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            session_type: detail.session_type(),
            status: SessionStatus::Active,
            planned_duration_secs,
            active_secs: 0,
            mood_before,
            mood_after: None,
            notes: None,
            detail,
            started_at: now,
            last_resumed_at: now,
            paused_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Guarded transition to `next`, updating timestamps and accumulated time.
    pub fn transition_to(&mut self, next: SessionStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        let now = Utc::now();

        // Close out the current active interval when leaving Active.
        if self.status == SessionStatus::Active {
            self.active_secs += (now - self.last_resumed_at).num_seconds().max(0);
        }

        match next {
            SessionStatus::Active => {
                self.last_resumed_at = now;
                self.paused_at = None;
            }
            SessionStatus::Paused => {
                self.paused_at = Some(now);
            }
            SessionStatus::Completed | SessionStatus::Abandoned => {
                self.paused_at = None;
                self.completed_at = Some(now);
            }
        }

        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Whether the session is in a terminal status.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mood change (after - before), if both were recorded.
    pub fn mood_delta(&self) -> Option<i16> {
        match (self.mood_before, self.mood_after) {
            (Some(before), Some(after)) => Some(after - before),
            _ => None,
        }
    }
}

/// Filter for listing a user's sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub session_type: Option<SessionType>,
    pub status: Option<SessionStatus>,
    pub limit: Option<i64>,
}

/// Aggregate completion figures for one session type.
#[derive(Debug, Clone)]
pub struct TypeCount {
    pub session_type: SessionType,
    pub completed: i64,
}

/// Repository trait for wellness session data access.
#[async_trait]
pub trait WellnessSessionRepository: Send + Sync {
    /// Find a session by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<WellnessSession>, AppError>;

    /// Find a user's non-terminal (active or paused) session, if any.
    async fn find_open_for_user(&self, user_id: i64) -> Result<Option<WellnessSession>, AppError>;

    /// Persist a new session.
    async fn create(&self, session: &WellnessSession) -> Result<WellnessSession, AppError>;

    /// Update status, timestamps, moods, notes, and subtype payload.
    async fn update(&self, session: &WellnessSession) -> Result<WellnessSession, AppError>;

    /// List a user's sessions, newest first.
    async fn list_for_user(
        &self,
        user_id: i64,
        filter: &SessionFilter,
    ) -> Result<Vec<WellnessSession>, AppError>;

    /// List a user's completed sessions, oldest first (for analytics).
    async fn list_completed_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<WellnessSession>, AppError>;

    /// Completed-session counts per type for a user.
    async fn completed_counts_by_type(&self, user_id: i64) -> Result<Vec<TypeCount>, AppError>;

    /// Total number of completed sessions for a user.
    async fn completed_count(&self, user_id: i64) -> Result<i64, AppError>;

    /// Total number of abandoned sessions for a user.
    async fn abandoned_count(&self, user_id: i64) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meditation_detail() -> SessionDetail {
        SessionDetail::Meditation {
            technique: "mindfulness".to_string(),
            guided: true,
            background_sound: None,
        }
    }

    fn start_session() -> WellnessSession {
        WellnessSession::start(1, 42, meditation_detail(), Some(600), Some(4))
    }

    // ==========================================================================
    // Status Transition Tests
    // ==========================================================================

    #[test]
    fn test_active_can_pause_complete_abandon() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Paused));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Abandoned));
    }

    #[test]
    fn test_paused_can_resume_or_abandon() {
        assert!(SessionStatus::Paused.can_transition_to(SessionStatus::Active));
        assert!(SessionStatus::Paused.can_transition_to(SessionStatus::Abandoned));
    }

    #[test]
    fn test_paused_cannot_complete() {
        assert!(!SessionStatus::Paused.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn test_terminal_statuses_reject_all_transitions() {
        for terminal in [SessionStatus::Completed, SessionStatus::Abandoned] {
            for next in [
                SessionStatus::Active,
                SessionStatus::Paused,
                SessionStatus::Completed,
                SessionStatus::Abandoned,
            ] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(!SessionStatus::Active.can_transition_to(SessionStatus::Active));
        assert!(!SessionStatus::Paused.can_transition_to(SessionStatus::Paused));
    }

    #[test]
    fn test_is_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Abandoned.is_terminal());
        assert!(!SessionStatus::Active.is_terminal());
        assert!(!SessionStatus::Paused.is_terminal());
    }

    // ==========================================================================
    // Entity Transition Tests
    // ==========================================================================

    #[test]
    fn test_start_is_active() {
        let session = start_session();
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.paused_at.is_none());
        assert!(session.completed_at.is_none());
        assert_eq!(session.active_secs, 0);
    }

    #[test]
    fn test_pause_then_resume() {
        let mut session = start_session();

        session.transition_to(SessionStatus::Paused).unwrap();
        assert_eq!(session.status, SessionStatus::Paused);
        assert!(session.paused_at.is_some());

        session.transition_to(SessionStatus::Active).unwrap();
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.paused_at.is_none());
    }

    #[test]
    fn test_complete_sets_completed_at() {
        let mut session = start_session();
        session.transition_to(SessionStatus::Completed).unwrap();

        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.completed_at.is_some());
        assert!(session.is_finished());
    }

    #[test]
    fn test_complete_after_complete_fails() {
        let mut session = start_session();
        session.transition_to(SessionStatus::Completed).unwrap();

        let err = session.transition_to(SessionStatus::Completed).unwrap_err();
        assert_eq!(err.from, SessionStatus::Completed);
        assert_eq!(err.to, SessionStatus::Completed);
    }

    #[test]
    fn test_complete_while_paused_fails() {
        let mut session = start_session();
        session.transition_to(SessionStatus::Paused).unwrap();

        assert!(session.transition_to(SessionStatus::Completed).is_err());
    }

    #[test]
    fn test_abandon_from_paused() {
        let mut session = start_session();
        session.transition_to(SessionStatus::Paused).unwrap();
        session.transition_to(SessionStatus::Abandoned).unwrap();

        assert_eq!(session.status, SessionStatus::Abandoned);
        assert!(session.completed_at.is_some());
    }

    #[test]
    fn test_mood_delta() {
        let mut session = start_session();
        assert_eq!(session.mood_delta(), None);

        session.mood_after = Some(7);
        assert_eq!(session.mood_delta(), Some(3));
    }

    // ==========================================================================
    // Discriminator / Serialization Tests
    // ==========================================================================

    #[test]
    fn test_detail_session_type_matches_variant() {
        assert_eq!(meditation_detail().session_type(), SessionType::Meditation);

        let breathing = SessionDetail::Breathing {
            pattern: "box".to_string(),
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            target_cycles: 10,
            completed_cycles: 0,
        };
        assert_eq!(breathing.session_type(), SessionType::Breathing);
    }

    #[test]
    fn test_detail_serializes_with_kind_tag() {
        let json = serde_json::to_string(&meditation_detail()).unwrap();
        assert!(json.contains("\"kind\":\"meditation\""));
    }

    #[test]
    fn test_session_type_from_str() {
        assert_eq!(SessionType::from_str("PMR"), Some(SessionType::Pmr));
        assert_eq!(SessionType::from_str("breathing"), Some(SessionType::Breathing));
        assert_eq!(SessionType::from_str("unknown"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Paused,
            SessionStatus::Completed,
            SessionStatus::Abandoned,
        ] {
            assert_eq!(SessionStatus::from_str(status.as_str()), status);
        }
    }
}
