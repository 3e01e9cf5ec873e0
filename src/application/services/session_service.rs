//! Session Service
//!
//! Drives the wellness session lifecycle: starting a session (one open
//! session per user), pause/resume, completion with mood capture and award
//! processing, and abandonment.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::services::achievement_service::{
    AchievementError, AchievementService, CompletionAward,
};
use crate::domain::{
    SessionDetail, SessionFilter, SessionStatus, WellnessSession, WellnessSessionRepository,
};
use crate::infrastructure::metrics;
use crate::shared::snowflake::SnowflakeGenerator;

/// Session service trait
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Start a new session. Fails if the user already has an open one.
    async fn start_session(
        &self,
        user_id: i64,
        detail: SessionDetail,
        planned_duration_secs: Option<i32>,
        mood_before: Option<i16>,
    ) -> Result<WellnessSession, SessionError>;

    /// Pause an active session.
    async fn pause_session(&self, user_id: i64, session_id: i64)
        -> Result<WellnessSession, SessionError>;

    /// Resume a paused session.
    async fn resume_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError>;

    /// Complete an active session, recording mood and notes, and run the
    /// points/achievement award pass.
    async fn complete_session(
        &self,
        user_id: i64,
        session_id: i64,
        mood_after: Option<i16>,
        notes: Option<String>,
    ) -> Result<(WellnessSession, CompletionAward), SessionError>;

    /// Abandon an active or paused session.
    async fn abandon_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError>;

    /// Fetch one of the user's sessions.
    async fn get_session(&self, user_id: i64, session_id: i64)
        -> Result<WellnessSession, SessionError>;

    /// List the user's sessions, newest first.
    async fn list_sessions(
        &self,
        user_id: i64,
        filter: SessionFilter,
    ) -> Result<Vec<WellnessSession>, SessionError>;
}

/// Session service errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session belongs to another user")]
    NotOwner,

    #[error("User already has an open session")]
    AlreadyOpen,

    #[error("Invalid session payload: {0}")]
    InvalidDetail(String),

    #[error("Cannot transition session from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for SessionError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<AchievementError> for SessionError {
    fn from(e: AchievementError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// SessionService implementation
pub struct SessionServiceImpl<R, A>
where
    R: WellnessSessionRepository,
    A: AchievementService,
{
    session_repo: Arc<R>,
    achievement_service: Arc<A>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, A> SessionServiceImpl<R, A>
where
    R: WellnessSessionRepository,
    A: AchievementService,
{
    pub fn new(
        session_repo: Arc<R>,
        achievement_service: Arc<A>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            session_repo,
            achievement_service,
            id_generator,
        }
    }

    /// Fetch a session and check ownership.
    async fn owned_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if session.user_id != user_id {
            return Err(SessionError::NotOwner);
        }

        Ok(session)
    }

    /// Apply a guarded transition and persist the result.
    async fn transition(
        &self,
        mut session: WellnessSession,
        next: SessionStatus,
    ) -> Result<WellnessSession, SessionError> {
        session
            .transition_to(next)
            .map_err(|e| SessionError::InvalidTransition {
                from: e.from,
                to: e.to,
            })?;

        let updated = self.session_repo.update(&session).await?;
        metrics::record_session_event(updated.session_type.as_str(), updated.status.as_str());
        Ok(updated)
    }
}

#[async_trait]
impl<R, A> SessionService for SessionServiceImpl<R, A>
where
    R: WellnessSessionRepository + 'static,
    A: AchievementService + 'static,
{
    async fn start_session(
        &self,
        user_id: i64,
        detail: SessionDetail,
        planned_duration_secs: Option<i32>,
        mood_before: Option<i16>,
    ) -> Result<WellnessSession, SessionError> {
        super::breathing_service::validate_breathing_detail(&detail)
            .map_err(|e| SessionError::InvalidDetail(e.to_string()))?;

        if self.session_repo.find_open_for_user(user_id).await?.is_some() {
            return Err(SessionError::AlreadyOpen);
        }

        let session = WellnessSession::start(
            self.id_generator.generate(),
            user_id,
            detail,
            planned_duration_secs,
            mood_before,
        );

        let created = self.session_repo.create(&session).await?;
        metrics::record_session_event(created.session_type.as_str(), created.status.as_str());
        Ok(created)
    }

    async fn pause_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError> {
        let session = self.owned_session(user_id, session_id).await?;
        self.transition(session, SessionStatus::Paused).await
    }

    async fn resume_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError> {
        let session = self.owned_session(user_id, session_id).await?;
        self.transition(session, SessionStatus::Active).await
    }

    async fn complete_session(
        &self,
        user_id: i64,
        session_id: i64,
        mood_after: Option<i16>,
        notes: Option<String>,
    ) -> Result<(WellnessSession, CompletionAward), SessionError> {
        let mut session = self.owned_session(user_id, session_id).await?;

        session
            .transition_to(SessionStatus::Completed)
            .map_err(|e| SessionError::InvalidTransition {
                from: e.from,
                to: e.to,
            })?;

        if mood_after.is_some() {
            session.mood_after = mood_after;
        }
        if notes.is_some() {
            session.notes = notes;
        }

        let updated = self.session_repo.update(&session).await?;
        metrics::record_session_event(updated.session_type.as_str(), updated.status.as_str());

        let award = self.achievement_service.handle_session_completed(&updated).await?;

        Ok((updated, award))
    }

    async fn abandon_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError> {
        let session = self.owned_session(user_id, session_id).await?;
        self.transition(session, SessionStatus::Abandoned).await
    }

    async fn get_session(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<WellnessSession, SessionError> {
        self.owned_session(user_id, session_id).await
    }

    async fn list_sessions(
        &self,
        user_id: i64,
        filter: SessionFilter,
    ) -> Result<Vec<WellnessSession>, SessionError> {
        Ok(self.session_repo.list_for_user(user_id, &filter).await?)
    }
}
