//! Group Session Service
//!
//! Scheduled shared practice sessions: the host creates, starts, completes,
//! or cancels them; other users join up to capacity and may leave again.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    GroupSession, GroupSessionRepository, GroupSessionStatus, Notification, NotificationKind,
    NotificationRepository, SessionType,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// New group session payload.
#[derive(Debug, Clone)]
pub struct NewGroupSession {
    pub title: String,
    pub description: Option<String>,
    pub session_type: SessionType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_secs: i32,
    pub max_participants: i32,
}

/// A group session together with its current enrollment.
#[derive(Debug, Clone)]
pub struct GroupSessionView {
    pub session: GroupSession,
    pub participant_count: i64,
}

/// Group session service trait
#[async_trait]
pub trait GroupSessionService: Send + Sync {
    /// Schedule a new group session hosted by `host_id`.
    async fn create(&self, host_id: i64, new: NewGroupSession)
        -> Result<GroupSessionView, GroupError>;

    /// Fetch a group session with its enrollment count.
    async fn get(&self, session_id: i64) -> Result<GroupSessionView, GroupError>;

    /// Upcoming sessions, soonest first.
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<GroupSessionView>, GroupError>;

    /// Join a joinable session.
    async fn join(&self, user_id: i64, session_id: i64) -> Result<GroupSessionView, GroupError>;

    /// Leave a session. The host cannot leave their own session.
    async fn leave(&self, user_id: i64, session_id: i64) -> Result<(), GroupError>;

    /// Host starts the session.
    async fn start(&self, host_id: i64, session_id: i64)
        -> Result<GroupSessionView, GroupError>;

    /// Host completes a running session.
    async fn complete(&self, host_id: i64, session_id: i64)
        -> Result<GroupSessionView, GroupError>;

    /// Host cancels a scheduled session.
    async fn cancel(&self, host_id: i64, session_id: i64)
        -> Result<GroupSessionView, GroupError>;
}

/// Group session service errors
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Group session not found")]
    NotFound,

    #[error("Only the host may do this")]
    NotHost,

    #[error("Group session is full")]
    Full,

    #[error("Group session cannot be joined")]
    NotJoinable,

    #[error("Already joined")]
    AlreadyJoined,

    #[error("Not a participant")]
    NotParticipant,

    #[error("Host cannot leave their own session")]
    HostCannotLeave,

    #[error("Scheduled time must be in the future")]
    ScheduledInPast,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for GroupError {
    fn from(e: crate::shared::error::AppError) -> Self {
        match e {
            crate::shared::error::AppError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// GroupSessionService implementation
pub struct GroupSessionServiceImpl<R, N>
where
    R: GroupSessionRepository,
    N: NotificationRepository,
{
    group_repo: Arc<R>,
    notification_repo: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, N> GroupSessionServiceImpl<R, N>
where
    R: GroupSessionRepository,
    N: NotificationRepository,
{
    pub fn new(
        group_repo: Arc<R>,
        notification_repo: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            group_repo,
            notification_repo,
            id_generator,
        }
    }

    /// Notify every participant except the host. Failures are logged and
    /// never fail the lifecycle operation itself.
    async fn notify_participants(&self, session: &GroupSession, kind: NotificationKind, body: &str) {
        let participants = match self.group_repo.participant_ids(session.id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(session_id = session.id, error = %e, "Failed to load participants");
                return;
            }
        };

        for user_id in participants {
            if user_id == session.host_id {
                continue;
            }
            let notification = Notification::new(
                self.id_generator.generate(),
                user_id,
                kind,
                body.to_string(),
            );
            if let Err(e) = self.notification_repo.create(&notification).await {
                tracing::warn!(user_id, error = %e, "Failed to create notification");
            }
        }
    }

    async fn view(&self, session: GroupSession) -> Result<GroupSessionView, GroupError> {
        let participant_count = self.group_repo.participant_count(session.id).await?;
        Ok(GroupSessionView {
            session,
            participant_count,
        })
    }

    async fn find(&self, session_id: i64) -> Result<GroupSession, GroupError> {
        self.group_repo
            .find_by_id(session_id)
            .await?
            .ok_or(GroupError::NotFound)
    }

    /// Fetch a session and check the caller hosts it.
    async fn hosted_session(
        &self,
        host_id: i64,
        session_id: i64,
    ) -> Result<GroupSession, GroupError> {
        let session = self.find(session_id).await?;
        if session.host_id != host_id {
            return Err(GroupError::NotHost);
        }
        Ok(session)
    }

    /// Apply a guarded lifecycle transition and persist.
    async fn transition(
        &self,
        mut session: GroupSession,
        next: GroupSessionStatus,
    ) -> Result<GroupSessionView, GroupError> {
        session.transition_to(next)?;
        let updated = self.group_repo.update(&session).await?;
        self.view(updated).await
    }
}

#[async_trait]
impl<R, N> GroupSessionService for GroupSessionServiceImpl<R, N>
where
    R: GroupSessionRepository + 'static,
    N: NotificationRepository + 'static,
{
    async fn create(
        &self,
        host_id: i64,
        new: NewGroupSession,
    ) -> Result<GroupSessionView, GroupError> {
        if new.scheduled_at <= Utc::now() {
            return Err(GroupError::ScheduledInPast);
        }

        let now = Utc::now();
        let session = GroupSession {
            id: self.id_generator.generate(),
            host_id,
            title: new.title,
            description: new.description,
            session_type: new.session_type,
            status: GroupSessionStatus::Scheduled,
            scheduled_at: new.scheduled_at,
            duration_secs: new.duration_secs,
            max_participants: new.max_participants,
            created_at: now,
            updated_at: now,
        };

        let created = self.group_repo.create(&session).await?;
        self.view(created).await
    }

    async fn get(&self, session_id: i64) -> Result<GroupSessionView, GroupError> {
        let session = self.find(session_id).await?;
        self.view(session).await
    }

    async fn list_upcoming(&self, limit: i64) -> Result<Vec<GroupSessionView>, GroupError> {
        let sessions = self.group_repo.list_upcoming(limit.clamp(1, 100)).await?;

        let mut views = Vec::with_capacity(sessions.len());
        for session in sessions {
            views.push(self.view(session).await?);
        }
        Ok(views)
    }

    async fn join(&self, user_id: i64, session_id: i64) -> Result<GroupSessionView, GroupError> {
        let session = self.find(session_id).await?;

        if !session.is_joinable() {
            return Err(GroupError::NotJoinable);
        }

        let count = self.group_repo.participant_count(session_id).await?;
        if count >= session.max_participants as i64 {
            return Err(GroupError::Full);
        }

        let joined = self.group_repo.add_participant(session_id, user_id).await?;
        if !joined {
            return Err(GroupError::AlreadyJoined);
        }

        self.view(session).await
    }

    async fn leave(&self, user_id: i64, session_id: i64) -> Result<(), GroupError> {
        let session = self.find(session_id).await?;

        if session.host_id == user_id {
            return Err(GroupError::HostCannotLeave);
        }

        let removed = self
            .group_repo
            .remove_participant(session_id, user_id)
            .await?;
        if !removed {
            return Err(GroupError::NotParticipant);
        }

        Ok(())
    }

    async fn start(&self, host_id: i64, session_id: i64) -> Result<GroupSessionView, GroupError> {
        let session = self.hosted_session(host_id, session_id).await?;
        let view = self.transition(session, GroupSessionStatus::Active).await?;

        self.notify_participants(
            &view.session,
            NotificationKind::GroupReminder,
            &format!("Group session \"{}\" is starting", view.session.title),
        )
        .await;

        Ok(view)
    }

    async fn complete(
        &self,
        host_id: i64,
        session_id: i64,
    ) -> Result<GroupSessionView, GroupError> {
        let session = self.hosted_session(host_id, session_id).await?;
        self.transition(session, GroupSessionStatus::Completed).await
    }

    async fn cancel(&self, host_id: i64, session_id: i64) -> Result<GroupSessionView, GroupError> {
        let session = self.hosted_session(host_id, session_id).await?;
        let view = self.transition(session, GroupSessionStatus::Cancelled).await?;

        self.notify_participants(
            &view.session,
            NotificationKind::GroupCancelled,
            &format!("Group session \"{}\" was cancelled", view.session.title),
        )
        .await;

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::shared::error::AppError;

    struct FakeGroupRepo {
        session: Mutex<GroupSession>,
        participants: Vec<i64>,
    }

    #[async_trait]
    impl GroupSessionRepository for FakeGroupRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<GroupSession>, AppError> {
            let session = self.session.lock().unwrap().clone();
            Ok((session.id == id).then_some(session))
        }

        async fn create(&self, session: &GroupSession) -> Result<GroupSession, AppError> {
            Ok(session.clone())
        }

        async fn update(&self, session: &GroupSession) -> Result<GroupSession, AppError> {
            *self.session.lock().unwrap() = session.clone();
            Ok(session.clone())
        }

        async fn list_upcoming(&self, _limit: i64) -> Result<Vec<GroupSession>, AppError> {
            Ok(vec![])
        }

        async fn participant_ids(&self, _session_id: i64) -> Result<Vec<i64>, AppError> {
            Ok(self.participants.clone())
        }

        async fn participant_count(&self, _session_id: i64) -> Result<i64, AppError> {
            Ok(self.participants.len() as i64)
        }

        async fn add_participant(&self, _session_id: i64, _user_id: i64) -> Result<bool, AppError> {
            Ok(true)
        }

        async fn remove_participant(
            &self,
            _session_id: i64,
            _user_id: i64,
        ) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    #[derive(Default)]
    struct FakeNotificationRepo {
        created: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationRepository for FakeNotificationRepo {
        async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
            self.created.lock().unwrap().push(notification.clone());
            Ok(notification.clone())
        }

        async fn list_for_user(
            &self,
            _user_id: i64,
            _limit: i64,
        ) -> Result<Vec<Notification>, AppError> {
            Ok(vec![])
        }

        async fn unread_count(&self, _user_id: i64) -> Result<i64, AppError> {
            Ok(0)
        }

        async fn mark_read(&self, _id: i64, _user_id: i64) -> Result<(), AppError> {
            Ok(())
        }

        async fn mark_all_read(&self, _user_id: i64) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    fn session_with_status(status: GroupSessionStatus) -> GroupSession {
        let now = Utc::now();
        GroupSession {
            id: 1,
            host_id: 10,
            title: "Evening wind-down".into(),
            description: None,
            session_type: SessionType::Meditation,
            status,
            scheduled_at: now,
            duration_secs: 900,
            max_participants: 8,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        status: GroupSessionStatus,
        participants: Vec<i64>,
    ) -> (
        GroupSessionServiceImpl<FakeGroupRepo, FakeNotificationRepo>,
        Arc<FakeNotificationRepo>,
    ) {
        let notification_repo = Arc::new(FakeNotificationRepo::default());
        let service = GroupSessionServiceImpl::new(
            Arc::new(FakeGroupRepo {
                session: Mutex::new(session_with_status(status)),
                participants,
            }),
            notification_repo.clone(),
            Arc::new(crate::shared::snowflake::SnowflakeGenerator::new(1, 1)),
        );
        (service, notification_repo)
    }

    #[tokio::test]
    async fn test_start_notifies_participants_excluding_host() {
        let (service, notifications) = service(GroupSessionStatus::Scheduled, vec![10, 20, 30]);

        service.start(10, 1).await.unwrap();

        let created = notifications.created.lock().unwrap();
        assert_eq!(created.len(), 2);
        assert!(created
            .iter()
            .all(|n| n.kind == NotificationKind::GroupReminder && n.user_id != 10));
    }

    #[tokio::test]
    async fn test_start_rejected_transition_sends_no_notifications() {
        let (service, notifications) = service(GroupSessionStatus::Completed, vec![10, 20, 30]);

        assert!(service.start(10, 1).await.is_err());

        assert!(notifications.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_rejected_transition_sends_no_notifications() {
        let (service, notifications) = service(GroupSessionStatus::Active, vec![10, 20]);

        assert!(service.cancel(10, 1).await.is_err());

        assert!(notifications.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_notifies_with_cancellation_kind() {
        let (service, notifications) = service(GroupSessionStatus::Scheduled, vec![10, 20]);

        service.cancel(10, 1).await.unwrap();

        let created = notifications.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, NotificationKind::GroupCancelled);
        assert_eq!(created[0].user_id, 20);
    }
}
