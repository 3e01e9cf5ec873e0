//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - User account management
//! - **AuthSessionRepository** - Refresh token sessions
//! - **WellnessSessionRepository** - Practice sessions with typed detail
//! - **StressAssessmentRepository** - Stress check-ins
//! - **JournalRepository** - Journal entries
//! - **AchievementRepository** - Achievement catalog and awards
//! - **UserPointsRepository** - Points, streaks, leaderboard ranking
//! - **FriendshipRepository** - Friend requests and relationships
//! - **GroupSessionRepository** - Scheduled shared sessions
//! - **NotificationRepository** - Per-user notifications

pub mod achievement_repository;
pub mod auth_session_repository;
pub mod friendship_repository;
pub mod group_session_repository;
pub mod journal_repository;
pub mod notification_repository;
pub mod points_repository;
pub mod stress_repository;
pub mod user_repository;
pub mod wellness_session_repository;

// Re-export repository structs for convenience
pub use achievement_repository::PgAchievementRepository;
pub use auth_session_repository::PgAuthSessionRepository;
pub use friendship_repository::PgFriendshipRepository;
pub use group_session_repository::PgGroupSessionRepository;
pub use journal_repository::PgJournalRepository;
pub use notification_repository::PgNotificationRepository;
pub use points_repository::PgUserPointsRepository;
pub use stress_repository::PgStressAssessmentRepository;
pub use user_repository::PgUserRepository;
pub use wellness_session_repository::PgWellnessSessionRepository;
