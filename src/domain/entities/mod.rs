//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the
//! wellness tracker. All entities map directly to their corresponding
//! database tables.
//!
//! ## Core Entities
//!
//! - **User**: User account with authentication data and profile
//! - **WellnessSession**: A timed activity (meditation, breathing, PMR,
//!   stress management) with a shared status lifecycle, stored in one table
//!   behind a `session_type` discriminator
//! - **StressAssessment**: Point-in-time stress self-report
//! - **JournalEntry**: Private journal entry
//!
//! ## Social & Gamification Entities
//!
//! - **Friendship**: Directed friend requests and accepted friendships
//! - **GroupSession**: Host-scheduled shared practice with participants
//! - **Achievement / UserAchievement**: Catalog and earned records
//! - **UserPoints**: Points total plus day-streak counters
//! - **Notification**: Per-user event notifications
//!
//! ## Supporting Entities
//!
//! - **AuthSession**: Login sessions for JWT refresh token management
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod achievement;
mod auth_session;
mod friendship;
mod group_session;
mod journal;
mod notification;
mod points;
mod stress_assessment;
mod user;
mod wellness_session;

pub use achievement::{Achievement, AchievementCategory, AchievementRepository, UserAchievement};
pub use auth_session::{AuthSession, AuthSessionRepository};
pub use friendship::{Friendship, FriendshipRepository, FriendshipStatus};
pub use group_session::{GroupSession, GroupSessionRepository, GroupSessionStatus};
pub use journal::{JournalEntry, JournalRepository};
pub use notification::{Notification, NotificationKind, NotificationRepository};
pub use points::{LeaderboardRow, UserPoints, UserPointsRepository};
pub use stress_assessment::{StressAssessment, StressAssessmentRepository};
pub use user::{User, UserRepository};
pub use wellness_session::{
    InvalidTransition, SessionDetail, SessionFilter, SessionStatus, SessionType, TypeCount,
    WellnessSession, WellnessSessionRepository,
};
