//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Authentication, JWT tokens, refresh token rotation
//! - **UserService**: User profile management
//! - **SessionService**: Wellness session lifecycle (start/pause/resume/complete/abandon)
//! - **BreathingService**: Breathing pattern catalog, cycle recording, per-pattern stats
//! - **StressService**: Stress assessments and trend analysis
//! - **JournalService**: Journal entry CRUD
//! - **AchievementService**: Points, streaks and achievement awards
//! - **LeaderboardService**: Global and friends leaderboards
//! - **SessionAnalyticsService**: Cached practice summaries
//! - **RecommendationService**: Session type recommendations
//! - **FriendService**: Friend requests and friendships
//! - **GroupSessionService**: Scheduled group sessions
//! - **NotificationService**: Per-user notifications

pub mod auth_service;
pub mod user_service;
pub mod session_service;
pub mod breathing_service;
pub mod stress_service;
pub mod journal_service;
pub mod achievement_service;
pub mod leaderboard_service;
pub mod analytics_service;
pub mod recommendation_service;
pub mod friend_service;
pub mod group_session_service;
pub mod notification_service;

// Re-export auth service types
pub use auth_service::{AuthService, AuthServiceImpl, AuthTokens, AuthError, Claims};

// Re-export user service types
pub use user_service::{UserService, UserServiceImpl, UpdateProfileDto, UserError};

// Re-export session service types
pub use session_service::{SessionService, SessionServiceImpl, SessionError};

// Re-export breathing service types
pub use breathing_service::{
    BreathingService, BreathingServiceImpl, BreathingPattern, PatternStats, BreathingError,
    PATTERNS,
};

// Re-export stress service types
pub use stress_service::{
    StressService, StressServiceImpl, NewAssessment, StressAnalysis, StressError,
};

// Re-export journal service types
pub use journal_service::{JournalService, JournalServiceImpl, NewEntry, EntryUpdate, JournalError};

// Re-export achievement service types
pub use achievement_service::{
    AchievementService, AchievementServiceImpl, CompletionAward, AchievementError,
};

// Re-export leaderboard service types
pub use leaderboard_service::{
    LeaderboardService, LeaderboardServiceImpl, Leaderboard, LeaderboardScope, LeaderboardError,
};

// Re-export analytics service types
pub use analytics_service::{
    SessionAnalyticsService, SessionAnalyticsServiceImpl, SessionSummary, TypeBreakdown,
    AnalyticsError,
};

// Re-export recommendation service types
pub use recommendation_service::{
    RecommendationService, RecommendationServiceImpl, Recommendation, RecommendationError,
};

// Re-export friend service types
pub use friend_service::{FriendService, FriendServiceImpl, FriendError};

// Re-export group session service types
pub use group_session_service::{
    GroupSessionService, GroupSessionServiceImpl, NewGroupSession, GroupSessionView, GroupError,
};

// Re-export notification service types
pub use notification_service::{NotificationService, NotificationServiceImpl, NotificationError};
