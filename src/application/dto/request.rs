//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::SessionDetail;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub timezone: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 32, message = "Display name must be at most 32 characters"))]
    pub display_name: Option<String>,

    pub avatar_url: Option<String>,

    #[validate(length(max = 190, message = "Bio must be at most 190 characters"))]
    pub bio: Option<String>,

    pub timezone: Option<String>,
}

/// Start session request
///
/// The `detail` payload is a tagged union; its `kind` field selects the
/// session subtype (meditation, breathing, pmr, stress).
#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    pub detail: SessionDetail,

    #[validate(range(min = 60, max = 14400, message = "Planned duration must be 60-14400 seconds"))]
    pub planned_duration_secs: Option<i32>,

    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood_before: Option<i16>,
}

/// Complete session request
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteSessionRequest {
    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood_after: Option<i16>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Session list query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SessionQueryParams {
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// Record completed breathing cycles on a breathing session
#[derive(Debug, Deserialize, Validate)]
pub struct RecordCyclesRequest {
    #[validate(range(min = 1, max = 500, message = "Cycles must be 1-500"))]
    pub cycles: u32,
}

/// Stress assessment creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssessmentRequest {
    #[validate(range(min = 1, max = 10, message = "Stress level must be 1-10"))]
    pub stress_level: i16,

    #[validate(range(min = 1, max = 10, message = "Anxiety level must be 1-10"))]
    pub anxiety_level: Option<i16>,

    #[validate(range(min = 1, max = 10, message = "Sleep quality must be 1-10"))]
    pub sleep_quality: Option<i16>,

    #[validate(range(min = 1, max = 10, message = "Energy level must be 1-10"))]
    pub energy_level: Option<i16>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Journal entry creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,

    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood: Option<i16>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Journal entry update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJournalRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: Option<String>,

    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood: Option<i16>,

    pub tags: Option<Vec<String>>,
}

/// Friend request creation
#[derive(Debug, Deserialize)]
pub struct CreateFriendRequest {
    pub user_id: String,
}

/// Group session creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 2, max = 120, message = "Title must be 2-120 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(rename = "type")]
    pub session_type: String,

    pub scheduled_at: DateTime<Utc>,

    #[validate(range(min = 60, max = 14400, message = "Duration must be 60-14400 seconds"))]
    pub duration_secs: i32,

    #[validate(range(min = 2, max = 100, message = "Max participants must be 2-100"))]
    pub max_participants: i32,
}

/// Leaderboard query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQueryParams {
    /// "global" (default) or "friends"
    pub scope: Option<String>,
    pub limit: Option<i64>,
}

/// Generic list query with a limit
#[derive(Debug, Default, Deserialize)]
pub struct ListQueryParams {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            username: "stillwater".to_string(),
            email: "still@example.com".to_string(),
            password: "short".to_string(),
            timezone: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            username: "stillwater".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough123".to_string(),
            timezone: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_assessment_request_bounds() {
        let req = CreateAssessmentRequest {
            stress_level: 11,
            anxiety_level: None,
            sleep_quality: None,
            energy_level: None,
            notes: None,
        };
        assert!(req.validate().is_err());

        let req = CreateAssessmentRequest {
            stress_level: 5,
            anxiety_level: Some(3),
            sleep_quality: None,
            energy_level: None,
            notes: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_start_session_request_parses_tagged_detail() {
        let json = r#"{
            "detail": {"kind": "breathing", "pattern": "box",
                       "inhale_secs": 4, "hold_secs": 4, "exhale_secs": 4,
                       "target_cycles": 10, "completed_cycles": 0},
            "mood_before": 4
        }"#;
        let req: StartSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mood_before, Some(4));
        assert!(matches!(req.detail, SessionDetail::Breathing { .. }));
    }

    #[test]
    fn test_complete_request_rejects_out_of_range_mood() {
        let req = CompleteSessionRequest {
            mood_after: Some(0),
            notes: None,
        };
        assert!(req.validate().is_err());
    }
}
