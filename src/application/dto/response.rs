//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake IDs are rendered as
//! strings to avoid precision loss in JavaScript clients.

use serde::Serialize;

use crate::application::services::AuthTokens;
use crate::domain::{
    Achievement, Friendship, GroupSession, JournalEntry, LeaderboardRow, Notification,
    SessionDetail, StressAssessment, User, UserPoints, WellnessSession,
};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Registration response (includes user and tokens)
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub timezone: Option<String>,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: if include_email { Some(user.email) } else { None },
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            timezone: user.timezone,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Wellness session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub status: String,
    pub planned_duration_secs: Option<i32>,
    pub active_secs: i64,
    pub mood_before: Option<i16>,
    pub mood_after: Option<i16>,
    pub notes: Option<String>,
    pub detail: SessionDetail,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<WellnessSession> for SessionResponse {
    fn from(session: WellnessSession) -> Self {
        Self {
            id: session.id.to_string(),
            user_id: session.user_id.to_string(),
            session_type: session.session_type.as_str().to_string(),
            status: session.status.as_str().to_string(),
            planned_duration_secs: session.planned_duration_secs,
            active_secs: session.active_secs,
            mood_before: session.mood_before,
            mood_after: session.mood_after,
            notes: session.notes,
            detail: session.detail,
            started_at: session.started_at.to_rfc3339(),
            paused_at: session.paused_at.map(|t| t.to_rfc3339()),
            completed_at: session.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Stress assessment response
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub id: String,
    pub stress_level: i16,
    pub anxiety_level: Option<i16>,
    pub sleep_quality: Option<i16>,
    pub energy_level: Option<i16>,
    pub notes: Option<String>,
    pub assessed_at: String,
}

impl From<StressAssessment> for AssessmentResponse {
    fn from(assessment: StressAssessment) -> Self {
        Self {
            id: assessment.id.to_string(),
            stress_level: assessment.stress_level,
            anxiety_level: assessment.anxiety_level,
            sleep_quality: assessment.sleep_quality,
            energy_level: assessment.energy_level,
            notes: assessment.notes,
            assessed_at: assessment.assessed_at.to_rfc3339(),
        }
    }
}

/// Journal entry response
#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub mood: Option<i16>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JournalEntry> for JournalResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title,
            content: entry.content,
            mood: entry.mood,
            tags: entry.tags,
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
        }
    }
}

/// Achievement catalog entry response
#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub points: i64,
    pub threshold: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<String>,
}

impl AchievementResponse {
    pub fn from_achievement(achievement: Achievement) -> Self {
        Self {
            id: achievement.id.to_string(),
            code: achievement.code,
            name: achievement.name,
            description: achievement.description,
            category: achievement.category.as_str().to_string(),
            points: achievement.points,
            threshold: achievement.threshold,
            earned_at: None,
        }
    }

    pub fn earned(achievement: Achievement, earned_at: chrono::DateTime<chrono::Utc>) -> Self {
        let mut response = Self::from_achievement(achievement);
        response.earned_at = Some(earned_at.to_rfc3339());
        response
    }
}

/// Points and streak response
#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub total_points: i64,
    pub current_streak_days: i32,
    pub longest_streak_days: i32,
}

impl From<UserPoints> for PointsResponse {
    fn from(points: UserPoints) -> Self {
        Self {
            total_points: points.total_points,
            current_streak_days: points.current_streak_days,
            longest_streak_days: points.longest_streak_days,
        }
    }
}

/// One leaderboard row
#[derive(Debug, Serialize)]
pub struct LeaderboardEntryResponse {
    pub rank: i64,
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub total_points: i64,
    pub current_streak_days: i32,
}

impl From<LeaderboardRow> for LeaderboardEntryResponse {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            user_id: row.user_id.to_string(),
            username: row.username,
            display_name: row.display_name,
            total_points: row.total_points,
            current_streak_days: row.current_streak_days,
        }
    }
}

/// Leaderboard response with the requesting user's own rank
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub scope: String,
    pub entries: Vec<LeaderboardEntryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rank: Option<i64>,
}

/// Friendship response
#[derive(Debug, Serialize)]
pub struct FriendshipResponse {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<String>,
}

impl From<Friendship> for FriendshipResponse {
    fn from(friendship: Friendship) -> Self {
        Self {
            id: friendship.id.to_string(),
            requester_id: friendship.requester_id.to_string(),
            addressee_id: friendship.addressee_id.to_string(),
            status: friendship.status.as_str().to_string(),
            created_at: friendship.created_at.to_rfc3339(),
            responded_at: friendship.responded_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Group session response
#[derive(Debug, Serialize)]
pub struct GroupSessionResponse {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub session_type: String,
    pub status: String,
    pub scheduled_at: String,
    pub duration_secs: i32,
    pub max_participants: i32,
    pub participant_count: i64,
}

impl GroupSessionResponse {
    pub fn from_session(session: GroupSession, participant_count: i64) -> Self {
        Self {
            id: session.id.to_string(),
            host_id: session.host_id.to_string(),
            title: session.title,
            description: session.description,
            session_type: session.session_type.as_str().to_string(),
            status: session.status.as_str().to_string(),
            scheduled_at: session.scheduled_at.to_rfc3339(),
            duration_secs: session.duration_secs,
            max_participants: session.max_participants,
            participant_count,
        }
    }
}

/// Notification response
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str().to_string(),
            body: notification.body,
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Response for a completed session, including the award pass results
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub session: SessionResponse,
    pub points_awarded: i64,
    pub new_achievements: Vec<AchievementResponse>,
    pub points: PointsResponse,
}

impl CompletionResponse {
    pub fn new(session: WellnessSession, award: crate::application::services::CompletionAward) -> Self {
        Self {
            session: SessionResponse::from(session),
            points_awarded: award.session_points,
            new_achievements: award
                .new_achievements
                .into_iter()
                .map(AchievementResponse::from_achievement)
                .collect(),
            points: PointsResponse::from(award.points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionDetail;

    #[test]
    fn test_session_response_stringifies_ids() {
        let session = WellnessSession::start(
            987654321012345678,
            42,
            SessionDetail::Meditation {
                technique: "body-scan".to_string(),
                guided: false,
                background_sound: None,
            },
            None,
            None,
        );

        let response = SessionResponse::from(session);
        assert_eq!(response.id, "987654321012345678");
        assert_eq!(response.user_id, "42");
        assert_eq!(response.session_type, "meditation");
    }

    #[test]
    fn test_user_response_email_hidden_for_others() {
        let user = User {
            id: 1,
            username: "stillwater".to_string(),
            email: "still@example.com".to_string(),
            ..Default::default()
        };

        let response = UserResponse::from_user(user, false);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("still@example.com"));
    }
}
