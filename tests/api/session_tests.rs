//! Session Lifecycle Tests
//!
//! State machine, subtype payload, and award arithmetic tests that run
//! without backing services.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use test_case::test_case;

use wellness_server::application::services::breathing_service::{
    validate_breathing_detail, PATTERNS,
};
use wellness_server::domain::{SessionDetail, SessionStatus, UserPoints, WellnessSession};

fn meditation_detail() -> SessionDetail {
    SessionDetail::Meditation {
        technique: "body-scan".into(),
        guided: true,
        background_sound: Some("rain".into()),
    }
}

fn breathing_detail(pattern: &str) -> SessionDetail {
    SessionDetail::Breathing {
        pattern: pattern.into(),
        inhale_secs: 4,
        hold_secs: 4,
        exhale_secs: 4,
        target_cycles: 10,
        completed_cycles: 0,
    }
}

#[test]
fn test_full_lifecycle_pause_resume_complete() {
    let mut session = WellnessSession::start(1, 42, meditation_detail(), Some(600), Some(4));
    assert_eq!(session.status, SessionStatus::Active);

    session.transition_to(SessionStatus::Paused).unwrap();
    assert_eq!(session.status, SessionStatus::Paused);
    assert!(session.paused_at.is_some());

    session.transition_to(SessionStatus::Active).unwrap();
    assert!(session.paused_at.is_none());

    session.transition_to(SessionStatus::Completed).unwrap();
    assert!(session.is_finished());
    assert!(session.completed_at.is_some());
}

#[test]
fn test_terminal_states_reject_further_transitions() {
    let mut session = WellnessSession::start(1, 42, meditation_detail(), None, None);
    session.transition_to(SessionStatus::Abandoned).unwrap();

    for next in [
        SessionStatus::Active,
        SessionStatus::Paused,
        SessionStatus::Completed,
    ] {
        assert!(session.transition_to(next).is_err());
    }
}

#[test_case(SessionStatus::Paused, true; "active_to_paused")]
#[test_case(SessionStatus::Completed, true; "active_to_completed")]
#[test_case(SessionStatus::Abandoned, true; "active_to_abandoned")]
#[test_case(SessionStatus::Active, false; "active_to_active")]
fn test_transitions_from_active(to: SessionStatus, allowed: bool) {
    let mut session = WellnessSession::start(1, 42, meditation_detail(), None, None);
    assert_eq!(session.transition_to(to).is_ok(), allowed);
}

#[test]
fn test_paused_session_cannot_complete_directly() {
    let mut session = WellnessSession::start(1, 42, meditation_detail(), None, None);
    session.transition_to(SessionStatus::Paused).unwrap();

    let err = session.transition_to(SessionStatus::Completed).unwrap_err();
    assert_eq!(err.from, SessionStatus::Paused);
    assert_eq!(err.to, SessionStatus::Completed);
}

#[test]
fn test_detail_serializes_with_kind_tag() {
    let json = serde_json::to_value(breathing_detail("box")).unwrap();
    assert_eq!(json["kind"], "breathing");
    assert_eq!(json["pattern"], "box");

    let back: SessionDetail = serde_json::from_value(json).unwrap();
    assert_eq!(back, breathing_detail("box"));
}

#[test]
fn test_mood_delta() {
    let mut session = WellnessSession::start(1, 42, meditation_detail(), None, Some(3));
    assert_eq!(session.mood_delta(), None);

    session.mood_after = Some(8);
    assert_eq!(session.mood_delta(), Some(5));
}

#[test]
fn test_known_patterns_validate() {
    for pattern in PATTERNS {
        assert!(validate_breathing_detail(&breathing_detail(pattern.name)).is_ok());
    }
}

#[test]
fn test_unknown_pattern_rejected() {
    assert!(validate_breathing_detail(&breathing_detail("wim-hof")).is_err());
}

#[test]
fn test_streak_rolls_across_consecutive_days() {
    let mut points = UserPoints::new(42);
    let day1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let day4 = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();

    points.record_activity(20, day1);
    assert_eq!(points.current_streak_days, 1);

    points.record_activity(20, day2);
    assert_eq!(points.current_streak_days, 2);
    assert_eq!(points.longest_streak_days, 2);
    assert_eq!(points.total_points, 40);

    // A skipped day resets the current streak but keeps the longest.
    points.record_activity(20, day4);
    assert_eq!(points.current_streak_days, 1);
    assert_eq!(points.longest_streak_days, 2);
}

#[test]
fn test_same_day_activity_does_not_double_count_streak() {
    let mut points = UserPoints::new(42);
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    points.record_activity(10, day);
    points.record_activity(10, day);

    assert_eq!(points.current_streak_days, 1);
    assert_eq!(points.total_points, 20);
}
