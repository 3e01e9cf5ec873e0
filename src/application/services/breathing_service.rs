//! Breathing Service
//!
//! Breathing pattern catalog, custom pattern validation, cycle tracking on
//! breathing sessions, and per-pattern usage statistics.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{SessionDetail, SessionType, WellnessSession, WellnessSessionRepository};

/// A named breathing pattern with phase timings in seconds.
#[derive(Debug, Clone, Serialize)]
pub struct BreathingPattern {
    pub name: &'static str,
    pub inhale_secs: u16,
    pub hold_secs: u16,
    pub exhale_secs: u16,
    pub description: &'static str,
}

/// Built-in pattern catalog.
pub const PATTERNS: &[BreathingPattern] = &[
    BreathingPattern {
        name: "box",
        inhale_secs: 4,
        hold_secs: 4,
        exhale_secs: 4,
        description: "Equal four-count inhale, hold, and exhale",
    },
    BreathingPattern {
        name: "478",
        inhale_secs: 4,
        hold_secs: 7,
        exhale_secs: 8,
        description: "Relaxing 4-7-8 pattern for winding down",
    },
    BreathingPattern {
        name: "coherent",
        inhale_secs: 5,
        hold_secs: 0,
        exhale_secs: 5,
        description: "Five-second inhale and exhale, about six breaths a minute",
    },
];

/// Phase timing bounds for custom patterns.
const MIN_PHASE_SECS: u16 = 1;
const MAX_PHASE_SECS: u16 = 30;
const MAX_HOLD_SECS: u16 = 30;

/// Usage statistics for one breathing pattern.
#[derive(Debug, Clone, Serialize)]
pub struct PatternStats {
    pub pattern: String,
    pub sessions: i64,
    pub total_cycles: i64,
    pub total_active_secs: i64,
}

/// Breathing service trait
#[async_trait]
pub trait BreathingService: Send + Sync {
    /// The built-in breathing pattern catalog.
    fn patterns(&self) -> &'static [BreathingPattern];

    /// Add completed cycles to an open breathing session.
    async fn record_cycles(
        &self,
        user_id: i64,
        session_id: i64,
        cycles: u32,
    ) -> Result<WellnessSession, BreathingError>;

    /// Per-pattern statistics over the user's completed breathing sessions.
    async fn pattern_stats(&self, user_id: i64) -> Result<Vec<PatternStats>, BreathingError>;
}

/// Breathing service errors
#[derive(Debug, thiserror::Error)]
pub enum BreathingError {
    #[error("Session not found")]
    NotFound,

    #[error("Session belongs to another user")]
    NotOwner,

    #[error("Session is not a breathing session")]
    NotBreathing,

    #[error("Session is already finished")]
    SessionFinished,

    #[error("Invalid breathing pattern: {0}")]
    InvalidPattern(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::shared::error::AppError> for BreathingError {
    fn from(e: crate::shared::error::AppError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Validate a custom pattern's phase timings.
///
/// Inhale and exhale must be 1-30 seconds; hold may be 0 (as in coherent
/// breathing) up to 30 seconds.
pub fn validate_custom_pattern(
    inhale_secs: u16,
    hold_secs: u16,
    exhale_secs: u16,
) -> Result<(), BreathingError> {
    if !(MIN_PHASE_SECS..=MAX_PHASE_SECS).contains(&inhale_secs) {
        return Err(BreathingError::InvalidPattern(format!(
            "inhale must be {}-{} seconds",
            MIN_PHASE_SECS, MAX_PHASE_SECS
        )));
    }
    if hold_secs > MAX_HOLD_SECS {
        return Err(BreathingError::InvalidPattern(format!(
            "hold must be at most {} seconds",
            MAX_HOLD_SECS
        )));
    }
    if !(MIN_PHASE_SECS..=MAX_PHASE_SECS).contains(&exhale_secs) {
        return Err(BreathingError::InvalidPattern(format!(
            "exhale must be {}-{} seconds",
            MIN_PHASE_SECS, MAX_PHASE_SECS
        )));
    }
    Ok(())
}

/// Validate a breathing session payload before it is started.
///
/// Known pattern names are accepted as-is; a "custom" pattern has its phase
/// timings bounds-checked. Anything else is rejected.
pub fn validate_breathing_detail(detail: &SessionDetail) -> Result<(), BreathingError> {
    let SessionDetail::Breathing {
        pattern,
        inhale_secs,
        hold_secs,
        exhale_secs,
        target_cycles,
        ..
    } = detail
    else {
        return Ok(());
    };

    if *target_cycles == 0 {
        return Err(BreathingError::InvalidPattern(
            "target_cycles must be at least 1".to_string(),
        ));
    }

    if PATTERNS.iter().any(|p| p.name == pattern) {
        return Ok(());
    }

    if pattern != "custom" {
        return Err(BreathingError::InvalidPattern(format!(
            "unknown pattern '{}'",
            pattern
        )));
    }

    validate_custom_pattern(*inhale_secs, *hold_secs, *exhale_secs)
}

/// BreathingService implementation
pub struct BreathingServiceImpl<R>
where
    R: WellnessSessionRepository,
{
    session_repo: Arc<R>,
}

impl<R> BreathingServiceImpl<R>
where
    R: WellnessSessionRepository,
{
    pub fn new(session_repo: Arc<R>) -> Self {
        Self { session_repo }
    }
}

#[async_trait]
impl<R> BreathingService for BreathingServiceImpl<R>
where
    R: WellnessSessionRepository + 'static,
{
    fn patterns(&self) -> &'static [BreathingPattern] {
        PATTERNS
    }

    async fn record_cycles(
        &self,
        user_id: i64,
        session_id: i64,
        cycles: u32,
    ) -> Result<WellnessSession, BreathingError> {
        let mut session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(BreathingError::NotFound)?;

        if session.user_id != user_id {
            return Err(BreathingError::NotOwner);
        }
        if session.is_finished() {
            return Err(BreathingError::SessionFinished);
        }

        match &mut session.detail {
            SessionDetail::Breathing {
                completed_cycles, ..
            } => {
                *completed_cycles = completed_cycles.saturating_add(cycles);
            }
            _ => return Err(BreathingError::NotBreathing),
        }

        Ok(self.session_repo.update(&session).await?)
    }

    async fn pattern_stats(&self, user_id: i64) -> Result<Vec<PatternStats>, BreathingError> {
        let sessions = self.session_repo.list_completed_for_user(user_id).await?;

        let mut by_pattern: HashMap<String, PatternStats> = HashMap::new();
        for session in sessions
            .into_iter()
            .filter(|s| s.session_type == SessionType::Breathing)
        {
            let SessionDetail::Breathing {
                pattern,
                completed_cycles,
                ..
            } = &session.detail
            else {
                continue;
            };

            let entry = by_pattern
                .entry(pattern.clone())
                .or_insert_with(|| PatternStats {
                    pattern: pattern.clone(),
                    sessions: 0,
                    total_cycles: 0,
                    total_active_secs: 0,
                });
            entry.sessions += 1;
            entry.total_cycles += *completed_cycles as i64;
            entry.total_active_secs += session.active_secs;
        }

        let mut stats: Vec<_> = by_pattern.into_values().collect();
        stats.sort_by(|a, b| b.sessions.cmp(&a.sessions).then(a.pattern.cmp(&b.pattern)));
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_three_builtin_patterns() {
        assert_eq!(PATTERNS.len(), 3);
        assert!(PATTERNS.iter().any(|p| p.name == "box"));
        assert!(PATTERNS.iter().any(|p| p.name == "478"));
        assert!(PATTERNS.iter().any(|p| p.name == "coherent"));
    }

    #[test]
    fn test_custom_pattern_bounds() {
        assert!(validate_custom_pattern(4, 4, 4).is_ok());
        assert!(validate_custom_pattern(5, 0, 5).is_ok());
        assert!(validate_custom_pattern(0, 4, 4).is_err());
        assert!(validate_custom_pattern(4, 31, 4).is_err());
        assert!(validate_custom_pattern(4, 4, 31).is_err());
    }

    #[test]
    fn test_validate_detail_accepts_known_pattern() {
        let detail = SessionDetail::Breathing {
            pattern: "box".to_string(),
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            target_cycles: 10,
            completed_cycles: 0,
        };
        assert!(validate_breathing_detail(&detail).is_ok());
    }

    #[test]
    fn test_validate_detail_rejects_unknown_pattern() {
        let detail = SessionDetail::Breathing {
            pattern: "holotropic".to_string(),
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            target_cycles: 10,
            completed_cycles: 0,
        };
        assert!(matches!(
            validate_breathing_detail(&detail),
            Err(BreathingError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_validate_detail_rejects_zero_target() {
        let detail = SessionDetail::Breathing {
            pattern: "box".to_string(),
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            target_cycles: 0,
            completed_cycles: 0,
        };
        assert!(validate_breathing_detail(&detail).is_err());
    }

    #[test]
    fn test_validate_detail_checks_custom_bounds() {
        let detail = SessionDetail::Breathing {
            pattern: "custom".to_string(),
            inhale_secs: 6,
            hold_secs: 2,
            exhale_secs: 8,
            target_cycles: 12,
            completed_cycles: 0,
        };
        assert!(validate_breathing_detail(&detail).is_ok());

        let detail = SessionDetail::Breathing {
            pattern: "custom".to_string(),
            inhale_secs: 45,
            hold_secs: 2,
            exhale_secs: 8,
            target_cycles: 12,
            completed_cycles: 0,
        };
        assert!(validate_breathing_detail(&detail).is_err());
    }

    #[test]
    fn test_non_breathing_detail_passes_validation() {
        let detail = SessionDetail::Meditation {
            technique: "mindfulness".to_string(),
            guided: false,
            background_sound: None,
        };
        assert!(validate_breathing_detail(&detail).is_ok());
    }
}
