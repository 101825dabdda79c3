use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_SESSIONS: u32 = 1;
pub const MAX_SESSIONS: u32 = 8;
pub const MIN_SESSION_MINUTES: u32 = 10;
pub const MAX_SESSION_MINUTES: u32 = 60;

/// Rest length between Work intervals. Not configurable.
pub const REST_MINUTES: u32 = 5;

/// What the user asked for when starting a focus run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSessionConfig {
    pub topic: String,
    pub total_sessions: u32,
    pub session_duration_minutes: u32,
}

impl FocusSessionConfig {
    /// Build a config, rejecting anything outside the allowed ranges.
    pub fn new(
        topic: impl Into<String>,
        total_sessions: u32,
        session_duration_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            topic: topic.into().trim().to_string(),
            total_sessions,
            session_duration_minutes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// The engine itself never re-checks these, so anything deserialized
    /// from outside should pass through here first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "topic".into(),
            });
        }
        check_range(
            "total_sessions",
            self.total_sessions,
            MIN_SESSIONS,
            MAX_SESSIONS,
        )?;
        check_range(
            "session_duration_minutes",
            self.session_duration_minutes,
            MIN_SESSION_MINUTES,
            MAX_SESSION_MINUTES,
        )?;
        Ok(())
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.session_duration_minutes).saturating_mul(60)
    }

    pub fn rest_secs(&self) -> u64 {
        u64::from(REST_MINUTES) * 60
    }

    /// Seconds from start to completion, rests included.
    pub fn total_secs(&self) -> u64 {
        let sessions = u64::from(self.total_sessions);
        sessions * self.work_secs() + sessions.saturating_sub(1) * self.rest_secs()
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.into(),
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(FocusSessionConfig::new("Algebra", 1, 10).is_ok());
        assert!(FocusSessionConfig::new("Algebra", 8, 60).is_ok());
    }

    #[test]
    fn trims_topic() {
        let cfg = FocusSessionConfig::new("  Biology ", 2, 25).unwrap();
        assert_eq!(cfg.topic, "Biology");
    }

    #[test]
    fn rejects_blank_topic() {
        let err = FocusSessionConfig::new("   ", 2, 25).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "topic".into()
            }
        );
    }

    #[test]
    fn rejects_zero_sessions() {
        let err = FocusSessionConfig::new("Algebra", 0, 25).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "total_sessions"));
    }

    #[test]
    fn rejects_too_many_sessions() {
        assert!(FocusSessionConfig::new("Algebra", 9, 25).is_err());
    }

    #[test]
    fn rejects_duration_out_of_range() {
        assert!(FocusSessionConfig::new("Algebra", 2, 9).is_err());
        assert!(FocusSessionConfig::new("Algebra", 2, 61).is_err());
    }

    #[test]
    fn total_secs_includes_rests() {
        let cfg = FocusSessionConfig::new("Algebra", 3, 20).unwrap();
        assert_eq!(cfg.total_secs(), 3 * 20 * 60 + 2 * 300);
    }
}
