//! Summary of a finished session.

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

use crate::exercise::clock::ExerciseState;
use crate::exercise::config::ExerciseConfig;
use crate::exercise::controller::SessionStatus;

/// What happened in a session, reported after the UI closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub config: ExerciseConfig,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Seconds of the session that were counted down.
    pub practiced_seconds: u32,
    pub cycles_completed: u32,
    /// True if the total time ran out rather than the user exiting.
    pub completed: bool,
}

impl SessionSummary {
    /// Build a summary from the last state the controller held.
    #[must_use]
    pub fn new(
        config: ExerciseConfig,
        started_at: DateTime<Local>,
        finished_at: DateTime<Local>,
        last_state: Option<&ExerciseState>,
        status: SessionStatus,
    ) -> Self {
        let remaining = last_state.map_or(config.total_seconds, |s| s.total_remaining);
        Self {
            config,
            started_at,
            finished_at,
            practiced_seconds: config.total_seconds.saturating_sub(remaining),
            cycles_completed: last_state.map_or(0, |s| s.cycles_completed),
            completed: status == SessionStatus::Completed,
        }
    }

    /// Counted-down time as a chrono duration.
    #[must_use]
    pub fn practiced(&self) -> Duration {
        Duration::seconds(i64::from(self.practiced_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::config::{PhaseDurations, PhaseName};

    #[test]
    fn test_summary_from_state() {
        let config = ExerciseConfig::new(120, PhaseDurations::default(), 1.0).unwrap();
        let state = ExerciseState {
            phase: PhaseName::Exhale,
            total_remaining: 30,
            phase_remaining: 1.0,
            progress: 0.5,
            hold_pulse: 0.0,
            cycles_completed: 5,
        };
        let now = Local::now();
        let summary = SessionSummary::new(config, now, now, Some(&state), SessionStatus::Idle);

        assert_eq!(summary.practiced_seconds, 90);
        assert_eq!(summary.practiced(), Duration::seconds(90));
        assert_eq!(summary.cycles_completed, 5);
        assert!(!summary.completed);
    }

    #[test]
    fn test_summary_without_state() {
        let config = ExerciseConfig::new(60, PhaseDurations::default(), 1.0).unwrap();
        let now = Local::now();
        let summary = SessionSummary::new(config, now, now, None, SessionStatus::Idle);
        assert_eq!(summary.practiced_seconds, 0);
    }
}
