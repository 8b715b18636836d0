//! Exercise configuration: phases, their durations and the session speed.

use serde::{Deserialize, Serialize};

use crate::error::BreatheError;
use crate::exercise::audio::CueId;

/// One of the four stages of a breath cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseName {
    /// Breathing in.
    Inhale,
    /// Holding after the inhale.
    HoldInhale,
    /// Breathing out.
    Exhale,
    /// Holding after the exhale.
    HoldExhale,
}

impl PhaseName {
    /// Phases in cycle order.
    pub const ALL: [Self; 4] = [Self::Inhale, Self::HoldInhale, Self::Exhale, Self::HoldExhale];

    /// The phase that follows this one in the cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Inhale => Self::HoldInhale,
            Self::HoldInhale => Self::Exhale,
            Self::Exhale => Self::HoldExhale,
            Self::HoldExhale => Self::Inhale,
        }
    }

    /// Label shown to the user. Both holds read "Hold".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inhale => "Inhale",
            Self::HoldInhale | Self::HoldExhale => "Hold",
            Self::Exhale => "Exhale",
        }
    }

    /// Identifier used in config files and JSON output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Inhale => "inhale",
            Self::HoldInhale => "holdInhale",
            Self::Exhale => "exhale",
            Self::HoldExhale => "holdExhale",
        }
    }

    /// Check if this is a hold phase.
    #[must_use]
    pub const fn is_hold(self) -> bool {
        matches!(self, Self::HoldInhale | Self::HoldExhale)
    }

    /// Audio cue played during this phase, if any.
    #[must_use]
    pub const fn cue(self) -> Option<CueId> {
        match self {
            Self::Inhale => Some(CueId::Inhale),
            Self::Exhale => Some(CueId::Exhale),
            Self::HoldInhale | Self::HoldExhale => None,
        }
    }

    /// Breathing progress at the moment the phase is entered.
    #[must_use]
    pub const fn start_progress(self) -> f64 {
        match self {
            Self::Inhale | Self::HoldExhale => 0.0,
            Self::HoldInhale | Self::Exhale => 1.0,
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Configured length of each phase, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDurations {
    pub inhale: u32,
    pub hold_inhale: u32,
    pub exhale: u32,
    pub hold_exhale: u32,
}

impl PhaseDurations {
    /// Create durations from the four phase lengths in cycle order.
    #[must_use]
    pub const fn new(inhale: u32, hold_inhale: u32, exhale: u32, hold_exhale: u32) -> Self {
        Self {
            inhale,
            hold_inhale,
            exhale,
            hold_exhale,
        }
    }

    /// Configured seconds for a phase.
    #[must_use]
    pub const fn get(&self, phase: PhaseName) -> u32 {
        match phase {
            PhaseName::Inhale => self.inhale,
            PhaseName::HoldInhale => self.hold_inhale,
            PhaseName::Exhale => self.exhale,
            PhaseName::HoldExhale => self.hold_exhale,
        }
    }

    /// Length of one full cycle in configured seconds.
    #[must_use]
    pub const fn cycle_seconds(&self) -> u32 {
        self.inhale
            .saturating_add(self.hold_inhale)
            .saturating_add(self.exhale)
            .saturating_add(self.hold_exhale)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::new(4, 4, 4, 4)
    }
}

impl std::fmt::Display for PhaseDurations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.inhale, self.hold_inhale, self.exhale, self.hold_exhale
        )
    }
}

/// Settings for one exercise session. Immutable once the session starts.
/// Longest accepted session, in seconds (24 hours).
pub const MAX_TOTAL_SECONDS: u32 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    /// Total session length in seconds.
    pub total_seconds: u32,
    /// Per-phase lengths.
    pub durations: PhaseDurations,
    /// Multiplier shrinking every phase (2.0 halves them).
    pub speed: f64,
}

impl ExerciseConfig {
    /// Create and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidConfig` if any value is out of range.
    pub fn new(total_seconds: u32, durations: PhaseDurations, speed: f64) -> Result<Self, BreatheError> {
        let config = Self {
            total_seconds,
            durations,
            speed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration independently of where it came from.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidConfig` for a zero or over-long total
    /// time, a non-positive or non-finite speed, or a cycle whose phases are
    /// all zero.
    pub fn validate(&self) -> Result<(), BreatheError> {
        if self.total_seconds == 0 {
            return Err(BreatheError::InvalidConfig(
                "total time must be greater than zero".to_string(),
            ));
        }
        if self.total_seconds > MAX_TOTAL_SECONDS {
            return Err(BreatheError::InvalidConfig(format!(
                "total time must be at most {MAX_TOTAL_SECONDS} seconds, got {}",
                self.total_seconds
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(BreatheError::InvalidConfig(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        if self.durations.cycle_seconds() == 0 {
            return Err(BreatheError::InvalidConfig(
                "at least one phase must have a non-zero duration".to_string(),
            ));
        }
        Ok(())
    }

    /// Wall-clock seconds a phase lasts once speed is applied.
    #[must_use]
    pub fn phase_seconds(&self, phase: PhaseName) -> f64 {
        f64::from(self.durations.get(phase)) / self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_cycles() {
        let mut phase = PhaseName::Inhale;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(phase);
            phase = phase.next();
        }
        assert_eq!(
            seen,
            vec![
                PhaseName::Inhale,
                PhaseName::HoldInhale,
                PhaseName::Exhale,
                PhaseName::HoldExhale,
                PhaseName::Inhale
            ]
        );
    }

    #[test]
    fn test_only_breathing_phases_have_cues() {
        assert_eq!(PhaseName::Inhale.cue(), Some(CueId::Inhale));
        assert_eq!(PhaseName::Exhale.cue(), Some(CueId::Exhale));
        assert_eq!(PhaseName::HoldInhale.cue(), None);
        assert_eq!(PhaseName::HoldExhale.cue(), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let d = PhaseDurations::default();
        assert!(matches!(
            ExerciseConfig::new(0, d, 1.0),
            Err(BreatheError::InvalidConfig(_))
        ));
        assert!(matches!(
            ExerciseConfig::new(60, d, 0.0),
            Err(BreatheError::InvalidConfig(_))
        ));
        assert!(matches!(
            ExerciseConfig::new(60, d, -1.5),
            Err(BreatheError::InvalidConfig(_))
        ));
        assert!(matches!(
            ExerciseConfig::new(60, d, f64::NAN),
            Err(BreatheError::InvalidConfig(_))
        ));
        assert!(matches!(
            ExerciseConfig::new(60, PhaseDurations::new(0, 0, 0, 0), 1.0),
            Err(BreatheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_total_time_is_capped() {
        let d = PhaseDurations::default();
        assert!(ExerciseConfig::new(MAX_TOTAL_SECONDS, d, 1.0).is_ok());
        assert!(matches!(
            ExerciseConfig::new(MAX_TOTAL_SECONDS + 1, d, 1.0),
            Err(BreatheError::InvalidConfig(_))
        ));
        assert!(matches!(
            ExerciseConfig::new(u32::MAX, d, 1.0),
            Err(BreatheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_hold_is_valid() {
        let config = ExerciseConfig::new(60, PhaseDurations::new(4, 0, 4, 0), 1.0).unwrap();
        assert_eq!(config.durations.cycle_seconds(), 8);
    }

    #[test]
    fn test_phase_seconds_applies_speed() {
        let config = ExerciseConfig::new(60, PhaseDurations::new(4, 2, 6, 2), 2.0).unwrap();
        assert!((config.phase_seconds(PhaseName::Inhale) - 2.0).abs() < f64::EPSILON);
        assert!((config.phase_seconds(PhaseName::Exhale) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PhaseName::HoldInhale).unwrap();
        assert_eq!(json, "\"holdInhale\"");
        let d: PhaseDurations =
            serde_json::from_str(r#"{"inhale":4,"holdInhale":7,"exhale":8,"holdExhale":0}"#)
                .unwrap();
        assert_eq!(d, PhaseDurations::new(4, 7, 8, 0));
    }
}
