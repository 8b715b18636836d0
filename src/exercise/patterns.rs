//! Built-in breathing patterns.
//!
//! A pattern is a named set of phase durations that can be used instead of
//! passing all four durations on the command line.

use serde::Serialize;

use crate::exercise::config::PhaseDurations;

/// A named breathing pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathPattern {
    /// Identifier used on the command line.
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub durations: PhaseDurations,
}

impl BreathPattern {
    /// Breaths per minute at normal speed.
    #[must_use]
    pub fn breaths_per_minute(&self) -> f64 {
        60.0 / f64::from(self.durations.cycle_seconds())
    }
}

const PATTERNS: [BreathPattern; 5] = [
    BreathPattern {
        id: "box",
        label: "Box",
        description: "Equal in, hold, out, hold. Steadies attention.",
        durations: PhaseDurations::new(4, 4, 4, 4),
    },
    BreathPattern {
        id: "4-7-8",
        label: "Tranquility",
        description: "Long hold and slow exhale for winding down before sleep.",
        durations: PhaseDurations::new(4, 7, 8, 0),
    },
    BreathPattern {
        id: "relax",
        label: "Relax",
        description: "Exhale twice as long as the inhale.",
        durations: PhaseDurations::new(4, 2, 8, 2),
    },
    BreathPattern {
        id: "coherence",
        label: "Coherence",
        description: "Six breaths a minute with no holds.",
        durations: PhaseDurations::new(5, 0, 5, 0),
    },
    BreathPattern {
        id: "triangle",
        label: "Triangle",
        description: "In, hold, out in equal parts.",
        durations: PhaseDurations::new(4, 4, 4, 0),
    },
];

/// All built-in patterns.
#[must_use]
pub const fn builtin_patterns() -> &'static [BreathPattern] {
    &PATTERNS
}

/// Look up a pattern by id, case-insensitively.
#[must_use]
pub fn find_pattern(id: &str) -> Option<&'static BreathPattern> {
    PATTERNS.iter().find(|p| p.id.eq_ignore_ascii_case(id.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pattern() {
        assert_eq!(find_pattern("box").unwrap().durations, PhaseDurations::new(4, 4, 4, 4));
        assert_eq!(find_pattern(" BOX ").unwrap().id, "box");
        assert!(find_pattern("nope").is_none());
    }

    #[test]
    fn test_every_pattern_has_a_cycle() {
        for pattern in builtin_patterns() {
            assert!(pattern.durations.cycle_seconds() > 0, "{}", pattern.id);
        }
    }

    #[test]
    fn test_breaths_per_minute() {
        let coherence = find_pattern("coherence").unwrap();
        assert!((coherence.breaths_per_minute() - 6.0).abs() < f64::EPSILON);
    }
}
