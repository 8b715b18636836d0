//! Pure phase timing state machine.
//!
//! `PhaseClock` tracks total and per-phase remaining time and derives the
//! animation progress values. It never touches timers, audio or the screen;
//! the controller owns those and feeds the clock one-second ticks.

use serde::Serialize;

use crate::error::BreatheError;
use crate::exercise::config::{ExerciseConfig, PhaseName};

/// Upper clamp for rising progress values, allowing a slight overshoot.
pub const PROGRESS_MAX: f64 = 1.1;
/// Lower clamp for falling progress values.
pub const PROGRESS_MIN: f64 = -0.1;

/// Snapshot of a running exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseState {
    /// Current phase.
    pub phase: PhaseName,
    /// Whole seconds left in the session.
    pub total_remaining: u32,
    /// Seconds left in the current phase; never negative.
    pub phase_remaining: f64,
    /// Breathing progress driving the shape size, in [-0.1, 1.1].
    pub progress: f64,
    /// Pulse value for hold phases, in [0, 1.1]; zero otherwise.
    pub hold_pulse: f64,
    /// Full cycles finished so far.
    pub cycles_completed: u32,
}

/// Result of one second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do beyond re-rendering.
    Continue,
    /// The phase ran out; the caller must call `advance_phase`.
    PhaseElapsed,
    /// The session ran out.
    Completed,
}

/// Animation values derived from time spent in a phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub breath: f64,
    pub hold_pulse: f64,
}

/// Phase clock for one validated configuration.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    config: ExerciseConfig,
}

impl PhaseClock {
    /// Create a clock, rejecting invalid configurations.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidConfig` if validation fails.
    pub fn new(config: ExerciseConfig) -> Result<Self, BreatheError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this clock runs.
    #[must_use]
    pub const fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Wall-clock length of a phase after applying speed.
    #[must_use]
    pub fn phase_length(&self, phase: PhaseName) -> f64 {
        self.config.phase_seconds(phase)
    }

    /// Fresh state at the start of a session.
    ///
    /// A zero-length inhale is skipped straight away.
    #[must_use]
    pub fn initialize(&self) -> ExerciseState {
        let mut state = ExerciseState {
            phase: PhaseName::Inhale,
            total_remaining: self.config.total_seconds,
            phase_remaining: self.phase_length(PhaseName::Inhale),
            progress: PhaseName::Inhale.start_progress(),
            hold_pulse: 0.0,
            cycles_completed: 0,
        };
        if self.config.durations.get(PhaseName::Inhale) == 0 {
            self.advance_phase(&mut state);
        }
        state
    }

    /// Count down one second.
    ///
    /// Completion wins over a phase running out on the same tick.
    pub fn tick_seconds(&self, state: &mut ExerciseState) -> TickOutcome {
        state.total_remaining = state.total_remaining.saturating_sub(1);
        state.phase_remaining = (state.phase_remaining - 1.0).max(0.0);

        if state.total_remaining == 0 {
            TickOutcome::Completed
        } else if state.phase_remaining <= 0.0 {
            TickOutcome::PhaseElapsed
        } else {
            TickOutcome::Continue
        }
    }

    /// Move to the next phase with a non-zero duration.
    pub fn advance_phase(&self, state: &mut ExerciseState) {
        let mut next = state.phase;
        loop {
            next = next.next();
            if next == PhaseName::Inhale {
                state.cycles_completed += 1;
            }
            if self.config.durations.get(next) > 0 {
                break;
            }
        }

        state.phase = next;
        state.phase_remaining = self.phase_length(next);
        state.progress = next.start_progress();
        state.hold_pulse = 0.0;
    }

    /// Derive animation values from seconds spent in the current phase.
    #[must_use]
    pub fn compute_progress(&self, state: &ExerciseState, elapsed_in_phase: f64) -> Progress {
        let length = self.phase_length(state.phase);
        let fraction = if length > 0.0 {
            elapsed_in_phase.max(0.0) / length
        } else {
            PROGRESS_MAX
        };

        match state.phase {
            PhaseName::Inhale => Progress {
                breath: fraction.min(PROGRESS_MAX),
                hold_pulse: 0.0,
            },
            PhaseName::Exhale => Progress {
                breath: (1.0 - fraction).max(PROGRESS_MIN),
                hold_pulse: 0.0,
            },
            PhaseName::HoldInhale => Progress {
                breath: 1.0,
                hold_pulse: fraction.min(PROGRESS_MAX),
            },
            PhaseName::HoldExhale => Progress {
                breath: 0.0,
                hold_pulse: fraction.min(PROGRESS_MAX),
            },
        }
    }

    /// Store freshly computed animation values on the state.
    pub fn apply_progress(&self, state: &mut ExerciseState, elapsed_in_phase: f64) {
        let progress = self.compute_progress(state, elapsed_in_phase);
        state.progress = progress.breath;
        state.hold_pulse = progress.hold_pulse;
    }
}
