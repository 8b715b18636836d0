//! Headless preview of a session's phase timeline.

use serde::Serialize;

use crate::exercise::clock::{PhaseClock, TickOutcome};
use crate::exercise::config::{ExerciseConfig, PhaseName};

/// One phase as it will play out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Second of the session at which the phase starts.
    pub starts_at: u32,
    pub phase: PhaseName,
    /// Whole seconds the phase actually lasts, cut short at the end.
    pub seconds: u32,
    /// Cycle the phase belongs to, starting at zero.
    pub cycle: u32,
}

/// The full timeline of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub config: ExerciseConfig,
    pub entries: Vec<PlanEntry>,
    pub cycles_completed: u32,
}

impl Plan {
    /// Run the clock to completion and record every phase start.
    #[must_use]
    pub fn simulate(clock: &PhaseClock) -> Self {
        let mut state = clock.initialize();
        let mut entries = vec![PlanEntry {
            starts_at: 0,
            phase: state.phase,
            seconds: 0,
            cycle: state.cycles_completed,
        }];

        let mut second = 0;
        loop {
            second += 1;
            match clock.tick_seconds(&mut state) {
                TickOutcome::Continue => {}
                TickOutcome::PhaseElapsed => {
                    clock.advance_phase(&mut state);
                    entries.push(PlanEntry {
                        starts_at: second,
                        phase: state.phase,
                        seconds: 0,
                        cycle: state.cycles_completed,
                    });
                }
                TickOutcome::Completed => break,
            }
        }

        let mut ends = entries.iter().skip(1).map(|e| e.starts_at).collect::<Vec<_>>();
        ends.push(second);
        for (entry, end) in entries.iter_mut().zip(ends) {
            entry.seconds = end - entry.starts_at;
        }

        Self {
            config: *clock.config(),
            entries,
            cycles_completed: state.cycles_completed,
        }
    }

    /// Count phases of one kind.
    #[must_use]
    pub fn count(&self, phase: PhaseName) -> usize {
        self.entries.iter().filter(|e| e.phase == phase).count()
    }
}
