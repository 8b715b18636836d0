//! Guided breathing exercises.
//!
//! - `clock`: pure phase timing state machine
//! - `controller`: scheduling, rendering and audio around the clock
//! - `audio`, `render`: the collaborators the controller talks to
//! - `patterns`, `plan`: presets and headless timelines

pub mod audio;
pub mod clock;
pub mod config;
pub mod controller;
pub mod duration;
pub mod patterns;
pub mod plan;
pub mod render;
pub mod scheduler;
pub mod summary;
#[cfg(test)]
mod testing;
pub mod time;

pub use audio::{AudioPlayer, CommandPlayer, CueDispatcher, CueId, SilentPlayer};
pub use clock::{ExerciseState, PhaseClock, Progress, TickOutcome};
pub use config::{ExerciseConfig, PhaseDurations, PhaseName};
pub use controller::{ControllerSettings, ExerciseController, SessionStatus};
pub use duration::{format_clock, format_duration, parse_duration, parse_seconds};
pub use patterns::{builtin_patterns, find_pattern, BreathPattern};
pub use plan::{Plan, PlanEntry};
pub use render::{NullRenderer, PhaseColor, Renderer, Visuals};
pub use summary::SessionSummary;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
