//! breathe - guided breathing exercises in the terminal
//!
//! A phase clock steps through inhale, hold, exhale and hold for a fixed
//! total time; a controller drives it from a one-second tick and a frame
//! loop, renders a breathing circle and keeps audio cues in step.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod exercise;
pub mod logging;
pub mod output;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::BreatheError;
pub use exercise::{ExerciseConfig, ExerciseController, PhaseClock};
