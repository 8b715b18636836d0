//! Configuration management for breathe.
//!
//! This module handles loading and saving configuration from `~/.breathe/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{AudioConfig, ColorSetting, Config, DisplayConfig, ExerciseDefaults};
