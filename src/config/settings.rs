//! Configuration settings for breathe.
//!
//! Settings are loaded from `~/.breathe/config.yaml`. Every field has a
//! default, so a partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::BreatheError;
use crate::exercise::{find_pattern, ExerciseConfig, PhaseDurations};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default exercise settings.
    pub exercise: ExerciseDefaults,
    /// Audio cue settings.
    pub audio: AudioConfig,
    /// Display settings.
    pub display: DisplayConfig,
}

/// Exercise used when no flags override it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExerciseDefaults {
    /// Session length in minutes.
    #[serde(default = "default_total_minutes")]
    pub total_minutes: u32,
    /// Built-in pattern; takes precedence over the durations below.
    pub pattern: Option<String>,
    #[serde(default = "default_phase_seconds")]
    pub inhale: u32,
    #[serde(default = "default_phase_seconds")]
    pub hold_inhale: u32,
    #[serde(default = "default_phase_seconds")]
    pub exhale: u32,
    #[serde(default = "default_phase_seconds")]
    pub hold_exhale: u32,
    /// Speed multiplier; 2.0 halves every phase.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

/// Audio cue settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Play cues at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Player program.
    #[serde(default = "default_audio_command")]
    pub command: String,
    /// Player arguments; `{file}` and `{rate}` are substituted.
    #[serde(default = "default_audio_args")]
    pub args: Vec<String>,
    /// Inhale cue; defaults to `~/.breathe/sounds/inhale.mp3`.
    pub inhale_file: Option<PathBuf>,
    /// Exhale cue; defaults to `~/.breathe/sounds/exhale.mp3`.
    pub exhale_file: Option<PathBuf>,
    /// Natural loop length of the recordings, in seconds.
    #[serde(default = "default_reference_seconds")]
    pub reference_seconds: f64,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Animation frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Color output setting.
    #[serde(default)]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

// Default value functions for serde
const fn default_total_minutes() -> u32 {
    5
}

const fn default_phase_seconds() -> u32 {
    4
}

const fn default_speed() -> f64 {
    1.0
}

const fn default_true() -> bool {
    true
}

fn default_audio_command() -> String {
    "afplay".to_string()
}

fn default_audio_args() -> Vec<String> {
    ["-q", "1", "-r", "{rate}", "{file}"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_reference_seconds() -> f64 {
    4.0
}

const fn default_frame_rate() -> u32 {
    30
}

impl Default for ExerciseDefaults {
    fn default() -> Self {
        Self {
            total_minutes: default_total_minutes(),
            pattern: None,
            inhale: default_phase_seconds(),
            hold_inhale: default_phase_seconds(),
            exhale: default_phase_seconds(),
            hold_exhale: default_phase_seconds(),
            speed: default_speed(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_audio_command(),
            args: default_audio_args(),
            inhale_file: None,
            exhale_file: None,
            reference_seconds: default_reference_seconds(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            color: ColorSetting::default(),
        }
    }
}

impl ExerciseDefaults {
    /// Phase durations, from the named pattern if one is set.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Config` if the pattern does not exist.
    pub fn durations(&self) -> Result<PhaseDurations, BreatheError> {
        match &self.pattern {
            Some(id) => find_pattern(id)
                .map(|p| p.durations)
                .ok_or_else(|| BreatheError::Config(format!("Unknown pattern in config: {id}"))),
            None => Ok(PhaseDurations::new(
                self.inhale,
                self.hold_inhale,
                self.exhale,
                self.hold_exhale,
            )),
        }
    }

    /// The default exercise as a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown pattern or invalid values.
    pub fn to_exercise(&self) -> Result<ExerciseConfig, BreatheError> {
        ExerciseConfig::new(self.total_minutes.saturating_mul(60), self.durations()?, self.speed)
    }
}

impl AudioConfig {
    /// Resolved cue files, falling back to the sounds directory.
    #[must_use]
    pub fn cue_files(&self, paths: &Paths) -> (PathBuf, PathBuf) {
        (
            self.inhale_file
                .clone()
                .unwrap_or_else(|| paths.default_cue("inhale")),
            self.exhale_file
                .clone()
                .unwrap_or_else(|| paths.default_cue("exhale")),
        )
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, BreatheError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BreatheError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            BreatheError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), BreatheError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| BreatheError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            BreatheError::Config(format!("Failed to write config file {}: {e}", path.display()))
        })
    }
}
