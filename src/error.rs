//! Error types for breathe.

use thiserror::Error;

/// Errors that can occur while configuring or running an exercise.
#[derive(Error, Debug)]
pub enum BreatheError {
    /// The exercise configuration was rejected; the session never starts.
    #[error("Invalid exercise configuration: {0}")]
    InvalidConfig(String),

    /// Audio playback was rejected by the environment.
    ///
    /// Recoverable: the exercise continues silently.
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// The view the controller renders into is not usable.
    #[error("Render target missing: {0}")]
    RenderTargetMissing(String),

    /// `restart` was called before any session was started.
    #[error("No exercise session has been started")]
    NoSession,

    /// Configuration file or settings problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BreatheError {
    /// Whether the session can carry on after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AudioUnavailable(_))
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) | Self::Config(_) => 2,
            Self::RenderTargetMissing(_) | Self::Terminal(_) => 3,
            _ => 1,
        }
    }
}
