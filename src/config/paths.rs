//! Path resolution for breathe configuration and data files.
//!
//! Everything lives in `~/.breathe/`:
//! - `config.yaml` - Main configuration file
//! - `sounds/` - Default location of the inhale/exhale cues
//! - `breathe.log` - Log output while the full-screen UI is active

use std::path::PathBuf;

use crate::error::BreatheError;

/// Paths to breathe configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.breathe/`
    pub root: PathBuf,
    /// Config file: `~/.breathe/config.yaml`
    pub config_file: PathBuf,
    /// Sounds directory: `~/.breathe/sounds/`
    pub sounds: PathBuf,
    /// Log file: `~/.breathe/breathe.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BreatheError> {
        let home = std::env::var("HOME")
            .map_err(|_| BreatheError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".breathe")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            sounds: root.join("sounds"),
            log_file: root.join("breathe.log"),
            root,
        }
    }

    /// Default file for a cue, e.g. `sounds/inhale.mp3`.
    #[must_use]
    pub fn default_cue(&self, name: &str) -> PathBuf {
        self.sounds.join(format!("{name}.mp3"))
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), BreatheError> {
        for dir in [&self.root, &self.sounds] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    BreatheError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".breathe")))
    }
}
