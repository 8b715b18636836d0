//! Command implementations for breathe.
//!
//! Each handler returns the text to print, already formatted for the
//! requested output format.

mod completions;
mod config;
mod plan;
mod start;

pub use completions::completions;
pub use config::config;
pub use plan::{patterns, plan};
pub use start::start;

use std::path::PathBuf;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{ColorSetting, Config, Paths};
use crate::error::BreatheError;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub paths: Paths,
    /// Config file in effect, from `--config` or the default location.
    pub config_file: PathBuf,
    pub config: Config,
}

impl Context {
    /// Load the configuration for a parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be parsed.
    pub fn with_paths(cli: &Cli, paths: Paths) -> Result<Self, BreatheError> {
        let config_file = cli
            .config
            .clone()
            .unwrap_or_else(|| paths.config_file.clone());
        let config = Config::load_from_path(&config_file)?;

        Ok(Self {
            format: cli.output,
            paths,
            config_file,
            config,
        })
    }

    /// Color setting from the command line, else the config file.
    #[must_use]
    pub fn color(&self, cli: &Cli) -> ColorSetting {
        cli.color.unwrap_or(self.config.display.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_context_uses_config_flag() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("custom.yaml");
        std::fs::write(&file, "display:\n  color: never\n").unwrap();

        let cli = Cli::parse_from(["breathe", "--config", file.to_str().unwrap(), "patterns"]);
        let ctx = Context::with_paths(&cli, Paths::with_root(temp_dir.path().join(".breathe")))
            .unwrap();

        assert_eq!(ctx.config_file, file);
        assert_eq!(ctx.color(&cli), ColorSetting::Never);
    }

    #[test]
    fn test_context_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join(".breathe"));
        let cli = Cli::parse_from(["breathe", "--color", "always", "patterns"]);
        let ctx = Context::with_paths(&cli, paths.clone()).unwrap();

        assert_eq!(ctx.config_file, paths.config_file);
        assert_eq!(ctx.config, Config::default());
        assert_eq!(ctx.color(&cli), ColorSetting::Always);
    }
}
