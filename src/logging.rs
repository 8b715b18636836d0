//! Logging initialization.
//!
//! Structured logging via `tracing`. Verbosity comes from `-v` flags and
//! can be overridden with `BREATHE_LOG`. While the full-screen UI owns the
//! terminal, output goes to a log file instead of stderr.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::ColorSetting;
use crate::error::BreatheError;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "BREATHE_LOG";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"`
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()` so calling this more than once is harmless.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(verbosity: u8, sink: &LogSink, color: ColorSetting) -> Result<(), BreatheError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let show_target = verbosity >= 2;

    match sink {
        LogSink::Stderr => {
            let use_ansi = match color {
                ColorSetting::Auto => {
                    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
                }
                ColorSetting::Always => true,
                ColorSetting::Never => false,
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    BreatheError::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(show_target)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
    Ok(())
}
