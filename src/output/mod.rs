//! Output formatting for breathe.
//!
//! Formatters for plans, patterns and session summaries in pretty or JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::BreatheError;
use crate::exercise::{BreathPattern, Plan, SessionSummary};

pub use json::*;
pub use pretty::*;

/// Format an exercise plan based on output format
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn format_plan(plan: &Plan, format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_plan_pretty(plan)),
        OutputFormat::Json => format_plan_json(plan),
    }
}

/// Format the built-in patterns based on output format
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn format_patterns(
    patterns: &[BreathPattern],
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_patterns_pretty(patterns)),
        OutputFormat::Json => format_patterns_json(patterns),
    }
}

/// Format a session summary based on output format
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn format_summary(
    summary: &SessionSummary,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => to_json(summary),
    }
}
