//! JSON output formatting for breathe.

use serde::Serialize;
use serde_json::json;

use crate::error::BreatheError;
use crate::exercise::{BreathPattern, Plan, PhaseName};

/// Format a plan as JSON, with per-phase counts alongside the timeline
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn format_plan_json(plan: &Plan) -> Result<String, BreatheError> {
    let counts: serde_json::Map<String, serde_json::Value> = PhaseName::ALL
        .iter()
        .map(|phase| (phase.key().to_string(), json!(plan.count(*phase))))
        .collect();

    let output = json!({
        "config": plan.config,
        "cycleSeconds": plan.config.durations.cycle_seconds(),
        "cyclesCompleted": plan.cycles_completed,
        "phaseCounts": counts,
        "count": plan.entries.len(),
        "items": plan.entries,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format patterns as JSON
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn format_patterns_json(patterns: &[BreathPattern]) -> Result<String, BreatheError> {
    let items: Vec<_> = patterns
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "label": p.label,
                "description": p.description,
                "durations": p.durations,
                "breathsPerMinute": p.breaths_per_minute(),
            })
        })
        .collect();

    let output = json!({
        "count": patterns.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `BreatheError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, BreatheError> {
    Ok(serde_json::to_string_pretty(value)?)
}
