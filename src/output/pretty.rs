use colored::{ColoredString, Colorize};

use crate::exercise::duration::render_progress_bar;
use crate::exercise::{
    format_clock, format_duration, BreathPattern, PhaseColor, PhaseName, Plan, SessionSummary,
};

fn paint(text: &str, phase: PhaseName) -> ColoredString {
    match PhaseColor::for_phase(phase) {
        PhaseColor::Green => text.green(),
        PhaseColor::Blue => text.blue(),
        PhaseColor::Red => text.red(),
    }
}

/// Format a plan as a timeline table
pub fn format_plan_pretty(plan: &Plan) -> String {
    let config = &plan.config;
    let mut output = format!(
        "Plan: {} at {}x ({})\n",
        config.durations.to_string().bold(),
        config.speed,
        format_clock(config.total_seconds)
    );
    output.push_str(&"─".repeat(40));
    output.push('\n');

    if plan.entries.is_empty() {
        output.push_str("  No phases");
        return output;
    }

    for entry in &plan.entries {
        let label = format!("{:<12}", entry.phase.to_string());
        output.push_str(&format!(
            "  {}  {}  {:>3}s  {}\n",
            format_clock(entry.starts_at).dimmed(),
            paint(&label, entry.phase),
            entry.seconds,
            format!("cycle {}", entry.cycle + 1).dimmed()
        ));
    }

    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "  {}: {}",
        "Cycles completed".dimmed(),
        plan.cycles_completed
    ));

    output
}

/// Format the built-in patterns as a list
pub fn format_patterns_pretty(patterns: &[BreathPattern]) -> String {
    if patterns.is_empty() {
        return "Patterns (0)\n  No patterns".to_string();
    }

    let mut output = format!("Patterns ({})\n", patterns.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for pattern in patterns {
        output.push_str(&format!(
            "{:<10} {:<12} {}  {}\n",
            pattern.id.bold(),
            pattern.label,
            pattern.durations.to_string().cyan(),
            format!("{:.1}/min", pattern.breaths_per_minute()).dimmed()
        ));
        output.push_str(&format!("           {}\n", pattern.description.dimmed()));
    }

    output
}

/// Format a session summary
pub fn format_summary_pretty(summary: &SessionSummary) -> String {
    let heading = if summary.completed {
        "Session complete".green().bold()
    } else {
        "Session ended".yellow().bold()
    };

    let total = summary.config.total_seconds;
    let progress = if total == 0 {
        1.0
    } else {
        f64::from(summary.practiced_seconds) / f64::from(total)
    };

    let mut output = format!("{heading}\n");
    output.push_str(&format!(
        "  {}: {}\n",
        "Pattern".dimmed(),
        summary.config.durations
    ));
    output.push_str(&format!(
        "  {}: {} of {}\n",
        "Practiced".dimmed(),
        format_duration(summary.practiced()),
        format_clock(total)
    ));
    output.push_str(&format!("  {}\n", render_progress_bar(progress, 30)));
    output.push_str(&format!(
        "  {}: {}\n",
        "Cycles".dimmed(),
        summary.cycles_completed
    ));
    output.push_str(&format!(
        "  {}: {} - {}",
        "Time".dimmed(),
        summary.started_at.format("%H:%M:%S"),
        summary.finished_at.format("%H:%M:%S")
    ));

    output
}
