//! Parsing and formatting of session lengths.

use chrono::Duration;

/// Format whole seconds as MM:SS.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let plural = |n: i64| if n == 1 { "" } else { "s" };
    let total_seconds = d.num_seconds();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    match (minutes, seconds) {
        (0, s) => format!("{s} second{}", plural(s)),
        (m, 0) => format!("{m} minute{}", plural(m)),
        (m, s) => format!("{m} minute{}, {s} second{}", plural(m), plural(s)),
    }
}

/// Parse a session length like "5m", "1h30m", "90s" or a bare number of
/// minutes.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return if minutes > 0 {
            Duration::try_minutes(minutes)
        } else {
            None
        };
    }

    let mut total_seconds: i64 = 0;
    let mut current = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }
        if current.is_empty() {
            return None;
        }
        let n: i64 = current.parse().ok()?;
        current.clear();
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total_seconds = total_seconds.checked_add(n.checked_mul(unit)?)?;
    }

    // trailing number without a unit counts as seconds after a larger unit
    if !current.is_empty() {
        total_seconds = total_seconds.checked_add(current.parse::<i64>().ok()?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Parse a session length into whole seconds, as used by `ExerciseConfig`.
#[must_use]
pub fn parse_seconds(s: &str) -> Option<u32> {
    parse_duration(s).and_then(|d| u32::try_from(d.num_seconds()).ok())
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
