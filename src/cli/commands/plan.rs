//! Headless commands: timeline preview and pattern listing.

use crate::cli::args::ExerciseArgs;
use crate::cli::commands::Context;
use crate::error::BreatheError;
use crate::exercise::{builtin_patterns, PhaseClock, Plan};
use crate::output::{format_patterns, format_plan};

/// Simulate an exercise and print every phase it would go through.
///
/// # Errors
///
/// Returns `BreatheError::InvalidConfig` if the exercise settings are rejected.
pub fn plan(ctx: &Context, args: &ExerciseArgs) -> Result<String, BreatheError> {
    let config = args.resolve(&ctx.config.exercise)?;
    let clock = PhaseClock::new(config)?;
    let plan = Plan::simulate(&clock);
    tracing::debug!(phases = plan.entries.len(), "simulated exercise");
    format_plan(&plan, ctx.format)
}

/// List the built-in patterns.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn patterns(ctx: &Context) -> Result<String, BreatheError> {
    format_patterns(builtin_patterns(), ctx.format)
}
