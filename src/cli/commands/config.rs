//! Configuration file commands.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::cli::commands::Context;
use crate::config::Config;
use crate::error::BreatheError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or written.
pub fn config(ctx: &Context, cmd: &ConfigCommands) -> Result<String, BreatheError> {
    match cmd {
        ConfigCommands::Show => show(ctx),
        ConfigCommands::Init { force } => init(ctx, *force),
        ConfigCommands::Path => Ok(match ctx.format {
            OutputFormat::Pretty => ctx.config_file.display().to_string(),
            OutputFormat::Json => to_json(&json!({
                "path": ctx.config_file,
                "exists": ctx.config_file.exists(),
            }))?,
        }),
    }
}

fn show(ctx: &Context) -> Result<String, BreatheError> {
    match ctx.format {
        OutputFormat::Pretty => {
            let yaml = serde_yaml::to_string(&ctx.config)?;
            Ok(format!(
                "{} {}\n{}",
                "#".dimmed(),
                ctx.config_file.display().to_string().dimmed(),
                yaml.trim_end()
            ))
        }
        OutputFormat::Json => to_json(&ctx.config),
    }
}

fn init(ctx: &Context, force: bool) -> Result<String, BreatheError> {
    let path = &ctx.config_file;
    if path.exists() && !force {
        return Err(BreatheError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    ctx.paths.ensure_dirs()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Config::default().save_to_path(path)?;
    tracing::info!(path = %path.display(), "wrote default config");

    Ok(match ctx.format {
        OutputFormat::Pretty => format!("{} {}", "Created".green(), path.display()),
        OutputFormat::Json => to_json(&json!({ "path": path, "created": true }))?,
    })
}
