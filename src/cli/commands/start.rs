//! Run a guided exercise in the terminal.

use std::path::PathBuf;

use crate::cli::args::StartArgs;
use crate::cli::commands::Context;
use crate::config::{AudioConfig, Paths};
use crate::error::BreatheError;
use crate::exercise::{AudioPlayer, CommandPlayer, ControllerSettings, SilentPlayer};
use crate::output::format_summary;
use crate::tui;

/// Execute the start command.
///
/// # Errors
///
/// Returns an error if the settings are rejected or the terminal cannot be
/// used.
pub fn start(ctx: &Context, args: &StartArgs) -> Result<String, BreatheError> {
    let exercise = args.exercise.resolve(&ctx.config.exercise)?;
    let audio = &ctx.config.audio;
    let settings = ControllerSettings::with_frame_rate(
        args.fps.unwrap_or(ctx.config.display.frame_rate),
        audio.reference_seconds,
    );

    let player: Box<dyn AudioPlayer> = match cue_files(audio, &ctx.paths, args.no_audio) {
        Some((inhale, exhale)) => Box::new(CommandPlayer::new(
            audio.command.clone(),
            audio.args.clone(),
            inhale,
            exhale,
        )),
        None => Box::new(SilentPlayer),
    };

    let summary = tui::run(exercise, player, settings)?;
    tracing::info!(
        practiced_seconds = summary.practiced_seconds,
        cycles = summary.cycles_completed,
        completed = summary.completed,
        "session finished"
    );
    format_summary(&summary, ctx.format)
}

/// Cue files to play, or None if the session should be silent.
fn cue_files(audio: &AudioConfig, paths: &Paths, no_audio: bool) -> Option<(PathBuf, PathBuf)> {
    if no_audio || !audio.enabled {
        tracing::debug!("audio disabled");
        return None;
    }

    let (inhale, exhale) = audio.cue_files(paths);
    if let Some(missing) = [&inhale, &exhale].into_iter().find(|f| !f.exists()) {
        tracing::warn!(file = %missing.display(), "cue file not found, running without audio");
        return None;
    }
    Some((inhale, exhale))
}
