//! Audio cues for the breathing phases.
//!
//! The [`CueDispatcher`] guarantees that at most one cue plays at a time and
//! that the previous cue is stopped before the next one starts. Players are
//! best effort: failures are logged and the exercise carries on silently.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use serde::Serialize;

use crate::error::BreatheError;
use crate::exercise::config::PhaseName;

/// Slowest playback rate a cue is stretched to.
pub const MIN_PLAYBACK_RATE: f64 = 0.25;
/// Fastest playback rate a cue is squeezed to.
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// A looped audio clip. Only inhale and exhale have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CueId {
    Inhale,
    Exhale,
}

impl CueId {
    /// All cues, in pool order.
    pub const ALL: [Self; 2] = [Self::Inhale, Self::Exhale];

    const fn index(self) -> usize {
        match self {
            Self::Inhale => 0,
            Self::Exhale => 1,
        }
    }

    /// Name used in logs and config.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Inhale => "inhale",
            Self::Exhale => "exhale",
        }
    }
}

/// Something that can play and stop cues.
#[cfg_attr(test, mockall::automock)]
pub trait AudioPlayer {
    /// Start a cue from the beginning.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::AudioUnavailable` if playback is refused.
    fn play(&mut self, cue: CueId, looped: bool, rate: f64) -> Result<(), BreatheError>;

    /// Stop a cue and rewind it.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::AudioUnavailable` if the player cannot stop it.
    fn stop(&mut self, cue: CueId) -> Result<(), BreatheError>;

    /// Housekeeping hook called from the frame loop.
    fn poll(&mut self) {}
}

impl<P: AudioPlayer + ?Sized> AudioPlayer for Box<P> {
    fn play(&mut self, cue: CueId, looped: bool, rate: f64) -> Result<(), BreatheError> {
        (**self).play(cue, looped, rate)
    }

    fn stop(&mut self, cue: CueId) -> Result<(), BreatheError> {
        (**self).stop(cue)
    }

    fn poll(&mut self) {
        (**self).poll();
    }
}

/// Player that never makes a sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&mut self, _cue: CueId, _looped: bool, _rate: f64) -> Result<(), BreatheError> {
        Ok(())
    }

    fn stop(&mut self, _cue: CueId) -> Result<(), BreatheError> {
        Ok(())
    }
}

/// One reusable handle per cue.
#[derive(Debug)]
struct CueSlot {
    file: PathBuf,
    child: Option<Child>,
    looped: bool,
    rate: f64,
}

impl CueSlot {
    fn kill(&mut self) -> Result<(), BreatheError> {
        self.looped = false;
        if let Some(mut child) = self.child.take() {
            // already exited is fine
            let _ = child.kill();
            child
                .wait()
                .map_err(|e| BreatheError::AudioUnavailable(format!("failed to reap player: {e}")))?;
        }
        Ok(())
    }

    /// Give up on a player whose status cannot be read, so it is not
    /// queried again on the next poll.
    fn abandon(&mut self, cue: CueId, error: &std::io::Error) {
        tracing::warn!(cue = cue.key(), %error, "failed to query audio player, dropping it");
        if let Err(e) = self.kill() {
            tracing::debug!(cue = cue.key(), error = %e, "abandoned player not reaped");
        }
    }
}

/// Plays cues by spawning an external player program.
///
/// Arguments may contain `{file}` and `{rate}` placeholders, e.g.
/// `afplay -q 1 -r {rate} {file}`. Looped cues are respawned from
/// [`AudioPlayer::poll`] whenever the player process exits.
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    slots: [CueSlot; 2],
}

impl CommandPlayer {
    /// Create a player for the given program and cue files.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        inhale: PathBuf,
        exhale: PathBuf,
    ) -> Self {
        let slot = |file| CueSlot {
            file,
            child: None,
            looped: false,
            rate: 1.0,
        };
        Self {
            program: program.into(),
            args,
            slots: [slot(inhale), slot(exhale)],
        }
    }

    /// Arguments with placeholders filled in.
    #[must_use]
    pub fn render_args(&self, file: &Path, rate: f64) -> Vec<String> {
        let file = file.display().to_string();
        let rate = format!("{rate:.3}");
        self.args
            .iter()
            .map(|a| a.replace("{file}", &file).replace("{rate}", &rate))
            .collect()
    }

    fn spawn(&self, cue: CueId, rate: f64) -> Result<Child, BreatheError> {
        let file = &self.slots[cue.index()].file;
        if !file.exists() {
            return Err(BreatheError::AudioUnavailable(format!(
                "{} cue not found at {}",
                cue.key(),
                file.display()
            )));
        }

        Command::new(&self.program)
            .args(self.render_args(file, rate))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BreatheError::AudioUnavailable(format!("failed to run {}: {e}", self.program)))
    }

    /// Check if a cue currently has a live player process.
    #[must_use]
    pub fn is_playing(&self, cue: CueId) -> bool {
        self.slots[cue.index()].child.is_some()
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&mut self, cue: CueId, looped: bool, rate: f64) -> Result<(), BreatheError> {
        self.slots[cue.index()].kill()?;
        let child = self.spawn(cue, rate)?;
        tracing::debug!(cue = cue.key(), pid = child.id(), rate, "cue started");

        let slot = &mut self.slots[cue.index()];
        slot.child = Some(child);
        slot.looped = looped;
        slot.rate = rate;
        Ok(())
    }

    fn stop(&mut self, cue: CueId) -> Result<(), BreatheError> {
        tracing::debug!(cue = cue.key(), "cue stopped");
        self.slots[cue.index()].kill()
    }

    fn poll(&mut self) {
        for cue in CueId::ALL {
            let slot = &mut self.slots[cue.index()];
            let Some(child) = slot.child.as_mut() else {
                continue;
            };

            match child.try_wait() {
                Ok(None) => {}
                Ok(Some(status)) => {
                    slot.child = None;
                    if !status.success() {
                        tracing::warn!(cue = cue.key(), %status, "audio player failed, not looping");
                        slot.looped = false;
                    }
                    if slot.looped {
                        let rate = slot.rate;
                        match self.spawn(cue, rate) {
                            Ok(child) => self.slots[cue.index()].child = Some(child),
                            Err(e) => {
                                tracing::warn!(cue = cue.key(), error = %e, "failed to loop cue");
                                self.slots[cue.index()].looped = false;
                            }
                        }
                    }
                }
                Err(e) => slot.abandon(cue, &e),
            }
        }
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            let _ = slot.kill();
        }
    }
}

/// Playback rate that stretches a cue's natural loop to the phase length.
#[must_use]
pub fn playback_rate(reference_seconds: f64, phase_seconds: f64) -> f64 {
    if phase_seconds <= 0.0 || reference_seconds <= 0.0 {
        return 1.0;
    }
    (reference_seconds / phase_seconds).clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Owns the player and the single active cue.
#[derive(Debug)]
pub struct CueDispatcher<A> {
    player: A,
    active: Option<CueId>,
    reference_seconds: f64,
}

impl<A: AudioPlayer> CueDispatcher<A> {
    /// Create a dispatcher. `reference_seconds` is the natural loop length
    /// of the cue recordings.
    pub const fn new(player: A, reference_seconds: f64) -> Self {
        Self {
            player,
            active: None,
            reference_seconds,
        }
    }

    /// Cue currently owned by the dispatcher.
    pub const fn active(&self) -> Option<CueId> {
        self.active
    }

    /// The underlying player.
    pub const fn player(&self) -> &A {
        &self.player
    }

    /// Stop whatever is playing, then start the cue for `phase`, if it has one.
    pub fn enter_phase(&mut self, phase: PhaseName, phase_seconds: f64) {
        self.stop_active();

        let Some(cue) = phase.cue() else {
            return;
        };

        let rate = playback_rate(self.reference_seconds, phase_seconds);
        match self.player.play(cue, true, rate) {
            Ok(()) => self.active = Some(cue),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(cue = cue.key(), error = %e, "cue unavailable, continuing silently");
            }
            Err(e) => tracing::error!(cue = cue.key(), error = %e, "cue playback failed"),
        }
    }

    /// Stop and release the active cue.
    pub fn stop_active(&mut self) {
        if let Some(cue) = self.active.take() {
            if let Err(e) = self.player.stop(cue) {
                tracing::warn!(cue = cue.key(), error = %e, "failed to stop cue");
            }
        }
    }

    /// Forward the frame-loop housekeeping call.
    pub fn poll(&mut self) {
        self.player.poll();
    }
}
