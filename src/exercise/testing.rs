//! Recording doubles for controller tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::BreatheError;
use crate::exercise::audio::{AudioPlayer, CueId};
use crate::exercise::clock::ExerciseState;
use crate::exercise::controller::SessionStatus;
use crate::exercise::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCall {
    Play(CueId, f64),
    Stop(CueId),
}

/// Player that logs every call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    pub calls: Rc<RefCell<Vec<AudioCall>>>,
    pub fail: bool,
}

impl RecordingPlayer {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.borrow().clone()
    }

    /// Largest number of cues that were playing at the same time.
    pub fn max_concurrent(&self) -> usize {
        let mut playing: Vec<CueId> = Vec::new();
        let mut max = 0;
        for call in self.calls.borrow().iter() {
            match *call {
                AudioCall::Play(cue, _) => playing.push(cue),
                AudioCall::Stop(cue) => playing.retain(|c| *c != cue),
            }
            max = max.max(playing.len());
        }
        max
    }
}

impl AudioPlayer for RecordingPlayer {
    fn play(&mut self, cue: CueId, _looped: bool, rate: f64) -> Result<(), BreatheError> {
        if self.fail {
            return Err(BreatheError::AudioUnavailable("test".to_string()));
        }
        self.calls.borrow_mut().push(AudioCall::Play(cue, rate));
        Ok(())
    }

    fn stop(&mut self, cue: CueId) -> Result<(), BreatheError> {
        self.calls.borrow_mut().push(AudioCall::Stop(cue));
        Ok(())
    }
}

/// Renderer that keeps the last state it was given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub renders: usize,
    pub last: Option<ExerciseState>,
    pub statuses: Vec<SessionStatus>,
    pub missing: bool,
}

impl Renderer for RecordingRenderer {
    fn ensure_ready(&mut self) -> Result<(), BreatheError> {
        if self.missing {
            return Err(BreatheError::RenderTargetMissing("test view".to_string()));
        }
        Ok(())
    }

    fn render(&mut self, state: &ExerciseState) {
        self.renders += 1;
        self.last = Some(*state);
    }

    fn status_changed(&mut self, status: SessionStatus) {
        self.statuses.push(status);
    }
}
