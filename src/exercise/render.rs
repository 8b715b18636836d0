//! Rendering interface and the view model derived from exercise state.

use serde::Serialize;

use crate::error::BreatheError;
use crate::exercise::clock::ExerciseState;
use crate::exercise::config::PhaseName;
use crate::exercise::controller::SessionStatus;
use crate::exercise::duration::format_clock;

/// Smallest circle, relative to the largest.
pub const MIN_CIRCLE: f64 = 1.0 / 3.0;
/// How far the hold ring grows past the circle, relative to the largest circle.
pub const HOLD_RING_GROWTH: f64 = 0.2;

/// View the controller draws into.
///
/// `render` may be called at frame rate and redundantly; it must only
/// reflect the state it is given.
pub trait Renderer {
    /// Check that the view can be drawn into.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::RenderTargetMissing` if it cannot.
    fn ensure_ready(&mut self) -> Result<(), BreatheError> {
        Ok(())
    }

    /// Draw the state.
    fn render(&mut self, state: &ExerciseState);

    /// The session moved between idle, running, paused and completed.
    fn status_changed(&mut self, _status: SessionStatus) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn ensure_ready(&mut self) -> Result<(), BreatheError> {
        (**self).ensure_ready()
    }

    fn render(&mut self, state: &ExerciseState) {
        (**self).render(state);
    }

    fn status_changed(&mut self, status: SessionStatus) {
        (**self).status_changed(status);
    }
}

/// Renderer that draws nothing. Used for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &ExerciseState) {}
}

/// Colour associated with a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseColor {
    Green,
    Blue,
    Red,
}

impl PhaseColor {
    /// Colour for a phase: green in, red out, blue while holding.
    #[must_use]
    pub const fn for_phase(phase: PhaseName) -> Self {
        match phase {
            PhaseName::Inhale => Self::Green,
            PhaseName::Exhale => Self::Red,
            PhaseName::HoldInhale | PhaseName::HoldExhale => Self::Blue,
        }
    }
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visuals {
    /// Circle size as a fraction of the largest circle.
    pub circle: f64,
    /// Hold ring size as a fraction of the largest circle, when visible.
    pub ring: Option<f64>,
    /// Hold ring opacity in [0, 1].
    pub ring_opacity: f64,
    pub color: PhaseColor,
    /// Text drawn inside the circle should be light.
    pub light_text: bool,
    pub phase_label: &'static str,
    /// Whole seconds left in the phase, rounded up.
    pub phase_timer: u32,
    /// Session time left as MM:SS.
    pub total_text: String,
}

impl Visuals {
    /// Map a state to sizes, colours and labels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_state(state: &ExerciseState) -> Self {
        let circle = MIN_CIRCLE + state.progress * (1.0 - MIN_CIRCLE);
        let ring = state
            .phase
            .is_hold()
            .then(|| circle + state.hold_pulse * HOLD_RING_GROWTH);

        Self {
            circle,
            ring,
            ring_opacity: if ring.is_some() {
                state.hold_pulse.clamp(0.0, 1.0)
            } else {
                0.0
            },
            color: PhaseColor::for_phase(state.phase),
            light_text: matches!(state.phase, PhaseName::Inhale | PhaseName::HoldInhale),
            phase_label: state.phase.label(),
            phase_timer: state.phase_remaining.max(0.0).ceil() as u32,
            total_text: format_clock(state.total_remaining),
        }
    }
}
