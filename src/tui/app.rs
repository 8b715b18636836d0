//! Terminal renderer for the exercise controller.

use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::error::BreatheError;
use crate::exercise::{ExerciseConfig, ExerciseState, Renderer, SessionStatus, Visuals};
use crate::tui::ui;

/// Smallest terminal the circle can be drawn in.
pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 10;

/// Everything the UI draws from.
#[derive(Debug, Clone)]
pub struct View {
    pub title: String,
    pub total_seconds: u32,
    pub status: SessionStatus,
    pub visuals: Option<Visuals>,
    pub total_remaining: u32,
    pub cycles_completed: u32,
}

impl View {
    fn new(config: &ExerciseConfig) -> Self {
        Self {
            title: format!("breathe {} at {}x", config.durations, config.speed),
            total_seconds: config.total_seconds,
            status: SessionStatus::Idle,
            visuals: None,
            total_remaining: config.total_seconds,
            cycles_completed: 0,
        }
    }

    /// Fraction of the session that has been counted down.
    #[must_use]
    pub fn session_progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        let done = self.total_seconds.saturating_sub(self.total_remaining);
        (f64::from(done) / f64::from(self.total_seconds)).clamp(0.0, 1.0)
    }
}

/// Draws the exercise into a ratatui terminal.
///
/// Drawing errors cannot be returned through [`Renderer::render`], so the
/// first one is kept until the event loop collects it with
/// [`take_error`](Self::take_error).
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    view: View,
    error: Option<BreatheError>,
}

impl<B: Backend> TuiRenderer<B> {
    /// Create a renderer for one exercise configuration.
    pub fn new(terminal: Terminal<B>, config: &ExerciseConfig) -> Self {
        Self {
            terminal,
            view: View::new(config),
            error: None,
        }
    }

    /// The current view model.
    pub const fn view(&self) -> &View {
        &self.view
    }

    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Take the first drawing error, if any.
    pub fn take_error(&mut self) -> Option<BreatheError> {
        self.error.take()
    }

    /// Draw the current view again, e.g. after a resize.
    pub fn redraw(&mut self) {
        let view = &self.view;
        if let Err(e) = self.terminal.draw(|frame| ui::render(frame, view)) {
            tracing::error!(error = %e, "failed to draw");
            self.error
                .get_or_insert_with(|| BreatheError::Terminal(format!("Failed to draw: {e}")));
        }
    }
}

impl<B: Backend> Renderer for TuiRenderer<B> {
    fn ensure_ready(&mut self) -> Result<(), BreatheError> {
        let size = self
            .terminal
            .size()
            .map_err(|e| BreatheError::RenderTargetMissing(format!("Cannot read terminal size: {e}")))?;

        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            return Err(BreatheError::RenderTargetMissing(format!(
                "terminal is {}x{}, need at least {MIN_WIDTH}x{MIN_HEIGHT}",
                size.width, size.height
            )));
        }
        Ok(())
    }

    fn render(&mut self, state: &ExerciseState) {
        self.view.visuals = Some(Visuals::from_state(state));
        self.view.total_remaining = state.total_remaining;
        self.view.cycles_completed = state.cycles_completed;
        self.redraw();
    }

    fn status_changed(&mut self, status: SessionStatus) {
        self.view.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{PhaseClock, PhaseDurations};
    use ratatui::backend::TestBackend;

    fn config() -> ExerciseConfig {
        ExerciseConfig::new(60, PhaseDurations::new(4, 2, 4, 2), 1.0).unwrap()
    }

    fn renderer(width: u16, height: u16) -> TuiRenderer<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TuiRenderer::new(terminal, &config())
    }

    fn screen(renderer: &TuiRenderer<TestBackend>) -> String {
        renderer
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_too_small_terminal_is_rejected() {
        assert!(matches!(
            renderer(10, 5).ensure_ready(),
            Err(BreatheError::RenderTargetMissing(_))
        ));
        assert!(renderer(80, 24).ensure_ready().is_ok());
    }

    #[test]
    fn test_render_draws_phase_and_time() {
        let mut r = renderer(80, 24);
        let state = PhaseClock::new(config()).unwrap().initialize();
        r.status_changed(SessionStatus::Running);
        r.render(&state);

        let text = screen(&r);
        assert!(text.contains("Inhale"));
        assert!(text.contains("01:00"));
        assert!(r.take_error().is_none());
        assert_eq!(r.view().total_remaining, 60);
    }

    #[test]
    fn test_status_is_shown() {
        let mut r = renderer(80, 24);
        let state = PhaseClock::new(config()).unwrap().initialize();
        r.status_changed(SessionStatus::Paused);
        r.render(&state);
        assert!(screen(&r).contains("Paused"));
    }

    #[test]
    fn test_session_progress() {
        let mut view = View::new(&config());
        assert!(view.session_progress().abs() < f64::EPSILON);
        view.total_remaining = 15;
        assert!((view.session_progress() - 0.75).abs() < 1e-9);
    }
}
