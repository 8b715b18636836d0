//! Terminal User Interface (TUI) for breathe.
//!
//! Full-screen view of a running exercise: the breathing circle, phase,
//! timers and session progress. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{TuiRenderer, View, MIN_HEIGHT, MIN_WIDTH};
pub use event::Action;

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::BreatheError;
use crate::exercise::{
    AudioPlayer, ControllerSettings, ExerciseConfig, ExerciseController, ExerciseState,
    SessionStatus, SessionSummary, SystemTimeSource, TimeSource,
};

/// Longest wait for input before the loop checks the timers again.
const MAX_WAIT: Duration = Duration::from_millis(100);

/// Run an exercise in the terminal until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn into, or if
/// the configuration is rejected.
pub fn run<A: AudioPlayer>(
    config: ExerciseConfig,
    player: A,
    settings: ControllerSettings,
) -> Result<SessionSummary, BreatheError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| BreatheError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
        restore();
        return Err(BreatheError::Terminal(format!("Failed to setup terminal: {e}")));
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|e| BreatheError::Terminal(format!("Failed to create terminal: {e}")))
        .and_then(|terminal| {
            let renderer = TuiRenderer::new(terminal, &config);
            let mut session = Session::start(renderer, player, SystemTimeSource, settings, config)?;
            run_loop(&mut session)?;
            Ok(session.summary())
        });

    // Restore terminal
    restore();

    result
}

fn restore() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen, Show).ok();
}

/// Run the main application loop.
fn run_loop<B: Backend, A: AudioPlayer, T: TimeSource>(
    session: &mut Session<B, A, T>,
) -> Result<(), BreatheError> {
    let mut action = None;
    while session.step(action)? {
        action = event::next_action(wait_for(session.next_due(), Instant::now()))?;
    }
    Ok(())
}

/// How long to wait for input before the next timer is due.
fn wait_for(next_due: Option<Instant>, now: Instant) -> Duration {
    next_due.map_or(MAX_WAIT, |due| {
        due.saturating_duration_since(now).min(MAX_WAIT)
    })
}

/// A running exercise bound to the terminal renderer.
struct Session<B: Backend, A, T> {
    controller: ExerciseController<TuiRenderer<B>, A, T>,
    config: ExerciseConfig,
    started_at: DateTime<Local>,
    completed_at: Rc<Cell<Option<DateTime<Local>>>>,
    closed: Rc<Cell<bool>>,
    last_state: Option<ExerciseState>,
    last_status: SessionStatus,
}

impl<B: Backend, A: AudioPlayer, T: TimeSource> Session<B, A, T> {
    fn start(
        renderer: TuiRenderer<B>,
        player: A,
        time: T,
        settings: ControllerSettings,
        config: ExerciseConfig,
    ) -> Result<Self, BreatheError> {
        let mut controller = ExerciseController::new(renderer, player, time, settings)?;

        let closed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&closed);
        controller.on_exit(move || flag.set(true));

        let completed_at = Rc::new(Cell::new(None));
        let stamp = Rc::clone(&completed_at);
        controller.on_complete(move || stamp.set(Some(Local::now())));

        controller.start(config)?;

        let mut session = Self {
            controller,
            config,
            started_at: Local::now(),
            completed_at,
            closed,
            last_state: None,
            last_status: SessionStatus::Idle,
        };
        session.remember();
        Ok(session)
    }

    /// Apply an action, then run whatever timers are due.
    ///
    /// Returns false once the session has been closed.
    fn step(&mut self, action: Option<Action>) -> Result<bool, BreatheError> {
        match action {
            Some(Action::Quit) => {
                self.remember();
                self.controller.exit();
                return Ok(false);
            }
            Some(Action::TogglePause) => {
                self.controller.toggle_pause();
            }
            Some(Action::Restart) => {
                self.controller.restart()?;
                self.started_at = Local::now();
                self.completed_at.set(None);
            }
            Some(Action::Redraw) => self.controller.renderer_mut().redraw(),
            None => {}
        }

        self.controller.pump();
        if let Some(err) = self.controller.renderer_mut().take_error() {
            self.controller.exit();
            return Err(err);
        }
        self.remember();
        Ok(!self.closed.get())
    }

    fn remember(&mut self) {
        if let Some(state) = self.controller.state() {
            self.last_state = Some(*state);
        }
        self.last_status = self.controller.status();
    }

    fn next_due(&self) -> Option<Instant> {
        self.controller.next_due()
    }

    fn summary(&self) -> SessionSummary {
        let finished_at = self.completed_at.get().unwrap_or_else(Local::now);
        SessionSummary::new(
            self.config,
            self.started_at,
            finished_at,
            self.last_state.as_ref(),
            self.last_status,
        )
    }
}
