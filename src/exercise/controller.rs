//! Exercise controller.
//!
//! Drives a [`PhaseClock`] from two cancellable periodic sources, renders
//! the resulting state and keeps the audio cue in step with the phase:
//!
//! - the one-second tick is the only path that changes counters or the
//!   current phase
//! - the frame loop only derives animation values from the time spent in
//!   the phase, polls the audio player and re-renders
//!
//! Both loops are cancelled before anything new is scheduled, so there is
//! never more than one of each.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::BreatheError;
use crate::exercise::audio::{AudioPlayer, CueDispatcher, CueId};
use crate::exercise::clock::{ExerciseState, PhaseClock, TickOutcome};
use crate::exercise::config::ExerciseConfig;
use crate::exercise::render::Renderer;
use crate::exercise::scheduler::{LoopKind, Scheduler, TimerId};
use crate::exercise::time::TimeSource;

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Highest accepted animation frame rate.
pub const MAX_FRAME_RATE: u32 = 1000;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing is running.
    Idle,
    /// Loops are scheduled and the clock is counting down.
    Running,
    /// Loops are cancelled; the session can be resumed.
    Paused,
    /// Total time ran out.
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Tunables for the controller's loops and audio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Period of the animation loop.
    pub frame_interval: Duration,
    /// Natural loop length of the cue recordings, in seconds.
    pub cue_reference_seconds: f64,
}

impl ControllerSettings {
    /// Settings for a given frame rate, clamped to `1..=MAX_FRAME_RATE`.
    #[must_use]
    pub fn with_frame_rate(frames_per_second: u32, cue_reference_seconds: f64) -> Self {
        Self {
            frame_interval: Duration::from_secs(1) / frames_per_second.clamp(1, MAX_FRAME_RATE),
            cue_reference_seconds,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::with_frame_rate(30, 4.0)
    }
}

type Callback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy)]
struct Pause {
    at: Instant,
    /// Time that was left until the next tick.
    tick_in: Duration,
}

#[derive(Debug)]
struct Session {
    clock: PhaseClock,
    state: ExerciseState,
    phase_started: Instant,
    pause: Option<Pause>,
}

/// Owns one exercise session and everything it schedules.
pub struct ExerciseController<R, A, T> {
    renderer: R,
    cues: CueDispatcher<A>,
    time: T,
    settings: ControllerSettings,
    scheduler: Scheduler,
    tick_loop: Option<TimerId>,
    frame_loop: Option<TimerId>,
    status: SessionStatus,
    session: Option<Session>,
    last_config: Option<ExerciseConfig>,
    on_complete: Option<Callback>,
    on_exit: Option<Callback>,
}

impl<R: Renderer, A: AudioPlayer, T: TimeSource> ExerciseController<R, A, T> {
    /// Create an idle controller.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::RenderTargetMissing` if the renderer cannot draw.
    pub fn new(
        mut renderer: R,
        player: A,
        time: T,
        settings: ControllerSettings,
    ) -> Result<Self, BreatheError> {
        renderer.ensure_ready()?;

        Ok(Self {
            renderer,
            cues: CueDispatcher::new(player, settings.cue_reference_seconds),
            time,
            settings,
            scheduler: Scheduler::new(),
            tick_loop: None,
            frame_loop: None,
            status: SessionStatus::Idle,
            session: None,
            last_config: None,
            on_complete: None,
            on_exit: None,
        })
    }

    /// Called once when a session's total time runs out.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Called once when a session is stopped.
    pub fn on_exit(&mut self, callback: impl FnMut() + 'static) {
        self.on_exit = Some(Box::new(callback));
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// State of the current session, if any.
    pub fn state(&self) -> Option<&ExerciseState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// Configuration of the most recent session.
    pub const fn config(&self) -> Option<&ExerciseConfig> {
        self.last_config.as_ref()
    }

    /// Number of live loops of a kind.
    pub fn active_loops(&self, kind: LoopKind) -> usize {
        self.scheduler.active(kind)
    }

    /// When the next scheduled event is due.
    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Cue currently playing.
    pub const fn active_cue(&self) -> Option<CueId> {
        self.cues.active()
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub const fn player(&self) -> &A {
        self.cues.player()
    }

    /// Validate `config` and start a fresh session.
    ///
    /// Anything left over from a previous session is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidConfig` without touching the current
    /// session if the configuration is rejected.
    pub fn start(&mut self, config: ExerciseConfig) -> Result<(), BreatheError> {
        let clock = PhaseClock::new(config)?;

        self.cancel_all_work();

        let now = self.time.now();
        let state = clock.initialize();
        let phase_seconds = clock.phase_length(state.phase);
        let phase = state.phase;

        self.session = Some(Session {
            clock,
            state,
            phase_started: now,
            pause: None,
        });
        self.last_config = Some(config);
        self.schedule_loops(now, TICK_PERIOD);
        self.cues.enter_phase(phase, phase_seconds);
        self.set_status(SessionStatus::Running);
        self.render_now();

        tracing::info!(
            total_seconds = config.total_seconds,
            durations = %config.durations,
            speed = config.speed,
            "exercise started"
        );
        Ok(())
    }

    /// Start the most recent configuration over from the beginning.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::NoSession` if nothing was ever started.
    pub fn restart(&mut self) -> Result<(), BreatheError> {
        let config = self.last_config.ok_or(BreatheError::NoSession)?;
        tracing::debug!("restarting exercise");
        self.start(config)
    }

    /// Pause a running session. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }

        let now = self.time.now();
        let tick_in = self
            .tick_loop
            .and_then(|id| self.scheduler.due_at(id))
            .map_or(TICK_PERIOD, |due| due.saturating_duration_since(now));

        self.cancel_all_work();
        if let Some(session) = self.session.as_mut() {
            session.pause = Some(Pause { at: now, tick_in });
        }
        self.set_status(SessionStatus::Paused);
        self.render_now();
        tracing::debug!(?tick_in, "exercise paused");
        true
    }

    /// Resume a paused session. Returns false if it was not paused.
    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        let now = self.time.now();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(pause) = session.pause.take() else {
            return false;
        };

        session.phase_started += now.saturating_duration_since(pause.at);
        let phase = session.state.phase;
        let phase_seconds = session.clock.phase_length(phase);

        self.schedule_loops(now, pause.tick_in);
        self.cues.enter_phase(phase, phase_seconds);
        self.set_status(SessionStatus::Running);
        self.render_now();
        tracing::debug!("exercise resumed");
        true
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::Idle | SessionStatus::Completed => false,
        }
    }

    /// Cancel everything, release audio and go idle.
    ///
    /// The exit callback fires once; stopping an idle controller does nothing.
    pub fn stop(&mut self) {
        self.cancel_all_work();
        self.session = None;

        if self.status == SessionStatus::Idle {
            return;
        }
        self.set_status(SessionStatus::Idle);
        tracing::info!("exercise stopped");
        if let Some(callback) = self.on_exit.as_mut() {
            callback();
        }
    }

    /// Alias for [`stop`](Self::stop).
    pub fn exit(&mut self) {
        self.stop();
    }

    /// Run every event that is due, in time order.
    ///
    /// Returns the number of events dispatched.
    pub fn pump(&mut self) -> usize {
        let now = self.time.now();
        let mut dispatched = 0;

        while let Some(due) = self.scheduler.pop_due(now) {
            dispatched += 1;
            match due.kind {
                LoopKind::Tick if Some(due.id) == self.tick_loop => self.on_tick(due.at),
                LoopKind::Frame if Some(due.id) == self.frame_loop => self.on_frame(due.at),
                _ => {
                    tracing::warn!(id = ?due.id, kind = ?due.kind, "dropping stale timer");
                    self.scheduler.cancel(due.id);
                }
            }
        }
        dispatched
    }

    fn on_tick(&mut self, at: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.clock.tick_seconds(&mut session.state) {
            TickOutcome::Continue => {}
            TickOutcome::PhaseElapsed => {
                session.clock.advance_phase(&mut session.state);
                session.phase_started = at;
                let phase = session.state.phase;
                let phase_seconds = session.clock.phase_length(phase);
                tracing::debug!(%phase, phase_seconds, "phase changed");
                self.cues.enter_phase(phase, phase_seconds);
            }
            TickOutcome::Completed => {
                self.complete();
                return;
            }
        }
        self.render_now();
    }

    fn on_frame(&mut self, at: Instant) {
        if let Some(session) = self.session.as_mut() {
            let elapsed = at.saturating_duration_since(session.phase_started).as_secs_f64();
            session.clock.apply_progress(&mut session.state, elapsed);
        }
        self.cues.poll();
        self.render_now();
    }

    fn complete(&mut self) {
        self.cancel_all_work();
        self.set_status(SessionStatus::Completed);
        self.render_now();

        if let Some(session) = self.session.as_ref() {
            tracing::info!(cycles = session.state.cycles_completed, "exercise completed");
        }
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn schedule_loops(&mut self, now: Instant, first_tick_in: Duration) {
        self.cancel_loops();
        self.tick_loop = Some(
            self.scheduler
                .schedule_interval(LoopKind::Tick, TICK_PERIOD, now + first_tick_in),
        );
        self.frame_loop = Some(self.scheduler.schedule_interval(
            LoopKind::Frame,
            self.settings.frame_interval,
            now,
        ));
    }

    fn cancel_loops(&mut self) {
        for id in [self.tick_loop.take(), self.frame_loop.take()].into_iter().flatten() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_all_work(&mut self) {
        self.cancel_loops();
        self.scheduler.cancel_all();
        self.cues.stop_active();
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status != status {
            self.status = status;
            self.renderer.status_changed(status);
        }
    }

    fn render_now(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.renderer.render(&session.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::exercise::config::{PhaseDurations, PhaseName};
    use crate::exercise::testing::{AudioCall, RecordingPlayer, RecordingRenderer};
    use crate::exercise::time::ManualTimeSource;

    type TestController = ExerciseController<RecordingRenderer, RecordingPlayer, ManualTimeSource>;

    const FRAME: Duration = Duration::from_millis(250);

    fn settings() -> ControllerSettings {
        ControllerSettings {
            frame_interval: FRAME,
            cue_reference_seconds: 4.0,
        }
    }

    fn config(total: u32, speed: f64) -> ExerciseConfig {
        ExerciseConfig::new(total, PhaseDurations::new(4, 2, 4, 2), speed).unwrap()
    }

    fn controller() -> (TestController, ManualTimeSource, RecordingPlayer) {
        let clock = ManualTimeSource::new();
        let player = RecordingPlayer::default();
        let ctrl = ExerciseController::new(
            RecordingRenderer::default(),
            player.clone(),
            clock.clone(),
            settings(),
        )
        .unwrap();
        (ctrl, clock, player)
    }

    /// Advance the fake clock frame by frame, pumping as a host loop would.
    fn run_for(ctrl: &mut TestController, clock: &ManualTimeSource, duration: Duration) {
        let steps = duration.as_millis() / FRAME.as_millis();
        for _ in 0..steps {
            clock.advance(FRAME);
            ctrl.pump();
        }
    }

    fn state(ctrl: &TestController) -> ExerciseState {
        *ctrl.state().unwrap()
    }

    #[test]
    fn test_start_schedules_one_of_each_loop() {
        let (mut ctrl, _clock, player) = controller();
        ctrl.start(config(60, 1.0)).unwrap();

        assert_eq!(ctrl.status(), SessionStatus::Running);
        assert_eq!(ctrl.active_loops(LoopKind::Tick), 1);
        assert_eq!(ctrl.active_loops(LoopKind::Frame), 1);
        assert_eq!(player.calls(), vec![AudioCall::Play(CueId::Inhale, 1.0)]);
        assert_eq!(ctrl.renderer().renders, 1);
        assert_eq!(ctrl.renderer().last.map(|s| s.total_remaining), Some(60));
        assert_eq!(ctrl.config(), Some(&config(60, 1.0)));
        assert_eq!(ctrl.renderer().statuses, vec![SessionStatus::Running]);
    }

    #[test]
    fn test_invalid_config_never_starts() {
        let (mut ctrl, _clock, player) = controller();
        let bad = ExerciseConfig {
            total_seconds: 60,
            durations: PhaseDurations::default(),
            speed: 0.0,
        };

        assert!(matches!(ctrl.start(bad), Err(BreatheError::InvalidConfig(_))));
        assert_eq!(ctrl.status(), SessionStatus::Idle);
        assert_eq!(ctrl.active_loops(LoopKind::Tick), 0);
        assert!(player.calls().is_empty());
    }

    #[test]
    fn test_missing_render_target_is_fatal() {
        let renderer = RecordingRenderer {
            missing: true,
            ..RecordingRenderer::default()
        };
        let result = ExerciseController::new(
            renderer,
            RecordingPlayer::default(),
            ManualTimeSource::new(),
            settings(),
        );
        assert!(matches!(result, Err(BreatheError::RenderTargetMissing(_))));
    }

    #[test]
    fn test_worked_example() {
        let (mut ctrl, clock, player) = controller();
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        ctrl.on_complete(move || counter.set(counter.get() + 1));
        ctrl.start(config(10, 1.0)).unwrap();

        run_for(&mut ctrl, &clock, Duration::from_secs(4));
        let s = state(&ctrl);
        assert_eq!(s.phase, PhaseName::HoldInhale);
        assert!((s.phase_remaining - 2.0).abs() < f64::EPSILON);
        assert_eq!(s.total_remaining, 6);

        run_for(&mut ctrl, &clock, Duration::from_secs(2));
        let s = state(&ctrl);
        assert_eq!(s.phase, PhaseName::Exhale);
        assert!((s.phase_remaining - 4.0).abs() < f64::EPSILON);
        assert_eq!(s.total_remaining, 4);

        run_for(&mut ctrl, &clock, Duration::from_secs(4));
        assert_eq!(state(&ctrl).total_remaining, 0);
        assert_eq!(ctrl.status(), SessionStatus::Completed);
        assert_eq!(completed.get(), 1);

        // nothing left to fire
        run_for(&mut ctrl, &clock, Duration::from_secs(5));
        assert_eq!(completed.get(), 1);
        assert_eq!(ctrl.next_due(), None);
        assert_eq!(ctrl.active_cue(), None);
        assert_eq!(player.max_concurrent(), 1);
    }

    #[test]
    fn test_speed_two_halves_phases() {
        let (mut ctrl, clock, _player) = controller();
        ctrl.start(config(60, 2.0)).unwrap();

        run_for(&mut ctrl, &clock, Duration::from_secs(1));
        assert_eq!(state(&ctrl).phase, PhaseName::Inhale);
        run_for(&mut ctrl, &clock, Duration::from_secs(1));
        assert_eq!(state(&ctrl).phase, PhaseName::HoldInhale);
        assert!((state(&ctrl).phase_remaining - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cue_transitions_stop_before_play() {
        let (mut ctrl, clock, player) = controller();
        ctrl.start(config(60, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_secs(12));

        assert_eq!(
            player.calls(),
            vec![
                AudioCall::Play(CueId::Inhale, 1.0),
                AudioCall::Stop(CueId::Inhale),
                AudioCall::Play(CueId::Exhale, 1.0),
                AudioCall::Stop(CueId::Exhale),
                AudioCall::Play(CueId::Inhale, 1.0),
            ]
        );
        assert_eq!(player.max_concurrent(), 1);
        assert_eq!(state(&ctrl).cycles_completed, 1);
    }

    #[test]
    fn test_frames_animate_without_advancing_phase() {
        let (mut ctrl, clock, _player) = controller();
        ctrl.start(config(60, 1.0)).unwrap();

        clock.advance(Duration::from_millis(3750));
        ctrl.pump();
        // a late pump replays the ticks but only one coalesced frame
        let s = state(&ctrl);
        assert_eq!(s.phase, PhaseName::Inhale);
        assert_eq!(s.total_remaining, 57);
        assert!((s.progress - 3.75 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_restart_resets_and_never_stacks_loops() {
        let (mut ctrl, clock, player) = controller();
        ctrl.start(config(30, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_secs(7));
        assert_eq!(state(&ctrl).phase, PhaseName::Exhale);

        for _ in 0..5 {
            ctrl.restart().unwrap();
        }

        let s = state(&ctrl);
        assert_eq!(s.total_remaining, 30);
        assert_eq!(s.phase, PhaseName::Inhale);
        assert_eq!(ctrl.active_loops(LoopKind::Tick), 1);
        assert_eq!(ctrl.active_loops(LoopKind::Frame), 1);
        assert_eq!(player.max_concurrent(), 1);
        assert_eq!(ctrl.active_cue(), Some(CueId::Inhale));

        // exactly one tick per second after the restarts
        run_for(&mut ctrl, &clock, Duration::from_secs(1));
        assert_eq!(state(&ctrl).total_remaining, 29);
    }

    #[test]
    fn test_restart_without_session() {
        let (mut ctrl, _clock, _player) = controller();
        assert!(matches!(ctrl.restart(), Err(BreatheError::NoSession)));
    }

    #[test]
    fn test_restart_after_completion() {
        let (mut ctrl, clock, _player) = controller();
        ctrl.start(config(2, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_secs(2));
        assert_eq!(ctrl.status(), SessionStatus::Completed);

        ctrl.restart().unwrap();
        assert_eq!(ctrl.status(), SessionStatus::Running);
        assert_eq!(state(&ctrl).total_remaining, 2);
    }

    #[test]
    fn test_stop_fires_exit_once() {
        let (mut ctrl, clock, player) = controller();
        let exits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&exits);
        ctrl.on_exit(move || counter.set(counter.get() + 1));

        ctrl.start(config(60, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_secs(1));
        ctrl.stop();
        ctrl.exit();

        assert_eq!(exits.get(), 1);
        assert_eq!(ctrl.status(), SessionStatus::Idle);
        assert!(ctrl.state().is_none());
        assert_eq!(ctrl.next_due(), None);
        assert_eq!(ctrl.active_cue(), None);
        assert_eq!(player.calls().last(), Some(&AudioCall::Stop(CueId::Inhale)));
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut ctrl, clock, _player) = controller();
        ctrl.start(config(60, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_millis(1500));
        assert_eq!(state(&ctrl).total_remaining, 59);

        assert!(ctrl.pause());
        assert!(!ctrl.pause());
        assert_eq!(ctrl.active_cue(), None);
        assert_eq!(ctrl.next_due(), None);

        clock.advance(Duration::from_secs(10));
        ctrl.pump();
        assert_eq!(state(&ctrl).total_remaining, 59);

        assert!(ctrl.toggle_pause());
        assert_eq!(ctrl.status(), SessionStatus::Running);
        assert_eq!(ctrl.active_cue(), Some(CueId::Inhale));

        // the half second left before the pause is honoured
        run_for(&mut ctrl, &clock, Duration::from_millis(500));
        let s = state(&ctrl);
        assert_eq!(s.total_remaining, 58);
        assert!((s.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_audio_failure_does_not_stop_exercise() {
        let clock = ManualTimeSource::new();
        let player = RecordingPlayer {
            fail: true,
            ..RecordingPlayer::default()
        };
        let mut ctrl =
            ExerciseController::new(RecordingRenderer::default(), player, clock.clone(), settings())
                .unwrap();
        ctrl.start(config(60, 1.0)).unwrap();
        run_for(&mut ctrl, &clock, Duration::from_secs(8));

        assert_eq!(ctrl.status(), SessionStatus::Running);
        assert_eq!(state(&ctrl).phase, PhaseName::Exhale);
        assert_eq!(ctrl.active_cue(), None);
        assert!(ctrl.player().calls().is_empty());
    }

    #[test]
    fn test_frame_rate_is_clamped() {
        let fast = ControllerSettings::with_frame_rate(2_000_000_000, 4.0);
        assert_eq!(fast.frame_interval, Duration::from_millis(1));
        let zero = ControllerSettings::with_frame_rate(0, 4.0);
        assert_eq!(zero.frame_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_huge_frame_rate_pump_returns() {
        let clock = ManualTimeSource::new();
        let mut ctrl = ExerciseController::new(
            RecordingRenderer::default(),
            RecordingPlayer::default(),
            clock.clone(),
            ControllerSettings::with_frame_rate(2_000_000_000, 4.0),
        )
        .unwrap();
        ctrl.start(config(60, 1.0)).unwrap();

        clock.advance(Duration::from_millis(10));
        ctrl.pump();

        assert_eq!(ctrl.status(), SessionStatus::Running);
        assert_eq!(state(&ctrl).total_remaining, 60);
    }

    #[test]
    fn test_independent_controllers() {
        let (mut a, clock_a, _) = controller();
        let (mut b, _clock_b, _) = controller();
        a.start(config(60, 1.0)).unwrap();
        b.start(config(30, 1.0)).unwrap();

        run_for(&mut a, &clock_a, Duration::from_secs(3));
        assert_eq!(state(&a).total_remaining, 57);
        assert_eq!(state(&b).total_remaining, 30);
    }
}
