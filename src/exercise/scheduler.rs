//! Cooperative interval scheduler.
//!
//! Nothing runs on its own: the host loop asks for due events with
//! [`Scheduler::pop_due`] and dispatches them on its own thread. Every
//! interval is identified by a [`TimerId`] and can be cancelled.

use std::time::{Duration, Instant};

/// Shortest period an interval may have. Shorter ones are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// The two periodic sources driving an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Coarse one-second countdown tick.
    Tick,
    /// High-frequency animation frame.
    Frame,
}

impl LoopKind {
    /// Missed ticks are replayed so the countdown stays exact; missed
    /// frames are coalesced into one.
    const fn catches_up(self) -> bool {
        matches!(self, Self::Tick)
    }
}

/// Handle to a scheduled interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Interval {
    id: TimerId,
    kind: LoopKind,
    period: Duration,
    next_due: Instant,
}

/// An interval firing handed back to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub id: TimerId,
    pub kind: LoopKind,
    /// For ticks, the instant the firing was scheduled for, which may be
    /// before "now". Frames always report "now".
    pub at: Instant,
}

/// Set of cancellable intervals.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    intervals: Vec<Interval>,
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a repeating interval whose first firing is at `first_due`.
    pub fn schedule_interval(&mut self, kind: LoopKind, period: Duration, first_due: Instant) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.intervals.push(Interval {
            id,
            kind,
            period,
            next_due: first_due,
        });
        tracing::trace!(?id, ?kind, ?period, "scheduled interval");
        id
    }

    /// Cancel an interval. Returns false if it was not scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        before != self.intervals.len()
    }

    /// Cancel every interval.
    pub fn cancel_all(&mut self) {
        self.intervals.clear();
    }

    /// Number of live intervals of a kind.
    #[must_use]
    pub fn active(&self, kind: LoopKind) -> usize {
        self.intervals.iter().filter(|i| i.kind == kind).count()
    }

    /// Earliest pending firing, if anything is scheduled.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.intervals.iter().map(|i| i.next_due).min()
    }

    /// When a specific interval fires next.
    #[must_use]
    pub fn due_at(&self, id: TimerId) -> Option<Instant> {
        self.intervals.iter().find(|i| i.id == id).map(|i| i.next_due)
    }

    /// Take the earliest event due at or before `now` and reschedule it.
    ///
    /// Ties go to the interval scheduled first.
    pub fn pop_due(&mut self, now: Instant) -> Option<Due> {
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due <= now)
            .min_by_key(|i| (i.next_due, i.id))?;

        let mut at = interval.next_due;
        interval.next_due += interval.period;
        if !interval.kind.catches_up() {
            at = now;
            if interval.next_due <= now {
                interval.next_due = now + interval.period;
            }
        }
        Some(Due {
            id: interval.id,
            kind: interval.kind,
            at,
        })
    }
}
