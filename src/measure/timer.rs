//! Timer contract and runtime strategy selection.

use super::approximate::ApproximateTimer;
use super::sample::Sample;
use super::schedstat::SchedstatTimer;

/// Measures one unit of work on the calling thread.
pub trait Timer {
    /// Short strategy name for logs and records.
    fn name(&self) -> &'static str;

    /// Run `work` to completion and report how its time was spent.
    fn measure<T, F>(&self, work: F) -> (T, Sample)
    where
        F: FnOnce() -> T;
}

/// The timing strategy in use, picked by [`TimerKind::probe`].
#[derive(Debug, Clone)]
pub enum TimerKind {
    Approximate(ApproximateTimer),
    Schedstat(SchedstatTimer),
}

impl TimerKind {
    /// Prefer scheduler-level timing, fall back to the wall/CPU approximation.
    pub fn probe() -> Self {
        match SchedstatTimer::probe() {
            Some(timer) => TimerKind::Schedstat(timer),
            None => TimerKind::Approximate(ApproximateTimer::new()),
        }
    }

    pub fn approximate() -> Self {
        TimerKind::Approximate(ApproximateTimer::new())
    }

    /// True when the timer reports stall time.
    pub fn is_precise(&self) -> bool {
        matches!(self, TimerKind::Schedstat(_))
    }
}

impl Default for TimerKind {
    fn default() -> Self {
        Self::probe()
    }
}

impl Timer for TimerKind {
    fn name(&self) -> &'static str {
        match self {
            TimerKind::Approximate(t) => t.name(),
            TimerKind::Schedstat(t) => t.name(),
        }
    }

    fn measure<T, F>(&self, work: F) -> (T, Sample)
    where
        F: FnOnce() -> T,
    {
        match self {
            TimerKind::Approximate(t) => t.measure(work),
            TimerKind::Schedstat(t) => t.measure(work),
        }
    }
}
