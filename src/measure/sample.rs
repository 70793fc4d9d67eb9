//! Timing breakdown for one measured unit of work.

use std::time::Duration;

/// Clamp a ratio into `[0, 1]`. NaN maps to `0.0`.
pub fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Immutable record of one measurement.
///
/// `io` is the time the thread was not on a CPU: blocked on I/O, sleeping, or
/// waiting on a lock. `stall` is only known to the precise timer and is the time
/// the thread was runnable but not scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    wall: Duration,
    cpu: Duration,
    io: Duration,
    stall: Option<Duration>,
}

impl Sample {
    /// Build a sample from raw parts.
    pub fn new(wall: Duration, cpu: Duration, io: Duration, stall: Option<Duration>) -> Self {
        Self { wall, cpu, io, stall }
    }

    /// Wall/CPU only: I/O is whatever wall time the CPU clock did not account for.
    pub fn approximate(wall: Duration, cpu: Duration) -> Self {
        Self {
            wall,
            cpu,
            io: wall.saturating_sub(cpu),
            stall: None,
        }
    }

    /// Running/idle/stalled breakdown reported by a scheduler-level timer.
    pub fn precise(running: Duration, idle: Duration, stalled: Duration, total: Duration) -> Self {
        Self {
            wall: total,
            cpu: running,
            io: idle,
            stall: Some(stalled),
        }
    }

    pub fn wall(&self) -> Duration {
        self.wall
    }

    pub fn cpu(&self) -> Duration {
        self.cpu
    }

    pub fn io(&self) -> Duration {
        self.io
    }

    pub fn stall(&self) -> Option<Duration> {
        self.stall
    }

    /// Fraction of wall time spent off-CPU, clamped to `[0, 1]`.
    ///
    /// Zero wall time yields `0.0`.
    pub fn io_ratio(&self) -> f64 {
        if self.wall.is_zero() {
            return 0.0;
        }
        clamp_ratio(self.io.as_secs_f64() / self.wall.as_secs_f64())
    }

    /// Stall time in milliseconds, when the timer measured it.
    pub fn stall_ms(&self) -> Option<f64> {
        self.stall.map(|s| s.as_secs_f64() * 1000.0)
    }
}
