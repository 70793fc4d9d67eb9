//! Wall-clock vs thread-CPU-clock timing.
//!
//! Available everywhere. I/O time is inferred as `wall - cpu`, so lock waits and
//! run-queue delay are counted as I/O and no stall figure is produced.

use std::time::{Duration, Instant};

use super::sample::Sample;
use super::timer::Timer;

/// Timer that infers I/O time from the gap between wall and CPU time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTimer;

impl ApproximateTimer {
    pub fn new() -> Self {
        Self
    }
}

impl Timer for ApproximateTimer {
    fn name(&self) -> &'static str {
        "approximate"
    }

    fn measure<T, F>(&self, work: F) -> (T, Sample)
    where
        F: FnOnce() -> T,
    {
        let cpu0 = thread_cpu_time();
        let t0 = Instant::now();
        let result = work();
        let wall = t0.elapsed();
        let cpu1 = thread_cpu_time();

        let cpu = match (cpu0, cpu1) {
            (Some(a), Some(b)) => b.saturating_sub(a),
            _ => Duration::ZERO,
        };

        (result, Sample::approximate(wall, cpu))
    }
}

/// CPU time consumed by the calling thread so far.
///
/// Returns `None` where no per-thread CPU clock is available.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
))]
pub fn thread_cpu_time() -> Option<Duration> {
    // SAFETY: timespec is plain old data; all-zero is a valid value.
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
    if rc != 0 || ts.tv_sec < 0 || ts.tv_nsec < 0 {
        return None;
    }
    Some(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
pub fn thread_cpu_time() -> Option<Duration> {
    None
}
