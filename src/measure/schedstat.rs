//! Scheduler-level timing from `/proc/thread-self/schedstat`.
//!
//! The file holds three fields for the calling thread: nanoseconds spent
//! running on a CPU, nanoseconds spent runnable on a run queue, and the number
//! of timeslices. The second field is the stall: the thread wanted a CPU and
//! did not get one.
//!
//! The run counter is only brought up to date at ticks and context switches, so
//! it misses the timeslice in progress. Running time comes from the thread CPU
//! clock instead, which is current on read; schedstat supplies only the stall.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use super::approximate::thread_cpu_time;
use super::sample::Sample;
use super::timer::Timer;

/// Default location of the per-thread scheduler statistics.
pub const SCHEDSTAT_PATH: &str = "/proc/thread-self/schedstat";

/// Cumulative scheduler counters for one thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedCounters {
    pub run_ns: u64,
    pub wait_ns: u64,
}

/// Parse the contents of a schedstat file.
pub fn parse_schedstat(contents: &str) -> Option<SchedCounters> {
    let mut fields = contents.split_whitespace();
    let run_ns = fields.next()?.parse::<u64>().ok()?;
    let wait_ns = fields.next()?.parse::<u64>().ok()?;
    Some(SchedCounters { run_ns, wait_ns })
}

/// Precise timer backed by Linux schedstat.
#[derive(Debug, Clone)]
pub struct SchedstatTimer {
    path: PathBuf,
}

impl SchedstatTimer {
    /// Probe the default schedstat path.
    ///
    /// Returns `None` when the file is missing or unparsable, which is the
    /// normal case off Linux.
    pub fn probe() -> Option<Self> {
        Self::probe_path(SCHEDSTAT_PATH)
    }

    /// Probe a specific schedstat path.
    pub fn probe_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref().to_path_buf();
        match read_counters(&path) {
            Some(_) => Some(Self { path }),
            None => {
                debug!(path = %path.display(), "schedstat unavailable");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_counters(path: &Path) -> Option<SchedCounters> {
    fs::read_to_string(path).ok().and_then(|s| parse_schedstat(&s))
}

impl Timer for SchedstatTimer {
    fn name(&self) -> &'static str {
        "schedstat"
    }

    fn measure<T, F>(&self, work: F) -> (T, Sample)
    where
        F: FnOnce() -> T,
    {
        let before = read_counters(&self.path);
        let cpu0 = thread_cpu_time();
        let t0 = Instant::now();
        let result = work();
        let total = t0.elapsed();
        let cpu1 = thread_cpu_time();
        let after = read_counters(&self.path);

        let (lagging_run, stalled) = match (before, after) {
            (Some(a), Some(b)) => (
                Duration::from_nanos(b.run_ns.saturating_sub(a.run_ns)),
                Duration::from_nanos(b.wait_ns.saturating_sub(a.wait_ns)),
            ),
            // The file vanished mid-measurement.
            _ => (Duration::ZERO, Duration::ZERO),
        };
        let running = match (cpu0, cpu1) {
            (Some(a), Some(b)) => b.saturating_sub(a),
            _ => lagging_run,
        };
        let idle = total.saturating_sub(running).saturating_sub(stalled);

        (result, Sample::precise(running, idle, stalled, total))
    }
}
