//! Timing capture for one unit of work.
//!
//! Two strategies sit behind the [`Timer`] contract: a wall/CPU approximation
//! that works everywhere and a scheduler-level timer that also reports stall
//! time. [`TimerKind::probe`] picks the best one available at runtime.

mod approximate;
mod sample;
mod schedstat;
mod timer;

pub use approximate::{thread_cpu_time, ApproximateTimer};
pub use sample::{clamp_ratio, Sample};
pub use schedstat::{parse_schedstat, SchedCounters, SchedstatTimer, SCHEDSTAT_PATH};
pub use timer::{Timer, TimerKind};
