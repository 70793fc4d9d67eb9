//! Timing capture tests.

use std::io::Write;
use std::time::{Duration, Instant};

use thread_advisor::measure::{
    clamp_ratio, ApproximateTimer, Sample, SchedstatTimer, Timer, TimerKind,
};

fn spin(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::black_box(0u64);
    }
}

// =============================================================================
// Sample
// =============================================================================

#[test]
fn clamp_maps_out_of_range() {
    assert_eq!(clamp_ratio(-0.5), 0.0);
    assert_eq!(clamp_ratio(1.5), 1.0);
    assert_eq!(clamp_ratio(0.8), 0.8);
    assert_eq!(clamp_ratio(f64::NAN), 0.0);
}

#[test]
fn zero_wall_is_zero_ratio() {
    let sample = Sample::approximate(Duration::ZERO, Duration::from_millis(3));
    assert_eq!(sample.io_ratio(), 0.0);
}

#[test]
fn approximate_sample_saturates_io() {
    let sample = Sample::approximate(Duration::from_millis(10), Duration::from_millis(15));
    assert_eq!(sample.io(), Duration::ZERO);
    assert_eq!(sample.stall(), None);
    assert_eq!(sample.io_ratio(), 0.0);
}

#[test]
fn precise_sample_maps_fields() {
    let sample = Sample::precise(
        Duration::from_millis(20),
        Duration::from_millis(70),
        Duration::from_millis(10),
        Duration::from_millis(100),
    );
    assert_eq!(sample.wall(), Duration::from_millis(100));
    assert_eq!(sample.cpu(), Duration::from_millis(20));
    assert_eq!(sample.io(), Duration::from_millis(70));
    assert_eq!(sample.stall_ms(), Some(10.0));
    assert!((sample.io_ratio() - 0.7).abs() < 1e-9);
}

// =============================================================================
// Approximate Timer
// =============================================================================

#[test]
fn approximate_timer_sees_sleep_as_io() {
    let (value, sample) = ApproximateTimer::new().measure(|| {
        std::thread::sleep(Duration::from_millis(30));
        "done"
    });
    assert_eq!(value, "done");
    assert!(sample.wall() >= Duration::from_millis(30));
    assert!(sample.io_ratio() > 0.5, "io_ratio = {}", sample.io_ratio());
    assert!(sample.stall().is_none());
}

#[cfg(target_os = "linux")]
#[test]
fn approximate_timer_sees_spin_as_cpu() {
    let (_, sample) = ApproximateTimer::new().measure(|| spin(Duration::from_millis(30)));
    assert!(sample.cpu() > Duration::ZERO);
    assert!(sample.cpu() <= sample.wall() + Duration::from_millis(5));
}

// =============================================================================
// Schedstat Timer
// =============================================================================

#[test]
fn schedstat_probe_rejects_missing_file() {
    assert!(SchedstatTimer::probe_path("/nonexistent/schedstat").is_none());
}

#[test]
fn schedstat_probe_rejects_garbage() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "garbage").unwrap();
    assert!(SchedstatTimer::probe_path(file.path()).is_none());
}

#[test]
fn schedstat_static_counters_report_no_stall() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1000 2000 3").unwrap();
    let timer = SchedstatTimer::probe_path(file.path()).unwrap();

    let (_, sample) = timer.measure(|| std::thread::sleep(Duration::from_millis(5)));
    assert_eq!(sample.stall(), Some(Duration::ZERO));
    assert_eq!(sample.io() + sample.cpu(), sample.wall());
    assert!(sample.cpu() < Duration::from_millis(5));
}

#[cfg(target_os = "linux")]
#[test]
fn schedstat_short_spins_stay_cpu_bound() {
    let Some(timer) = SchedstatTimer::probe() else {
        return;
    };

    for ms in [1u64, 2, 3, 5] {
        let worst = (0..10)
            .map(|_| timer.measure(|| spin(Duration::from_millis(ms))).1.io_ratio())
            .fold(0.0_f64, f64::max);
        assert!(worst < 0.5, "spin {}ms: worst io_ratio = {}", ms, worst);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn schedstat_sleep_is_io() {
    let Some(timer) = SchedstatTimer::probe() else {
        return;
    };

    let (_, sample) = timer.measure(|| std::thread::sleep(Duration::from_millis(20)));
    assert!(sample.io_ratio() > 0.5, "io_ratio = {}", sample.io_ratio());
    assert!(sample.stall().is_some());
}

// =============================================================================
// Probe
// =============================================================================

#[test]
fn probe_always_yields_a_timer() {
    let timer = TimerKind::probe();
    let (value, sample) = timer.measure(|| 7);
    assert_eq!(value, 7);
    assert_eq!(sample.stall().is_some(), timer.is_precise());
}

#[test]
fn approximate_kind_is_not_precise() {
    let timer = TimerKind::approximate();
    assert!(!timer.is_precise());
    assert_eq!(timer.name(), "approximate");
}
