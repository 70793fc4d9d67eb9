//! Speedup model tests.

use thread_advisor::estimator::{round3, speedup, SpeedupCurve};

// =============================================================================
// Amdahl's Law
// =============================================================================

#[test]
fn single_thread_is_exactly_one() {
    for i in 0..=100 {
        let p = i as f64 / 100.0;
        assert_eq!(speedup(p, 1), 1.0, "p = {}", p);
    }
}

#[test]
fn speedup_is_monotonic_in_threads() {
    for i in 1..=20 {
        let p = i as f64 / 20.0;
        let mut prev = speedup(p, 1);
        for n in 2..=64 {
            let s = speedup(p, n);
            assert!(s >= prev, "p = {}, n = {}: {} < {}", p, n, s, prev);
            prev = s;
        }
    }
}

#[test]
fn half_io_two_threads() {
    assert!((speedup(0.5, 2) - 1.333).abs() < 0.01);
}

#[test]
fn pure_cpu_never_speeds_up() {
    assert_eq!(speedup(0.0, 32), 1.0);
}

#[test]
fn pure_io_scales_linearly() {
    assert!((speedup(1.0, 8) - 8.0).abs() < 1e-9);
}

// =============================================================================
// SpeedupCurve
// =============================================================================

#[test]
fn curve_covers_one_through_upper() {
    let curve = SpeedupCurve::build(0.7, 6);
    let threads: Vec<u32> = curve.iter().map(|p| p.threads).collect();
    assert_eq!(threads, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn curve_upper_zero_treated_as_one() {
    let curve = SpeedupCurve::build(0.7, 0);
    assert_eq!(curve.len(), 1);
    assert_eq!(curve.get(1).map(|p| p.speedup), Some(1.0));
}

#[test]
fn curve_keeps_full_precision_internally() {
    let curve = SpeedupCurve::build(0.5, 2);
    let s = curve.get(2).unwrap().speedup;
    assert_ne!(s, round3(s));
}

#[test]
fn curve_serializes_rounded() {
    let curve = SpeedupCurve::build(0.5, 3);
    let json = serde_json::to_string(&curve).unwrap();
    assert!(json.contains("1.333"));
    assert!(!json.contains("1.3333"));
}

#[test]
fn round3_keeps_three_decimals() {
    assert_eq!(round3(1.23456), 1.235);
    assert_eq!(round3(2.0), 2.0);
}
