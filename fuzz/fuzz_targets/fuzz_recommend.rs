//! Fuzz target for the decision path.
//!
//! Arbitrary ratios, stalls, caps and thresholds must always produce a
//! recommendation within `1..=effective_cap`.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use thread_advisor::estimator::{CapSet, Recommender, SpeedupCurve};
use thread_advisor::measure::clamp_ratio;

#[derive(Debug, Arbitrary)]
struct Input {
    io_ratio: f64,
    stall_ms: Option<f64>,
    threshold: f64,
    stall_limit_ms: f64,
    pool_cap: Option<u8>,
    cpu_cap: u8,
    env_cap: Option<u8>,
    hard_cap: u8,
}

fuzz_target!(|input: Input| {
    let caps = CapSet {
        pool_cap: input.pool_cap.map(u32::from),
        cpu_cap: input.cpu_cap.into(),
        env_cap: input.env_cap.map(u32::from),
        hard_cap: input.hard_cap.into(),
    };
    let p = clamp_ratio(input.io_ratio);
    let curve = SpeedupCurve::build(p, caps.effective_cap());
    let decision = Recommender::new(input.threshold, input.stall_limit_ms)
        .recommend(p, input.stall_ms, &caps, &curve);

    assert!(decision.recommended_threads >= 1);
    assert!(decision.recommended_threads <= caps.effective_cap());
});
