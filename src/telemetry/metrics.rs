//! Metrics facade hooks.
//!
//! Emits through the `metrics` crate; without an installed recorder every call
//! is a no-op.

use std::sync::Once;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

use crate::pipeline::Recommendation;

static DESCRIBE: Once = Once::new();

/// Register metric descriptions. Safe to call more than once.
pub fn describe_metrics() {
    DESCRIBE.call_once(|| {
        describe_gauge!(
            "thread_advisor_recommended_threads",
            "Most recent recommended thread count per label"
        );
        describe_histogram!(
            "thread_advisor_io_ratio",
            "I/O ratio used for each decision, after blending"
        );
        describe_counter!(
            "thread_advisor_history_unavailable_total",
            "Decisions made without history because the source returned nothing"
        );
        describe_counter!(
            "thread_advisor_pool_fallback_total",
            "Pool size lookups that failed and used the default"
        );
    });
}

/// Record the outcome of one decision.
pub fn record_recommendation(label: &str, recommendation: &Recommendation) {
    let label = label.to_string();
    gauge!("thread_advisor_recommended_threads", "label" => label.clone())
        .set(recommendation.recommended_threads as f64);
    histogram!("thread_advisor_io_ratio", "label" => label).record(recommendation.io_ratio);
}

pub fn record_history_unavailable() {
    counter!("thread_advisor_history_unavailable_total").increment(1);
}

pub fn record_pool_fallback() {
    counter!("thread_advisor_pool_fallback_total").increment(1);
}
