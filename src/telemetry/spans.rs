//! Span utilities for measurement tracing.

use tracing::{info_span, Span};

use crate::pipeline::Recommendation;

/// Extension trait for recording decision outcomes into a span.
pub trait SpanExt {
    /// Record the outcome of one advice decision into the span.
    fn record_recommendation(&self, recommendation: &Recommendation, wall_ms: f64);
}

impl SpanExt for Span {
    fn record_recommendation(&self, recommendation: &Recommendation, wall_ms: f64) {
        self.record("io_ratio", recommendation.io_ratio);
        self.record("recommended_threads", recommendation.recommended_threads);
        self.record("wall_ms", wall_ms);
    }
}

/// Factory for measurement spans.
pub struct MeasurementSpan;

impl MeasurementSpan {
    /// Create a span around one measured unit of work.
    ///
    /// Fields included:
    /// - `label`: Caller-supplied name for the unit of work
    /// - `timer`: Timing strategy in use
    /// - `io_ratio`, `recommended_threads`, `wall_ms`: Filled in by
    ///   `SpanExt::record_recommendation`
    pub fn new(label: &str, timer: &str) -> Span {
        info_span!(
            "thread_advice",
            label = %label,
            timer = %timer,
            io_ratio = tracing::field::Empty,
            recommended_threads = tracing::field::Empty,
            wall_ms = tracing::field::Empty,
        )
    }
}
