//! Telemetry: structured logging, spans, and metrics hooks.

mod logging;
mod metrics;
mod spans;

pub use logging::{
    init_logging, LogConfig, LogError, LogFormat, LOG_ENV_VAR, LOG_FILE_ENV_VAR, LOG_FORMAT_ENV_VAR,
};
pub use self::metrics::{
    describe_metrics, record_history_unavailable, record_pool_fallback, record_recommendation,
};
pub use spans::{MeasurementSpan, SpanExt};
