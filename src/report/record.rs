//! Structured advice record handed to sinks.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::measure::Sample;
use crate::pipeline::Recommendation;

pub const LIB_NAME: &str = "thread_advisor";
pub const ADVICE_EVENT: &str = "advice";

/// One emitted advice event: where the time went and what was decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceRecord {
    pub lib: &'static str,
    pub event: &'static str,
    pub name: String,
    pub measured_at: DateTime<Utc>,
    pub timer: &'static str,
    pub wall_s: f64,
    pub cpu_s: f64,
    pub io_s: f64,
    pub stall_s: Option<f64>,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

impl AdviceRecord {
    pub fn new(
        name: impl Into<String>,
        timer: &'static str,
        sample: &Sample,
        recommendation: Recommendation,
    ) -> Self {
        Self {
            lib: LIB_NAME,
            event: ADVICE_EVENT,
            name: name.into(),
            measured_at: Utc::now(),
            timer,
            wall_s: sample.wall().as_secs_f64(),
            cpu_s: sample.cpu().as_secs_f64(),
            io_s: sample.io().as_secs_f64(),
            stall_s: sample.stall().map(|d| d.as_secs_f64()),
            recommendation,
        }
    }

    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
