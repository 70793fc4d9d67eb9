//! Output sinks for advice records.

use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::OutputFormat;

use super::record::AdviceRecord;
use super::text::render_text;

/// Receives every advice record the pipeline produces.
pub trait RecommendationSink: Send + Sync {
    fn emit(&self, record: &AdviceRecord);
}

impl<S: RecommendationSink + ?Sized> RecommendationSink for Arc<S> {
    fn emit(&self, record: &AdviceRecord) {
        (**self).emit(record)
    }
}

/// Emits through `tracing` (JSON) or stdout (text).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink {
    pub format: OutputFormat,
}

impl LogSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl RecommendationSink for LogSink {
    fn emit(&self, record: &AdviceRecord) {
        match self.format {
            OutputFormat::Json => match record.to_json() {
                Ok(line) => info!(target: "thread_advisor::advice", advice = %line),
                Err(e) => warn!(error = %e, name = %record.name, "Failed to serialize advice"),
            },
            OutputFormat::Text => {
                let report = render_text(record);
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{report}") {
                    warn!(error = %e, "Failed to write advice report");
                }
            }
        }
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RecommendationSink for NullSink {
    fn emit(&self, _record: &AdviceRecord) {}
}
