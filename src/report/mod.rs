//! Advice records, the text report, and output sinks.

mod record;
mod sink;
mod text;

pub use record::{AdviceRecord, ADVICE_EVENT, LIB_NAME};
pub use sink::{LogSink, NullSink, RecommendationSink};
pub use text::{render_recommendation, render_text};
