//! Historical aggregates and blending.

mod blend;
mod source;

pub use blend::{blend, BlendedMetrics};
pub use source::{
    HistoricalAggregate, HistoryError, HistorySource, JsonFileHistory, NoHistory, StaticHistory,
};
