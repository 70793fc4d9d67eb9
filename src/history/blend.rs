//! Confidence-weighted blending of a current sample with historical aggregates.

use serde::{Deserialize, Serialize};

use crate::measure::clamp_ratio;

use super::source::HistoricalAggregate;

/// Ratio and stall after blending, plus where the history came from.
///
/// `history_samples` and `history_weight` are only set when blending happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendedMetrics {
    pub io_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stall_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_samples: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_weight: Option<f64>,
}

impl BlendedMetrics {
    /// Current values passed through with no history applied.
    pub fn current_only(io_ratio: f64, stall_ms: Option<f64>) -> Self {
        Self {
            io_ratio,
            stall_ms,
            history_samples: None,
            history_weight: None,
        }
    }

    /// True when historical data contributed to these values.
    pub fn is_blended(&self) -> bool {
        self.history_samples.is_some()
    }
}

/// Blend the current measurement with a historical aggregate.
///
/// The current sample has weight 1 and the history has weight `sqrt(n)`, so
/// trust in history grows sub-linearly with its sample count.
pub fn blend(
    current_io_ratio: f64,
    current_stall_ms: Option<f64>,
    history: Option<&HistoricalAggregate>,
) -> BlendedMetrics {
    let history = match history {
        Some(h) if h.sample_count > 0 => h,
        _ => return BlendedMetrics::current_only(current_io_ratio, current_stall_ms),
    };

    let weight = (history.sample_count as f64).sqrt();
    let total = 1.0 + weight;
    let weighted = |current: f64, historical: f64| (current + historical * weight) / total;

    let history_io = clamp_ratio(history.io_percentage / 100.0);
    let io_ratio = weighted(current_io_ratio, history_io);

    let stall_ms = match (current_stall_ms, history.average_stall_ms) {
        (Some(cur), Some(hist)) => Some(weighted(cur, hist)),
        (cur, hist) => cur.or(hist),
    };

    BlendedMetrics {
        io_ratio,
        stall_ms,
        history_samples: Some(history.sample_count),
        history_weight: Some(weight),
    }
}
