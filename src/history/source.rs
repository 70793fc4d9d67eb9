//! Historical-metrics collaborators.
//!
//! The core only ever sees `Option<HistoricalAggregate>`. Each adapter owns its
//! failure modes and turns them into `None`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Aggregate statistics from an external analyzer. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAggregate {
    /// Share of time spent in I/O across all samples, `0..100`. Absent means `0.0`.
    #[serde(rename = "total_io_percentage", alias = "io_percentage", default)]
    pub io_percentage: f64,
    #[serde(default)]
    pub average_stall_ms: Option<f64>,
    #[serde(default)]
    pub sample_count: u64,
}

/// Errors an adapter can hit while loading history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to read history file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed history document {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid history aggregate: {0}")]
    Invalid(String),
}

/// Supplies historical aggregates, or nothing.
pub trait HistorySource: Send + Sync {
    fn fetch(&self) -> Option<HistoricalAggregate>;
}

/// Source that never has history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistorySource for NoHistory {
    fn fetch(&self) -> Option<HistoricalAggregate> {
        None
    }
}

/// Source returning a fixed aggregate.
#[derive(Debug, Clone)]
pub struct StaticHistory(pub HistoricalAggregate);

impl HistorySource for StaticHistory {
    fn fetch(&self) -> Option<HistoricalAggregate> {
        Some(self.0.clone())
    }
}

/// Reads an aggregate JSON document written by an external analyzer.
///
/// ```json
/// {"total_io_percentage": 62.5, "average_stall_ms": 14.2, "sample_count": 480}
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the document.
    pub fn load(&self) -> Result<HistoricalAggregate, HistoryError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| HistoryError::Read {
            path: self.path.clone(),
            source,
        })?;
        let aggregate: HistoricalAggregate =
            serde_json::from_str(&raw).map_err(|source| HistoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if !aggregate.io_percentage.is_finite() {
            return Err(HistoryError::Invalid(format!(
                "total_io_percentage is not finite: {}",
                aggregate.io_percentage
            )));
        }
        if let Some(stall) = aggregate.average_stall_ms {
            if !stall.is_finite() || stall < 0.0 {
                return Err(HistoryError::Invalid(format!(
                    "average_stall_ms out of range: {}",
                    stall
                )));
            }
        }

        Ok(aggregate)
    }
}

impl HistorySource for JsonFileHistory {
    fn fetch(&self) -> Option<HistoricalAggregate> {
        match self.load() {
            Ok(aggregate) => {
                debug!(
                    path = %self.path.display(),
                    samples = aggregate.sample_count,
                    "Loaded history aggregate"
                );
                Some(aggregate)
            }
            Err(e) => {
                warn!(error = %e, "History unavailable, using current sample only");
                None
            }
        }
    }
}
