//! Thread Advisor
//!
//! Measures how a unit of work spends its time and recommends a worker thread
//! count for it.
//!
//! # Decision Pipeline
//!
//! 1. **Measure**: wall, CPU, I/O and (when available) run-queue stall time
//! 2. **Blend**: optionally merge the I/O ratio with historical aggregates
//! 3. **Cap**: resolve pool, CPU, environment and hard upper bounds
//! 4. **Recommend**: walk the Amdahl's-law speedup curve until the next thread
//!    stops paying for itself
//!
//! ```no_run
//! use thread_advisor::{AdvisorConfig, ThreadAdvisor};
//!
//! let advisor = ThreadAdvisor::new(AdvisorConfig::default());
//! let (body, advice) = advisor.measure("fetch_user", || {
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//!     "ok"
//! });
//! assert_eq!(body, "ok");
//! println!("use {} threads", advice.recommended_threads);
//! ```

pub mod cli;
pub mod config;
pub mod estimator;
pub mod history;
pub mod measure;
pub mod pipeline;
pub mod report;
pub mod telemetry;

pub use config::{AdvisorConfig, ConfigError, OutputFormat};
pub use estimator::{CapSet, DecisionReasons, PoolSizeSource, SpeedupCurve, SpeedupPoint};
pub use history::{BlendedMetrics, HistoricalAggregate, HistorySource};
pub use measure::{Sample, Timer, TimerKind};
pub use pipeline::{Recommendation, ThreadAdvisor, ThreadAdvisorBuilder};
pub use report::{AdviceRecord, LogSink, NullSink, RecommendationSink};
