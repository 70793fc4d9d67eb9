//! Measurement pipeline: sample, blend, cap, recommend, emit.

use serde::Serialize;
use tracing::{debug, Span};

use crate::config::AdvisorConfig;
use crate::estimator::{
    self, DecisionReasons, FixedPoolSize, PoolSizeSource, Recommender, SpeedupCurve,
};
use crate::history::{blend, BlendedMetrics, HistorySource, JsonFileHistory};
use crate::measure::{clamp_ratio, Sample, Timer, TimerKind};
use crate::report::{AdviceRecord, LogSink, RecommendationSink};
use crate::telemetry::{self, MeasurementSpan, SpanExt};

/// The outcome of one decision. Built once and handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Ratio the decision was based on (blended when history was used).
    pub io_ratio: f64,
    pub speedup_curve: SpeedupCurve,
    pub recommended_threads: u32,
    pub reasons: DecisionReasons,
    /// Present only when historical data was blended in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<BlendedMetrics>,
}

/// Entry point: measures units of work and recommends a thread count.
///
/// Shareable across threads behind an `Arc`; every call owns its own values.
pub struct ThreadAdvisor {
    config: AdvisorConfig,
    timer: TimerKind,
    history: Option<Box<dyn HistorySource>>,
    pool: Option<Box<dyn PoolSizeSource>>,
    sink: Box<dyn RecommendationSink>,
    cpu_count: usize,
}

impl ThreadAdvisor {
    pub fn builder() -> ThreadAdvisorBuilder {
        ThreadAdvisorBuilder::default()
    }

    /// Advisor with default settings and collaborators.
    pub fn new(config: AdvisorConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn timer(&self) -> &TimerKind {
        &self.timer
    }

    pub fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    /// Run `work`, then recommend a thread count from how its time was spent.
    ///
    /// The work's return value is passed through untouched. An `Err` value is
    /// measured and emitted like any other. A panic unwinds through and nothing
    /// is emitted.
    pub fn measure<T, F>(&self, label: &str, work: F) -> (T, Recommendation)
    where
        F: FnOnce() -> T,
    {
        let span = MeasurementSpan::new(label, self.timer.name());
        let _guard = span.enter();

        let (result, sample) = self.timer.measure(work);
        let recommendation = self.finish(label, &sample, &span);
        (result, recommendation)
    }

    /// Recommend from an already captured sample, emitting it like `measure`.
    pub fn advise(&self, label: &str, sample: &Sample) -> Recommendation {
        let span = MeasurementSpan::new(label, self.timer.name());
        let _guard = span.enter();
        self.finish(label, sample, &span)
    }

    /// Decide for a given ratio and stall without emitting anything.
    pub fn advise_ratio(&self, io_ratio: f64, stall_ms: Option<f64>) -> Recommendation {
        self.decide(clamp_ratio(io_ratio), stall_ms)
    }

    fn finish(&self, label: &str, sample: &Sample, span: &Span) -> Recommendation {
        let recommendation = self.decide(sample.io_ratio(), sample.stall_ms());
        let wall_ms = sample.wall().as_secs_f64() * 1000.0;

        span.record_recommendation(&recommendation, wall_ms);
        telemetry::record_recommendation(label, &recommendation);

        let record = AdviceRecord::new(label, self.timer.name(), sample, recommendation.clone());
        self.sink.emit(&record);

        recommendation
    }

    fn decide(&self, io_ratio: f64, stall_ms: Option<f64>) -> Recommendation {
        let history = self.blend_history(io_ratio, stall_ms);
        let (io_ratio, stall_ms) = match &history {
            Some(h) => (h.io_ratio, h.stall_ms),
            None => (io_ratio, stall_ms),
        };

        let env_cap = self.config.env_cap_raw();
        let caps = estimator::resolve(
            self.pool.as_deref(),
            self.cpu_count,
            self.config.core_multiplier,
            env_cap.as_deref(),
            self.config.hard_max_threads,
        );
        let curve = SpeedupCurve::build(io_ratio, caps.effective_cap());

        let recommender = Recommender::new(
            self.config.diminishing_return_threshold,
            self.config.max_avg_stall_ms,
        );
        let decision = recommender.recommend(io_ratio, stall_ms, &caps, &curve);

        Recommendation {
            io_ratio,
            speedup_curve: curve,
            recommended_threads: decision.recommended_threads,
            reasons: decision.reasons,
            history,
        }
    }

    fn blend_history(&self, io_ratio: f64, stall_ms: Option<f64>) -> Option<BlendedMetrics> {
        if !self.config.enable_history_blending {
            return None;
        }
        let source = self.history.as_ref()?;

        let aggregate = match source.fetch() {
            Some(agg) => agg,
            None => {
                telemetry::record_history_unavailable();
                return None;
            }
        };

        let blended = blend(io_ratio, stall_ms, Some(&aggregate));
        if !blended.is_blended() {
            return None;
        }

        debug!(
            current = io_ratio,
            blended = blended.io_ratio,
            samples = aggregate.sample_count,
            "Blended history into I/O ratio"
        );
        Some(blended)
    }
}

/// Builder for [`ThreadAdvisor`]. Unset options use the defaults derived from
/// the config.
#[derive(Default)]
pub struct ThreadAdvisorBuilder {
    config: Option<AdvisorConfig>,
    timer: Option<TimerKind>,
    history: Option<Box<dyn HistorySource>>,
    pool: Option<Box<dyn PoolSizeSource>>,
    sink: Option<Box<dyn RecommendationSink>>,
    cpu_count: Option<usize>,
}

impl ThreadAdvisorBuilder {
    pub fn config(mut self, config: AdvisorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn timer(mut self, timer: TimerKind) -> Self {
        self.timer = Some(timer);
        self
    }

    pub fn history_source(mut self, source: impl HistorySource + 'static) -> Self {
        self.history = Some(Box::new(source));
        self
    }

    pub fn pool_source(mut self, source: impl PoolSizeSource + 'static) -> Self {
        self.pool = Some(Box::new(source));
        self
    }

    pub fn sink(mut self, sink: impl RecommendationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn cpu_count(mut self, count: usize) -> Self {
        self.cpu_count = Some(count);
        self
    }

    pub fn build(self) -> ThreadAdvisor {
        telemetry::describe_metrics();

        let config = self.config.unwrap_or_default();

        let history = self.history.or_else(|| {
            config
                .history_path
                .as_ref()
                .map(|path| Box::new(JsonFileHistory::new(path.clone())) as Box<dyn HistorySource>)
        });
        let pool = self.pool.or_else(|| {
            config
                .pool_size
                .map(|size| Box::new(FixedPoolSize(size)) as Box<dyn PoolSizeSource>)
        });
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(LogSink::new(config.output_format)));
        let timer = self.timer.unwrap_or_else(TimerKind::probe);
        let cpu_count = self.cpu_count.unwrap_or_else(num_cpus::get);

        debug!(
            timer = timer.name(),
            cpu_count,
            history = history.is_some(),
            pool = pool.is_some(),
            "Thread advisor built"
        );

        ThreadAdvisor {
            config,
            timer,
            history,
            pool,
            sink,
            cpu_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoricalAggregate, NoHistory, StaticHistory};
    use crate::report::NullSink;
    use std::time::Duration;

    fn config() -> AdvisorConfig {
        AdvisorConfig {
            env_cap_vars: Vec::new(),
            ..AdvisorConfig::default()
        }
    }

    fn advisor(config: AdvisorConfig) -> ThreadAdvisor {
        ThreadAdvisor::builder()
            .config(config)
            .timer(TimerKind::approximate())
            .pool_source(FixedPoolSize(64))
            .sink(NullSink)
            .cpu_count(16)
            .build()
    }

    #[test]
    fn test_pure_cpu_recommends_one() {
        let rec = advisor(config()).advise_ratio(0.0, None);
        assert_eq!(rec.recommended_threads, 1);
        assert!(rec.history.is_none());
    }

    #[test]
    fn test_curve_bounded_by_effective_cap() {
        let rec = advisor(config()).advise_ratio(0.9, None);
        assert_eq!(rec.speedup_curve.len(), 16);
        assert_eq!(rec.reasons.effective_cap, 16);
    }

    #[test]
    fn test_ratio_clamped_before_decision() {
        let rec = advisor(config()).advise_ratio(3.0, None);
        assert_eq!(rec.io_ratio, 1.0);
    }

    #[test]
    fn test_zero_wall_sample_is_ratio_zero() {
        let sample = Sample::approximate(Duration::ZERO, Duration::ZERO);
        let rec = advisor(config()).advise("zero", &sample);
        assert_eq!(rec.io_ratio, 0.0);
        assert_eq!(rec.recommended_threads, 1);
    }

    #[test]
    fn test_history_blended_when_enabled() {
        let advisor = ThreadAdvisor::builder()
            .config(config())
            .timer(TimerKind::approximate())
            .history_source(StaticHistory(HistoricalAggregate {
                io_percentage: 90.0,
                average_stall_ms: None,
                sample_count: 100,
            }))
            .sink(NullSink)
            .cpu_count(8)
            .build();

        let rec = advisor.advise_ratio(0.0, None);
        let history = rec.history.expect("history should be blended");
        assert_eq!(history.history_samples, Some(100));
        assert!((rec.io_ratio - 9.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_ignored_when_disabled() {
        let advisor = ThreadAdvisor::builder()
            .config(AdvisorConfig {
                enable_history_blending: false,
                ..config()
            })
            .history_source(StaticHistory(HistoricalAggregate {
                io_percentage: 90.0,
                average_stall_ms: None,
                sample_count: 100,
            }))
            .sink(NullSink)
            .build();

        let rec = advisor.advise_ratio(0.0, None);
        assert!(rec.history.is_none());
        assert_eq!(rec.io_ratio, 0.0);
    }

    #[test]
    fn test_unavailable_history_uses_current_values() {
        let advisor = ThreadAdvisor::builder()
            .config(config())
            .history_source(NoHistory)
            .sink(NullSink)
            .build();

        let rec = advisor.advise_ratio(0.5, Some(10.0));
        assert!(rec.history.is_none());
        assert_eq!(rec.io_ratio, 0.5);
        assert_eq!(rec.reasons.stall_ms, Some(10.0));
    }

    #[test]
    fn test_builder_defaults_from_config() {
        let advisor = ThreadAdvisor::builder()
            .config(AdvisorConfig {
                pool_size: Some(3),
                ..config()
            })
            .sink(NullSink)
            .cpu_count(8)
            .build();

        let rec = advisor.advise_ratio(0.95, None);
        assert_eq!(rec.reasons.pool_cap, Some(3));
        assert!(rec.recommended_threads <= 3);
    }

    #[test]
    fn test_measure_passes_result_through() {
        let (value, rec) = advisor(config()).measure("noop", || 42);
        assert_eq!(value, 42);
        assert!(rec.recommended_threads >= 1);
    }

    #[test]
    fn test_advisor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreadAdvisor>();
    }
}
