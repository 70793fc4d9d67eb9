//! Thread-count selection: greedy diminishing-returns scan, stall back-off, caps.

use serde::Serialize;
use tracing::debug;

use super::caps::CapSet;
use super::speedup::SpeedupCurve;

/// Every input that shaped a decision, for audit and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReasons {
    pub diminishing_return_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_cap: Option<u32>,
    pub cpu_cap: u32,
    pub hard_cap: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_cap: Option<u32>,
    pub effective_cap: u32,
    /// Result of the greedy scan before stall back-off and capping.
    pub greedy_threads: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stall_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stall_limit_ms: Option<f64>,
    pub stall_penalty_applied: bool,
}

/// Outcome of [`Recommender::recommend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub recommended_threads: u32,
    pub reasons: DecisionReasons,
}

/// Picks a thread count from a speedup curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommender {
    /// Minimum relative gain required to add one more thread.
    pub threshold: f64,
    /// Average stall above which one thread is taken back.
    pub stall_limit_ms: f64,
}

impl Recommender {
    pub fn new(threshold: f64, stall_limit_ms: f64) -> Self {
        Self {
            threshold,
            stall_limit_ms,
        }
    }

    /// Largest thread count reached before the first step whose relative gain
    /// falls below the threshold. Later points are never considered.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn greedy_scan(&self, curve: &SpeedupCurve) -> u32 {
        let mut points = curve.iter();
        let (mut best, mut prev) = match points.next() {
            Some(first) => (first.threads, first.speedup),
            None => return 1,
        };

        for point in points {
            let inc = (point.speedup - prev) / prev;
            // Negated so a NaN gain or threshold also stops the scan.
            if !(inc >= self.threshold) {
                break;
            }
            best = point.threads;
            prev = point.speedup;
        }

        best.max(1)
    }

    /// Choose a thread count. `io_ratio` is carried for logging only; the curve
    /// already encodes it.
    pub fn recommend(
        &self,
        io_ratio: f64,
        avg_stall_ms: Option<f64>,
        caps: &CapSet,
        curve: &SpeedupCurve,
    ) -> Decision {
        let greedy = self.greedy_scan(curve);

        let stall_penalty_applied = avg_stall_ms.is_some_and(|s| s > self.stall_limit_ms);
        let best = if stall_penalty_applied {
            greedy.saturating_sub(1).max(1)
        } else {
            greedy
        };

        let effective_cap = caps.effective_cap();
        let recommended_threads = best.min(effective_cap);

        debug!(
            io_ratio,
            greedy,
            stall_penalty_applied,
            effective_cap,
            recommended_threads,
            "Thread recommendation computed"
        );

        Decision {
            recommended_threads,
            reasons: DecisionReasons {
                diminishing_return_threshold: self.threshold,
                pool_cap: caps.pool_cap,
                cpu_cap: caps.cpu_cap,
                hard_cap: caps.hard_cap,
                env_cap: caps.env_cap,
                effective_cap,
                greedy_threads: greedy,
                stall_ms: avg_stall_ms,
                stall_limit_ms: avg_stall_ms.map(|_| self.stall_limit_ms),
                stall_penalty_applied,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_caps(cap: u32) -> CapSet {
        CapSet {
            pool_cap: None,
            cpu_cap: cap,
            env_cap: None,
            hard_cap: cap,
        }
    }

    #[test]
    fn test_low_io_stops_early() {
        let r = Recommender::new(0.05, 85.0);
        let curve = SpeedupCurve::build(0.1, 32);
        let d = r.recommend(0.1, None, &open_caps(32), &curve);
        assert!(d.recommended_threads <= 2);
    }

    #[test]
    fn test_high_io_scales_up() {
        let r = Recommender::new(0.05, 85.0);
        let curve = SpeedupCurve::build(0.8, 32);
        let d = r.recommend(0.8, None, &open_caps(32), &curve);
        assert!(d.recommended_threads > 1);
    }

    #[test]
    fn test_zero_io_is_one_thread() {
        let r = Recommender::new(0.05, 85.0);
        let curve = SpeedupCurve::build(0.0, 16);
        assert_eq!(r.greedy_scan(&curve), 1);
    }

    #[test]
    fn test_nan_threshold_stops_at_one() {
        let r = Recommender::new(f64::NAN, 85.0);
        let curve = SpeedupCurve::build(0.9, 16);
        assert_eq!(r.greedy_scan(&curve), 1);
    }

    #[test]
    fn test_zero_threshold_walks_to_cap() {
        let r = Recommender::new(0.0, 85.0);
        let curve = SpeedupCurve::build(0.5, 10);
        assert_eq!(r.greedy_scan(&curve), 10);
    }

    #[test]
    fn test_stall_reasons_only_when_evaluated() {
        let r = Recommender::new(0.05, 85.0);
        let curve = SpeedupCurve::build(0.5, 8);
        let d = r.recommend(0.5, None, &open_caps(8), &curve);
        assert!(d.reasons.stall_ms.is_none());
        assert!(d.reasons.stall_limit_ms.is_none());
        assert!(!d.reasons.stall_penalty_applied);

        let d = r.recommend(0.5, Some(10.0), &open_caps(8), &curve);
        assert_eq!(d.reasons.stall_ms, Some(10.0));
        assert_eq!(d.reasons.stall_limit_ms, Some(85.0));
        assert!(!d.reasons.stall_penalty_applied);
    }
}
