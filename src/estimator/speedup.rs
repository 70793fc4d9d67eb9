//! Amdahl's-law speedup model.
//!
//! I/O waits can be overlapped by adding threads; CPU-bound work cannot. The
//! I/O ratio therefore plays the role of the parallelizable fraction.

use serde::{Serialize, Serializer};

/// Speedup of `threads` workers over one, for I/O ratio `p`.
pub fn speedup(p: f64, threads: u32) -> f64 {
    let n = threads.max(1) as f64;
    1.0 / ((1.0 - p) + p / n)
}

/// Round to 3 decimal digits for reporting.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn serialize_round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round3(*value))
}

/// One point on the speedup curve. `speedup` is kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedupPoint {
    pub threads: u32,
    #[serde(serialize_with = "serialize_round3")]
    pub speedup: f64,
}

/// Speedup for every thread count from 1 to an upper bound, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpeedupCurve {
    points: Vec<SpeedupPoint>,
}

impl SpeedupCurve {
    /// Build the curve for `threads = 1..=upper`. An `upper` of 0 is treated as 1.
    pub fn build(p: f64, upper: u32) -> Self {
        let points = (1..=upper.max(1))
            .map(|threads| SpeedupPoint {
                threads,
                speedup: speedup(p, threads),
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[SpeedupPoint] {
        &self.points
    }

    /// Point for a specific thread count.
    pub fn get(&self, threads: u32) -> Option<&SpeedupPoint> {
        threads
            .checked_sub(1)
            .and_then(|i| self.points.get(i as usize))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpeedupPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a SpeedupCurve {
    type Item = &'a SpeedupPoint;
    type IntoIter = std::slice::Iter<'a, SpeedupPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
