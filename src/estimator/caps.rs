//! Independent upper bounds on thread count.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Pool size assumed when the pool collaborator is absent or fails.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Errors from a pool-size collaborator.
#[derive(Debug, Error)]
pub enum PoolSizeError {
    #[error("Pool size source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid pool size {value:?} from {source_name}")]
    Invalid { source_name: String, value: String },
}

/// Reports the size of a resource pool that bounds useful concurrency,
/// typically a database connection pool.
pub trait PoolSizeSource: Send + Sync {
    fn pool_size(&self) -> Result<u32, PoolSizeError>;
}

/// Pool of known size.
#[derive(Debug, Clone, Copy)]
pub struct FixedPoolSize(pub u32);

impl PoolSizeSource for FixedPoolSize {
    fn pool_size(&self) -> Result<u32, PoolSizeError> {
        Ok(self.0)
    }
}

/// Pool size read from an environment variable at resolve time.
#[derive(Debug, Clone)]
pub struct EnvPoolSize {
    var: String,
}

impl EnvPoolSize {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl PoolSizeSource for EnvPoolSize {
    fn pool_size(&self) -> Result<u32, PoolSizeError> {
        let raw = std::env::var(&self.var)
            .map_err(|_| PoolSizeError::Unavailable(format!("{} is not set", self.var)))?;
        raw.trim().parse::<u32>().map_err(|_| PoolSizeError::Invalid {
            source_name: self.var.clone(),
            value: raw,
        })
    }
}

/// Every upper bound considered for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapSet {
    pub pool_cap: Option<u32>,
    pub cpu_cap: u32,
    pub env_cap: Option<u32>,
    pub hard_cap: u32,
}

impl CapSet {
    /// Smallest present bound, never below 1.
    pub fn effective_cap(&self) -> u32 {
        [
            self.pool_cap,
            Some(self.cpu_cap),
            self.env_cap,
            Some(self.hard_cap),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(1)
        .max(1)
    }
}

/// Parse an environment-style cap. Unset or unparsable input contributes no cap.
pub fn parse_env_cap(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
}

/// `floor(cpu_count * multiplier)`, saturating at 0 for negative or NaN products.
pub fn cpu_cap(cpu_count: usize, core_multiplier: f64) -> u32 {
    // `as` saturates: NaN and negatives become 0, huge values become u32::MAX.
    (cpu_count as f64 * core_multiplier).floor() as u32
}

/// Gather all caps. Never fails: collaborator problems fall back to defaults.
pub fn resolve(
    pool: Option<&dyn PoolSizeSource>,
    cpu_count: usize,
    core_multiplier: f64,
    env_cap: Option<&str>,
    hard_cap: u32,
) -> CapSet {
    let pool_cap = match pool {
        Some(source) => match source.pool_size() {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, default = DEFAULT_POOL_SIZE, "Pool size detection failed");
                crate::telemetry::record_pool_fallback();
                DEFAULT_POOL_SIZE
            }
        },
        None => DEFAULT_POOL_SIZE,
    };

    CapSet {
        pool_cap: Some(pool_cap),
        cpu_cap: cpu_cap(cpu_count, core_multiplier),
        env_cap: parse_env_cap(env_cap),
        hard_cap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingPool;

    impl PoolSizeSource for FailingPool {
        fn pool_size(&self) -> Result<u32, PoolSizeError> {
            Err(PoolSizeError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_effective_cap_is_min() {
        let caps = CapSet {
            pool_cap: Some(5),
            cpu_cap: 8,
            env_cap: None,
            hard_cap: 32,
        };
        assert_eq!(caps.effective_cap(), 5);
    }

    #[test]
    fn test_effective_cap_floor_at_one() {
        let caps = CapSet {
            pool_cap: Some(4),
            cpu_cap: 0,
            env_cap: Some(3),
            hard_cap: 32,
        };
        assert_eq!(caps.effective_cap(), 1);
    }

    #[test]
    fn test_env_cap_parsing() {
        assert_eq!(parse_env_cap(Some("12")), Some(12));
        assert_eq!(parse_env_cap(Some(" 7 ")), Some(7));
        assert_eq!(parse_env_cap(Some("lots")), None);
        assert_eq!(parse_env_cap(Some("-3")), None);
        assert_eq!(parse_env_cap(Some("")), None);
        assert_eq!(parse_env_cap(None), None);
    }

    #[test]
    fn test_cpu_cap_floor() {
        assert_eq!(cpu_cap(8, 1.0), 8);
        assert_eq!(cpu_cap(6, 1.5), 9);
        assert_eq!(cpu_cap(3, 0.5), 1);
        assert_eq!(cpu_cap(4, -2.0), 0);
        assert_eq!(cpu_cap(4, f64::NAN), 0);
    }

    #[test]
    fn test_resolve_without_pool_uses_default() {
        let caps = resolve(None, 8, 1.0, None, 32);
        assert_eq!(caps.pool_cap, Some(DEFAULT_POOL_SIZE));
        assert_eq!(caps.effective_cap(), 5);
    }

    #[test]
    fn test_resolve_failing_pool_uses_default() {
        let caps = resolve(Some(&FailingPool), 8, 1.0, Some("16"), 32);
        assert_eq!(caps.pool_cap, Some(DEFAULT_POOL_SIZE));
        assert_eq!(caps.env_cap, Some(16));
    }

    #[test]
    fn test_resolve_fixed_pool() {
        let caps = resolve(Some(&FixedPoolSize(20)), 16, 1.0, None, 12);
        assert_eq!(caps.pool_cap, Some(20));
        assert_eq!(caps.effective_cap(), 12);
    }
}
