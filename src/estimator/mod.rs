//! Decision core: speedup model, caps, and recommendation.

pub mod caps;
mod recommend;
mod speedup;

pub use caps::{
    resolve, CapSet, EnvPoolSize, FixedPoolSize, PoolSizeError, PoolSizeSource,
    DEFAULT_POOL_SIZE,
};
pub use recommend::{Decision, DecisionReasons, Recommender};
pub use speedup::{round3, speedup, SpeedupCurve, SpeedupPoint};
