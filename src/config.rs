//! Advisor configuration.
//!
//! Values come from `THREAD_ADVISOR_*` environment variables or a TOML file,
//! with defaults for anything missing. Invalid env values fall back to
//! defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `THREAD_ADVISOR_HARD_MAX_THREADS` | 32 | Absolute thread ceiling |
//! | `THREAD_ADVISOR_CORE_MULTIPLIER` | 1.0 | Threads allowed per CPU core |
//! | `THREAD_ADVISOR_THRESHOLD` | 0.05 | Minimum relative gain per extra thread |
//! | `THREAD_ADVISOR_MAX_AVG_STALL_MS` | 85.0 | Stall above which one thread is dropped |
//! | `THREAD_ADVISOR_ENABLE_HISTORY` | true | Blend with historical aggregates |
//! | `THREAD_ADVISOR_OUTPUT_FORMAT` | json | `json` log line or `text` report |
//! | `THREAD_ADVISOR_ENV_CAP_VARS` | WORKER_MAX_THREADS,MAX_THREADS | Vars consulted for a host cap |
//! | `THREAD_ADVISOR_HISTORY_PATH` | (unset) | History aggregate JSON document |
//! | `THREAD_ADVISOR_POOL_SIZE` | (unset) | Resource pool size cap |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HARD_MAX_THREADS: u32 = 32;
pub const DEFAULT_CORE_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_THRESHOLD: f64 = 0.05;
pub const DEFAULT_MAX_AVG_STALL_MS: f64 = 85.0;
pub const DEFAULT_ENV_CAP_VARS: &[&str] = &["WORKER_MAX_THREADS", "MAX_THREADS"];

/// How advice records are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON line through the `tracing` pipeline.
    #[default]
    Json,
    /// Multi-line human report on stdout.
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "stdout" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

/// Errors from explicit config file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read by the cap resolver and recommender.
///
/// Set once by the host and passed into [`crate::ThreadAdvisor`]; nothing in
/// the crate reads configuration from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub hard_max_threads: u32,
    pub core_multiplier: f64,
    pub diminishing_return_threshold: f64,
    pub max_avg_stall_ms: f64,
    pub enable_history_blending: bool,
    pub output_format: OutputFormat,
    pub env_cap_vars: Vec<String>,
    pub history_path: Option<PathBuf>,
    pub pool_size: Option<u32>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            hard_max_threads: DEFAULT_HARD_MAX_THREADS,
            core_multiplier: DEFAULT_CORE_MULTIPLIER,
            diminishing_return_threshold: DEFAULT_THRESHOLD,
            max_avg_stall_ms: DEFAULT_MAX_AVG_STALL_MS,
            enable_history_blending: true,
            output_format: OutputFormat::Json,
            env_cap_vars: DEFAULT_ENV_CAP_VARS.iter().map(|s| s.to_string()).collect(),
            history_path: None,
            pool_size: None,
        }
    }
}

/// Parse a `u32` env var, returning `default` on missing or invalid.
fn parse_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Parse a finite `f64` env var, returning `default` on missing or invalid.
fn parse_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(default),
        Err(_) => default,
    }
}

/// Parse a boolean env var (`true/false/1/0/yes/no/on/off`).
fn parse_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Parse an optional `u32` env var. Invalid values count as unset.
fn parse_opt_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok()?.trim().parse::<u32>().ok()
}

fn parse_env_cap_vars() -> Vec<String> {
    match std::env::var("THREAD_ADVISOR_ENV_CAP_VARS") {
        Ok(val) => val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => AdvisorConfig::default().env_cap_vars,
    }
}

/// Load configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> AdvisorConfig {
    let hard_max_threads =
        parse_u32("THREAD_ADVISOR_HARD_MAX_THREADS", DEFAULT_HARD_MAX_THREADS).max(1);
    let output_format = std::env::var("THREAD_ADVISOR_OUTPUT_FORMAT")
        .ok()
        .and_then(|s| OutputFormat::parse(&s))
        .unwrap_or_default();
    let history_path = std::env::var("THREAD_ADVISOR_HISTORY_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    AdvisorConfig {
        hard_max_threads,
        core_multiplier: parse_f64("THREAD_ADVISOR_CORE_MULTIPLIER", DEFAULT_CORE_MULTIPLIER),
        diminishing_return_threshold: parse_f64("THREAD_ADVISOR_THRESHOLD", DEFAULT_THRESHOLD),
        max_avg_stall_ms: parse_f64("THREAD_ADVISOR_MAX_AVG_STALL_MS", DEFAULT_MAX_AVG_STALL_MS),
        enable_history_blending: parse_bool("THREAD_ADVISOR_ENABLE_HISTORY", true),
        output_format,
        env_cap_vars: parse_env_cap_vars(),
        history_path,
        pool_size: parse_opt_u32("THREAD_ADVISOR_POOL_SIZE"),
    }
}

impl AdvisorConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: AdvisorConfig = toml::from_str(s)?;
        cfg.hard_max_threads = cfg.hard_max_threads.max(1);
        Ok(cfg)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Raw value of the first configured env cap variable that is set.
    pub fn env_cap_raw(&self) -> Option<String> {
        self.env_cap_vars
            .iter()
            .find_map(|var| std::env::var(var).ok())
    }

    /// Settings that would make advice meaningless or surprising.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let t = self.diminishing_return_threshold;
        if !t.is_finite() || !(0.0..1.0).contains(&t) {
            warnings.push(format!(
                "diminishing_return_threshold ({}) should be in [0, 1)",
                t
            ));
        }
        if !(self.core_multiplier > 0.0) {
            warnings.push(format!(
                "core_multiplier ({}) <= 0 caps every recommendation at 1 thread",
                self.core_multiplier
            ));
        }
        if !(self.max_avg_stall_ms > 0.0) {
            warnings.push(format!(
                "max_avg_stall_ms ({}) <= 0 applies the stall penalty to every measured stall",
                self.max_avg_stall_ms
            ));
        }
        warnings
    }

    /// Effective values as `(env var, value)` pairs, for display.
    pub fn effective(&self) -> Vec<(&'static str, String)> {
        vec![
            ("THREAD_ADVISOR_HARD_MAX_THREADS", self.hard_max_threads.to_string()),
            ("THREAD_ADVISOR_CORE_MULTIPLIER", self.core_multiplier.to_string()),
            ("THREAD_ADVISOR_THRESHOLD", self.diminishing_return_threshold.to_string()),
            ("THREAD_ADVISOR_MAX_AVG_STALL_MS", self.max_avg_stall_ms.to_string()),
            ("THREAD_ADVISOR_ENABLE_HISTORY", self.enable_history_blending.to_string()),
            ("THREAD_ADVISOR_OUTPUT_FORMAT", self.output_format.as_str().to_string()),
            ("THREAD_ADVISOR_ENV_CAP_VARS", self.env_cap_vars.join(",")),
            (
                "THREAD_ADVISOR_HISTORY_PATH",
                self.history_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            (
                "THREAD_ADVISOR_POOL_SIZE",
                self.pool_size.map(|n| n.to_string()).unwrap_or_default(),
            ),
        ]
    }
}
