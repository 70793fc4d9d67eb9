//! Subscriber setup for advisor logs.
//!
//! JSON advice records travel through this subscriber, so the JSON format is
//! the default. Output goes to stderr unless a log file is configured, which
//! keeps stdout free for text reports.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive, e.g. `info` or `thread_advisor=trace`.
pub const LOG_ENV_VAR: &str = "THREAD_ADVISOR_LOG";
/// `json` or `pretty`.
pub const LOG_FORMAT_ENV_VAR: &str = "THREAD_ADVISOR_LOG_FORMAT";
/// Path of a file that receives logs instead of stderr.
pub const LOG_FILE_ENV_VAR: &str = "THREAD_ADVISOR_LOG_FILE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable events.
    Pretty,
}

impl LogFormat {
    /// Case-insensitive `json` / `pretty`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: String,
    /// Log file; `None` writes to stderr.
    pub output_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            output_path: None,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by the `THREAD_ADVISOR_LOG*` variables.
    ///
    /// Blank or unrecognized values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = non_blank_var(LOG_ENV_VAR) {
            config.level = level;
        }
        if let Some(raw) = non_blank_var(LOG_FORMAT_ENV_VAR) {
            config.format = LogFormat::parse(&raw).unwrap_or_default();
        }
        if let Some(path) = non_blank_var(LOG_FILE_ENV_VAR) {
            config.output_path = Some(PathBuf::from(path));
        }
        config
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Failed to open log file: {0}")]
    FileOpen(String),
    #[error("Subscriber already initialized")]
    AlreadyInitialized,
}

/// Install the global subscriber. Only the first successful call takes effect.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter =
        EnvFilter::try_new(&config.level).map_err(|e| LogError::InvalidFilter(e.to_string()))?;
    let layer = fmt::layer().with_writer(make_writer(config.output_path.as_deref())?);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
    };
    installed.map_err(|_| LogError::AlreadyInitialized)
}

fn make_writer(path: Option<&Path>) -> Result<BoxMakeWriter, LogError> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| LogError::FileOpen(format!("{}: {}", path.display(), e)))?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::ENV_LOCK;

    fn clear_env() {
        for key in [LOG_ENV_VAR, LOG_FORMAT_ENV_VAR, LOG_FILE_ENV_VAR] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" Pretty "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("yaml"), None);
    }

    #[test]
    fn test_from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let config = LogConfig::from_env();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_from_env_reads_format_and_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(LOG_ENV_VAR, "thread_advisor=debug");
        std::env::set_var(LOG_FORMAT_ENV_VAR, "pretty");
        std::env::set_var(LOG_FILE_ENV_VAR, "/tmp/advisor.log");

        let config = LogConfig::from_env();
        clear_env();

        assert_eq!(config.level, "thread_advisor=debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output_path, Some(PathBuf::from("/tmp/advisor.log")));
    }

    #[test]
    fn test_from_env_ignores_unknown_format() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(LOG_FORMAT_ENV_VAR, "xml");
        let config = LogConfig::from_env();
        clear_env();
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_unwritable_file_fails_before_install() {
        let config = LogConfig {
            output_path: Some(PathBuf::from("/nonexistent/dir/advisor.log")),
            ..LogConfig::default()
        };
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, LogError::FileOpen(ref msg) if msg.contains("/nonexistent/dir")));
    }
}
