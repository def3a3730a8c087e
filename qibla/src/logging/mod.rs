//! Logging setup.
//!
//! Installs a `tracing` subscriber that writes human-readable lines to
//! stderr and, when a directory is configured, to a daily rolling file.
//! `RUST_LOG` overrides the configured level.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigFile;

/// Prefix of rolling log file names.
pub const DEFAULT_LOG_FILE_PREFIX: &str = "qibla";

const TIMESTAMP_FORMAT: &str = "[hour]:[minute]:[second].[subsecond digits:3]";

/// Logging errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to open log directory {path}: {reason}")]
    Appender { path: PathBuf, reason: String },

    #[error("Invalid timestamp format: {0}")]
    TimeFormat(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `qibla=debug`.
    pub level: String,
    /// Directory for rolling log files.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    /// Let `RUST_LOG` override `level`.
    pub env_override: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::config::DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
            file_prefix: DEFAULT_LOG_FILE_PREFIX.to_string(),
            env_override: true,
        }
    }
}

impl LoggingConfig {
    /// Logging settings from the configuration file.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            level: config.logging.level.clone(),
            directory: config.logging.directory.clone(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// Keeps the file writer flushing. Hold it until the process exits.
#[derive(Debug)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
    log_file_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Directory receiving log files, if file logging is active.
    pub fn log_file_dir(&self) -> Option<&PathBuf> {
        self.log_file_dir.as_ref()
    }
}

/// Build the level filter for `config`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if config.env_override {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        filter: config.level.clone(),
        reason: e.to_string(),
    })
}

fn file_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| LoggingError::Appender {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = build_filter(config)?;
    let timer = LocalTime::new(
        time::format_description::parse(TIMESTAMP_FORMAT)
            .map_err(|e| LoggingError::TimeFormat(e.to_string()))?,
    );

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_target(false);

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = file_appender(dir, &config.file_prefix)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard {
        _file: guard,
        log_file_dir: config.directory.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.file_prefix, "qibla");
        assert!(config.directory.is_none());
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.logging.level = "debug".to_string();
        file.logging.directory = Some(PathBuf::from("/var/log/qibla"));

        let config = LoggingConfig::from_config(&file);
        assert_eq!(config.level, "debug");
        assert_eq!(config.directory, Some(PathBuf::from("/var/log/qibla")));
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        let config = LoggingConfig {
            env_override: false,
            ..LoggingConfig::default().with_level("warn,qibla=trace")
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let config = LoggingConfig {
            env_override: false,
            ..LoggingConfig::default().with_level("qibla=loud")
        };
        assert!(matches!(
            build_filter(&config),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        assert!(file_appender(&logs, "qibla").is_ok());
        assert!(logs.is_dir());
    }

    #[test]
    fn test_timestamp_format_parses() {
        assert!(time::format_description::parse(TIMESTAMP_FORMAT).is_ok());
    }
}
