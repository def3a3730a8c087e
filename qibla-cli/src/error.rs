//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use qibla::compass::CompassError;
use qibla::config::ConfigError;
use qibla::geo::CoordError;
use qibla::logging::LoggingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Coordinate(#[from] CoordError),

    #[error("Compass failed to start: {0}")]
    Compass(#[from] CompassError),

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create async runtime: {0}")]
    RuntimeCreation(std::io::Error),
}
