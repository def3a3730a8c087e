//! Shared setup for commands that do real work.

use tracing::info;

use qibla::config::ConfigFile;
use qibla::logging::{init_logging, LoggingConfig, LoggingGuard};

use crate::error::CliError;

/// Loaded configuration plus active logging.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the config file and install logging. `verbose` forces debug level.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let mut logging = LoggingConfig::from_config(&config);
        if verbose {
            logging = logging.with_level("debug");
        }
        let guard = init_logging(&logging)?;

        Ok(Self {
            config,
            _logging: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(version = qibla::VERSION, command, "Qibla starting");
    }
}
