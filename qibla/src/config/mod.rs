//! Configuration file support.
//!
//! Settings live in an INI file at `~/.config/qibla/config.ini`:
//!
//! ```ini
//! [location]
//! latitude = 40.7128
//! longitude = -74.0060
//!
//! [heading]
//! smoothing_factor = 0.15
//! vector_offset = 0
//!
//! [alignment]
//! aligned_threshold = 10
//! close_threshold = 20
//! emit_hysteresis = 4
//!
//! [declination]
//! enabled = true
//! api_key =
//! timeout_secs = 5
//! fixed =
//!
//! [logging]
//! directory =
//! level = info
//! ```
//!
//! Missing sections and keys fall back to defaults.

mod file;
mod keys;

pub use file::{
    config_file_path, AlignmentSettings, ConfigError, ConfigFile, DeclinationSettings,
    HeadingSettings, LocationSettings, LoggingSettings, DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
