//! INI configuration file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::alignment::{
    AlignmentConfig, ALIGNED_THRESHOLD_DEG, CLOSE_THRESHOLD_DEG, EMIT_HYSTERESIS_DEG,
};
use crate::compass::CompassConfig;
use crate::declination::{
    DeclinationProvider, FixedDeclinationProvider, NoaaDeclinationProvider, ReqwestClient,
    DEFAULT_FETCH_TIMEOUT,
};
use crate::geo::{CoordError, GeoCoordinate};
use crate::heading::{ReconcilerConfig, DEFAULT_SMOOTHING_FACTOR, DEFAULT_VECTOR_OFFSET_DEG};

/// Default log level when neither config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] CoordError),
}

/// `[location]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `[heading]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingSettings {
    pub smoothing_factor: f64,
    pub vector_offset: f64,
}

impl Default for HeadingSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            vector_offset: DEFAULT_VECTOR_OFFSET_DEG,
        }
    }
}

/// `[alignment]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSettings {
    pub aligned_threshold: f64,
    pub close_threshold: f64,
    pub emit_hysteresis: f64,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            aligned_threshold: ALIGNED_THRESHOLD_DEG,
            close_threshold: CLOSE_THRESHOLD_DEG,
            emit_hysteresis: EMIT_HYSTERESIS_DEG,
        }
    }
}

/// `[declination]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclinationSettings {
    /// Look up declination over the network.
    pub enabled: bool,
    /// NOAA geomagnetic calculator key.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Known declination; when set, no network lookup is made.
    pub fixed: Option<f64>,
}

impl Default for DeclinationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            fixed: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub heading: HeadingSettings,
    pub alignment: AlignmentSettings,
    pub declination: DeclinationSettings,
    pub logging: LoggingSettings,
}

/// Default path of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qibla")
        .join("config.ini")
}

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: format!("{}.{}", section, key),
        value: value.to_string(),
    })
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: format!("{}.{}", section, key),
            value: value.to_string(),
        }),
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl ConfigFile {
    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("location")) {
            if let Some(v) = section.get("latitude").and_then(non_empty) {
                config.location.latitude = Some(parse_value("location", "latitude", v)?);
            }
            if let Some(v) = section.get("longitude").and_then(non_empty) {
                config.location.longitude = Some(parse_value("location", "longitude", v)?);
            }
        }

        if let Some(section) = ini.section(Some("heading")) {
            if let Some(v) = section.get("smoothing_factor") {
                config.heading.smoothing_factor = parse_value("heading", "smoothing_factor", v)?;
            }
            if let Some(v) = section.get("vector_offset") {
                config.heading.vector_offset = parse_value("heading", "vector_offset", v)?;
            }
        }

        if let Some(section) = ini.section(Some("alignment")) {
            if let Some(v) = section.get("aligned_threshold") {
                config.alignment.aligned_threshold =
                    parse_value("alignment", "aligned_threshold", v)?;
            }
            if let Some(v) = section.get("close_threshold") {
                config.alignment.close_threshold = parse_value("alignment", "close_threshold", v)?;
            }
            if let Some(v) = section.get("emit_hysteresis") {
                config.alignment.emit_hysteresis = parse_value("alignment", "emit_hysteresis", v)?;
            }
        }

        if let Some(section) = ini.section(Some("declination")) {
            if let Some(v) = section.get("enabled") {
                config.declination.enabled = parse_bool("declination", "enabled", v)?;
            }
            if let Some(v) = section.get("api_key") {
                config.declination.api_key = non_empty(v).map(str::to_string);
            }
            if let Some(v) = section.get("timeout_secs") {
                config.declination.timeout_secs = parse_value("declination", "timeout_secs", v)?;
            }
            if let Some(v) = section.get("fixed").and_then(non_empty) {
                config.declination.fixed = Some(parse_value("declination", "fixed", v)?);
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = section.get("directory") {
                config.logging.directory = non_empty(v).map(PathBuf::from);
            }
            if let Some(v) = section.get("level").and_then(non_empty) {
                config.logging.level = v.to_string();
            }
        }

        Ok(config)
    }

    /// Render as INI.
    pub fn to_ini(&self) -> Ini {
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

        let mut ini = Ini::new();
        ini.with_section(Some("location"))
            .set("latitude", opt(self.location.latitude))
            .set("longitude", opt(self.location.longitude));
        ini.with_section(Some("heading"))
            .set("smoothing_factor", self.heading.smoothing_factor.to_string())
            .set("vector_offset", self.heading.vector_offset.to_string());
        ini.with_section(Some("alignment"))
            .set("aligned_threshold", self.alignment.aligned_threshold.to_string())
            .set("close_threshold", self.alignment.close_threshold.to_string())
            .set("emit_hysteresis", self.alignment.emit_hysteresis.to_string());
        ini.with_section(Some("declination"))
            .set("enabled", self.declination.enabled.to_string())
            .set("api_key", self.declination.api_key.clone().unwrap_or_default())
            .set("timeout_secs", self.declination.timeout_secs.to_string())
            .set("fixed", opt(self.declination.fixed));
        ini.with_section(Some("logging"))
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )
            .set("level", self.logging.level.clone());
        ini
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_ini().write_to_file(path)?;
        Ok(())
    }

    /// Configured observer position, if both coordinates are set.
    pub fn location(&self) -> Result<Option<GeoCoordinate>, ConfigError> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Ok(Some(GeoCoordinate::new(lat, lon)?)),
            _ => Ok(None),
        }
    }

    /// Compass session settings.
    pub fn compass_config(&self) -> CompassConfig {
        CompassConfig {
            reconciler: ReconcilerConfig::default()
                .with_smoothing_factor(self.heading.smoothing_factor)
                .with_vector_offset(self.heading.vector_offset),
            alignment: AlignmentConfig {
                aligned_threshold_deg: self.alignment.aligned_threshold,
                close_threshold_deg: self.alignment.close_threshold,
                emit_hysteresis_deg: self.alignment.emit_hysteresis,
            },
            declination_timeout: Duration::from_secs(self.declination.timeout_secs),
        }
    }

    /// Declination source implied by the settings.
    ///
    /// A fixed value wins over a network lookup. Returns `None` when lookups
    /// are disabled or no API key is configured.
    pub fn declination_provider(&self) -> Option<Arc<dyn DeclinationProvider>> {
        if let Some(fixed) = self.declination.fixed {
            return Some(Arc::new(FixedDeclinationProvider::new(fixed)));
        }
        if !self.declination.enabled {
            return None;
        }
        let api_key = self.declination.api_key.as_deref()?;
        match ReqwestClient::with_timeout(self.declination.timeout_secs) {
            Ok(client) => Some(Arc::new(NoaaDeclinationProvider::new(client, api_key))),
            Err(e) => {
                tracing::warn!(error = %e, "Declination lookups disabled");
                None
            }
        }
    }
}
