//! Addressable configuration keys for `config get/set/list`.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};

/// A single `section.key` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    LocationLatitude,
    LocationLongitude,
    HeadingSmoothingFactor,
    HeadingVectorOffset,
    AlignmentAlignedThreshold,
    AlignmentCloseThreshold,
    AlignmentEmitHysteresis,
    DeclinationEnabled,
    DeclinationApiKey,
    DeclinationTimeoutSecs,
    DeclinationFixed,
    LoggingDirectory,
    LoggingLevel,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::LocationLatitude,
    ConfigKey::LocationLongitude,
    ConfigKey::HeadingSmoothingFactor,
    ConfigKey::HeadingVectorOffset,
    ConfigKey::AlignmentAlignedThreshold,
    ConfigKey::AlignmentCloseThreshold,
    ConfigKey::AlignmentEmitHysteresis,
    ConfigKey::DeclinationEnabled,
    ConfigKey::DeclinationApiKey,
    ConfigKey::DeclinationTimeoutSecs,
    ConfigKey::DeclinationFixed,
    ConfigKey::LoggingDirectory,
    ConfigKey::LoggingLevel,
];

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Dotted name, e.g. `heading.smoothing_factor`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LocationLatitude => "location.latitude",
            ConfigKey::LocationLongitude => "location.longitude",
            ConfigKey::HeadingSmoothingFactor => "heading.smoothing_factor",
            ConfigKey::HeadingVectorOffset => "heading.vector_offset",
            ConfigKey::AlignmentAlignedThreshold => "alignment.aligned_threshold",
            ConfigKey::AlignmentCloseThreshold => "alignment.close_threshold",
            ConfigKey::AlignmentEmitHysteresis => "alignment.emit_hysteresis",
            ConfigKey::DeclinationEnabled => "declination.enabled",
            ConfigKey::DeclinationApiKey => "declination.api_key",
            ConfigKey::DeclinationTimeoutSecs => "declination.timeout_secs",
            ConfigKey::DeclinationFixed => "declination.fixed",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingLevel => "logging.level",
        }
    }

    /// Current value as text (empty when unset).
    pub fn get(&self, config: &ConfigFile) -> String {
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        match self {
            ConfigKey::LocationLatitude => opt(config.location.latitude),
            ConfigKey::LocationLongitude => opt(config.location.longitude),
            ConfigKey::HeadingSmoothingFactor => config.heading.smoothing_factor.to_string(),
            ConfigKey::HeadingVectorOffset => config.heading.vector_offset.to_string(),
            ConfigKey::AlignmentAlignedThreshold => config.alignment.aligned_threshold.to_string(),
            ConfigKey::AlignmentCloseThreshold => config.alignment.close_threshold.to_string(),
            ConfigKey::AlignmentEmitHysteresis => config.alignment.emit_hysteresis.to_string(),
            ConfigKey::DeclinationEnabled => config.declination.enabled.to_string(),
            ConfigKey::DeclinationApiKey => config.declination.api_key.clone().unwrap_or_default(),
            ConfigKey::DeclinationTimeoutSecs => config.declination.timeout_secs.to_string(),
            ConfigKey::DeclinationFixed => opt(config.declination.fixed),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Set from text. An empty value clears optional settings.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
        };
        let number = || value.parse::<f64>().map_err(|_| invalid());
        let optional_number = || -> Result<Option<f64>, ConfigError> {
            if value.is_empty() {
                Ok(None)
            } else {
                number().map(Some)
            }
        };

        match self {
            ConfigKey::LocationLatitude => {
                let lat = optional_number()?;
                if lat.is_some_and(|v| !(-90.0..=90.0).contains(&v)) {
                    return Err(invalid());
                }
                config.location.latitude = lat;
            }
            ConfigKey::LocationLongitude => {
                let lon = optional_number()?;
                if lon.is_some_and(|v| !(-180.0..=180.0).contains(&v)) {
                    return Err(invalid());
                }
                config.location.longitude = lon;
            }
            ConfigKey::HeadingSmoothingFactor => {
                let alpha = number()?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(invalid());
                }
                config.heading.smoothing_factor = alpha;
            }
            ConfigKey::HeadingVectorOffset => config.heading.vector_offset = number()?,
            ConfigKey::AlignmentAlignedThreshold => config.alignment.aligned_threshold = number()?,
            ConfigKey::AlignmentCloseThreshold => config.alignment.close_threshold = number()?,
            ConfigKey::AlignmentEmitHysteresis => config.alignment.emit_hysteresis = number()?,
            ConfigKey::DeclinationEnabled => {
                config.declination.enabled = match value.to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            ConfigKey::DeclinationApiKey => {
                config.declination.api_key = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::DeclinationTimeoutSecs => {
                config.declination.timeout_secs = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::DeclinationFixed => config.declination.fixed = optional_number()?,
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(invalid());
                }
                config.logging.level = value.to_string();
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
