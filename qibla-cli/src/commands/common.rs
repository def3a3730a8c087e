//! Common helpers shared across CLI commands.

use qibla::config::ConfigFile;
use qibla::geo::GeoCoordinate;

use crate::error::CliError;

/// Resolve the observer position: CLI arguments first, then config.
///
/// Latitude and longitude must be given together.
pub fn resolve_location(
    lat: Option<f64>,
    lon: Option<f64>,
    config: &ConfigFile,
) -> Result<GeoCoordinate, CliError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(GeoCoordinate::new(lat, lon)?),
        (Some(_), None) | (None, Some(_)) => Err(CliError::Config(
            "--lat and --lon must be given together".to_string(),
        )),
        (None, None) => config.location()?.ok_or_else(|| {
            CliError::Config(
                "No location. Pass --lat and --lon, or set location.latitude and \
                 location.longitude with 'qibla config set'."
                    .to_string(),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(lat: f64, lon: f64) -> ConfigFile {
        let mut config = ConfigFile::default();
        config.location.latitude = Some(lat);
        config.location.longitude = Some(lon);
        config
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = config_at(51.5, -0.1);
        let coord = resolve_location(Some(21.0), Some(40.0), &config).unwrap();
        assert_eq!(coord, GeoCoordinate::new(21.0, 40.0).unwrap());
    }

    #[test]
    fn test_falls_back_to_config() {
        let config = config_at(51.5, -0.1);
        let coord = resolve_location(None, None, &config).unwrap();
        assert_eq!(coord.latitude, 51.5);
    }

    #[test]
    fn test_half_pair_rejected() {
        let config = config_at(51.5, -0.1);
        assert!(matches!(
            resolve_location(Some(10.0), None, &config),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_missing_location() {
        assert!(matches!(
            resolve_location(None, None, &ConfigFile::default()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_argument() {
        assert!(matches!(
            resolve_location(Some(91.0), Some(0.0), &ConfigFile::default()),
            Err(CliError::Coordinate(_))
        ));
    }
}
