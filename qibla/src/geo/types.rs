//! Coordinate types and errors.

use std::fmt;

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Location of the Kaaba in Mecca, the target of every Qibla bearing.
pub const KAABA: GeoCoordinate = GeoCoordinate {
    latitude: 21.4225,
    longitude: 39.8264,
};

/// Errors raised when a coordinate falls outside the valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A geographic position in decimal degrees.
///
/// Captured once per location fix and never mutated; a new fix produces a
/// new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Create a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Check the latitude/longitude range invariant.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(CoordError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(CoordError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{} {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Eight-point compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    /// Classify a heading into its 45° sector.
    ///
    /// Sectors are centred on each point, so north covers [337.5, 22.5).
    pub fn from_degrees(degrees: f64) -> Self {
        let deg = super::normalize_degrees(degrees);
        match deg {
            d if (22.5..67.5).contains(&d) => CompassPoint::NE,
            d if (67.5..112.5).contains(&d) => CompassPoint::E,
            d if (112.5..157.5).contains(&d) => CompassPoint::SE,
            d if (157.5..202.5).contains(&d) => CompassPoint::S,
            d if (202.5..247.5).contains(&d) => CompassPoint::SW,
            d if (247.5..292.5).contains(&d) => CompassPoint::W,
            d if (292.5..337.5).contains(&d) => CompassPoint::NW,
            _ => CompassPoint::N,
        }
    }

    /// Short label for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let coord = GeoCoordinate::new(40.7128, -74.0060).unwrap();
        assert_eq!(coord.latitude, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
    }

    #[test]
    fn test_range_edges_are_valid() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert_eq!(
            GeoCoordinate::new(90.5, 0.0),
            Err(CoordError::InvalidLatitude(90.5))
        );
        assert!(matches!(
            GeoCoordinate::new(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_invalid_longitude() {
        assert_eq!(
            GeoCoordinate::new(0.0, -180.1),
            Err(CoordError::InvalidLongitude(-180.1))
        );
        assert!(matches!(
            GeoCoordinate::new(0.0, f64::INFINITY),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_kaaba_is_valid() {
        assert!(KAABA.validate().is_ok());
    }

    #[test]
    fn test_display() {
        let coord = GeoCoordinate::new(40.7128, -74.0060).unwrap();
        assert_eq!(coord.to_string(), "40.7128°N 74.0060°W");
    }

    #[test]
    fn test_compass_point_sectors() {
        assert_eq!(CompassPoint::from_degrees(0.0), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(22.4), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(22.5), CompassPoint::NE);
        assert_eq!(CompassPoint::from_degrees(90.0), CompassPoint::E);
        assert_eq!(CompassPoint::from_degrees(180.0), CompassPoint::S);
        assert_eq!(CompassPoint::from_degrees(225.0), CompassPoint::SW);
        assert_eq!(CompassPoint::from_degrees(292.5), CompassPoint::NW);
        assert_eq!(CompassPoint::from_degrees(337.5), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(-45.0), CompassPoint::NW);
    }
}
