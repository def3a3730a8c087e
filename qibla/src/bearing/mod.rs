//! Qibla bearing calculation.
//!
//! Computes the initial great-circle bearing (forward azimuth) from an
//! observer to the Kaaba. The bearing is computed once per location fix and
//! replaced wholesale when a new fix arrives.
//!
//! # Example
//!
//! ```ignore
//! use qibla::bearing::compute_bearing;
//! use qibla::geo::GeoCoordinate;
//!
//! let nyc = GeoCoordinate::new(40.7128, -74.0060)?;
//! let bearing = compute_bearing(&nyc)?;
//! println!("Qibla: {:.2}°", bearing.degrees()); // ~58.48°
//! ```

use std::fmt;

use crate::geo::{normalize_degrees, CompassPoint, CoordError, GeoCoordinate, KAABA};

/// Observer positions closer than this to the target (in degrees on both
/// axes) are treated as being at the target.
const COINCIDENT_EPSILON_DEG: f64 = 1e-9;

/// Compass bearing in degrees, normalized to [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Bearing(f64);

impl Bearing {
    /// Wrap a raw angle, normalizing it to [0, 360).
    pub fn from_degrees(degrees: f64) -> Self {
        Self(normalize_degrees(degrees))
    }

    /// Bearing in degrees.
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Nearest eight-point compass direction.
    pub fn compass_point(&self) -> CompassPoint {
        CompassPoint::from_degrees(self.0)
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

/// Computes the Qibla bearing for an observer.
///
/// Returns `CoordError` when the observer is outside the valid coordinate
/// range. An observer standing at the Kaaba gets a bearing of 0.
pub fn compute_bearing(observer: &GeoCoordinate) -> Result<Bearing, CoordError> {
    bearing_to(observer, &KAABA)
}

/// Initial great-circle bearing from `observer` to `target`.
pub fn bearing_to(observer: &GeoCoordinate, target: &GeoCoordinate) -> Result<Bearing, CoordError> {
    observer.validate()?;
    target.validate()?;

    if (observer.latitude - target.latitude).abs() < COINCIDENT_EPSILON_DEG
        && (observer.longitude - target.longitude).abs() < COINCIDENT_EPSILON_DEG
    {
        return Ok(Bearing(0.0));
    }

    let phi1 = observer.latitude.to_radians();
    let lambda1 = observer.longitude.to_radians();
    let phi2 = target.latitude.to_radians();
    let lambda2 = target.longitude.to_radians();
    let delta_lambda = lambda2 - lambda1;

    let theta = delta_lambda.sin().atan2(
        phi1.cos() * phi2.tan() - phi1.sin() * delta_lambda.cos(),
    );

    Ok(Bearing::from_degrees(theta.to_degrees()))
}

/// Rotation to apply to a compass dial so its north mark points north while
/// the device faces `heading`.
pub fn dial_rotation(heading: f64) -> f64 {
    normalize_degrees(360.0 - heading)
}

/// Rotation of the Qibla marker on a dial rotated by [`dial_rotation`].
pub fn target_rotation(heading: f64, bearing: Bearing) -> f64 {
    normalize_degrees(dial_rotation(heading) + bearing.degrees())
}
