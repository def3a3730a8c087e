//! Declination provider trait and error type.

use thiserror::Error;

use crate::geo::GeoCoordinate;

/// Errors from a declination lookup.
///
/// None of these reach the user: a failed lookup leaves the last known
/// declination (or zero) in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeclinationError {
    /// Transport or HTTP status failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response could not be decoded or held an implausible value.
    #[error("Invalid declination response: {0}")]
    Parse(String),

    /// Lookup did not finish within its deadline.
    #[error("Declination lookup timed out")]
    Timeout,

    /// No provider is configured or the provider refused the request.
    #[error("Declination unavailable: {0}")]
    Unavailable(String),
}

/// Source of magnetic declination values.
///
/// Implementations may block (network I/O); callers run them off the
/// heading path.
pub trait DeclinationProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Declination in degrees (east positive) at `coord` for `year`.
    fn fetch(&self, coord: &GeoCoordinate, year: i32) -> Result<f64, DeclinationError>;
}

/// Check that a provider value is a usable declination.
pub(crate) fn validate_declination(degrees: f64) -> Result<f64, DeclinationError> {
    if !degrees.is_finite() || !(-180.0..=180.0).contains(&degrees) {
        return Err(DeclinationError::Parse(format!(
            "declination {} out of range",
            degrees
        )));
    }
    Ok(degrees)
}

/// Provider returning a constant declination.
///
/// Used when the user configures a known value or runs offline.
#[derive(Debug, Clone)]
pub struct FixedDeclinationProvider {
    degrees: f64,
}

impl FixedDeclinationProvider {
    pub fn new(degrees: f64) -> Self {
        Self { degrees }
    }
}

impl DeclinationProvider for FixedDeclinationProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(&self, _coord: &GeoCoordinate, _year: i32) -> Result<f64, DeclinationError> {
        validate_declination(self.degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_provider() {
        let provider = FixedDeclinationProvider::new(-13.2);
        let coord = GeoCoordinate::new(40.7, -74.0).unwrap();
        assert_eq!(provider.fetch(&coord, 2025), Ok(-13.2));
        assert_eq!(provider.name(), "fixed");
    }

    #[test]
    fn test_fixed_provider_rejects_nonsense() {
        let provider = FixedDeclinationProvider::new(f64::NAN);
        let coord = GeoCoordinate::new(0.0, 0.0).unwrap();
        assert!(matches!(
            provider.fetch(&coord, 2025),
            Err(DeclinationError::Parse(_))
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DeclinationError::Timeout.to_string(),
            "Declination lookup timed out"
        );
        assert!(DeclinationError::Http("503".to_string())
            .to_string()
            .contains("503"));
    }
}
