//! Device location seam.
//!
//! The compass needs one coordinate per session. Where it comes from (GPS,
//! network, a configured value) is up to the [`LocationProvider`].

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::geo::GeoCoordinate;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors from a location request.
///
/// Both are recoverable: the compass keeps any earlier bearing and waits for
/// the user to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user declined location access.
    #[error("Location permission not granted")]
    PermissionDenied,

    /// No fix could be obtained.
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the observer's position.
pub trait LocationProvider: Send + Sync {
    /// Resolve the current coordinate once.
    fn current_coordinate(&self) -> BoxFuture<'_, Result<GeoCoordinate, LocationError>>;
}

/// Location provider returning a preconfigured coordinate.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    coordinate: Option<GeoCoordinate>,
}

impl FixedLocation {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
        }
    }

    /// A provider with no coordinate; every request fails as unavailable.
    pub fn unset() -> Self {
        Self { coordinate: None }
    }
}

impl LocationProvider for FixedLocation {
    fn current_coordinate(&self) -> BoxFuture<'_, Result<GeoCoordinate, LocationError>> {
        let result = self
            .coordinate
            .ok_or_else(|| LocationError::Unavailable("no location configured".to_string()));
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_location() {
        let coord = GeoCoordinate::new(33.5, 36.3).unwrap();
        let provider = FixedLocation::new(coord);
        assert_eq!(provider.current_coordinate().await, Ok(coord));
    }

    #[tokio::test]
    async fn test_unset_location() {
        let provider = FixedLocation::unset();
        assert!(matches!(
            provider.current_coordinate().await,
            Err(LocationError::Unavailable(_))
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission not granted"
        );
    }
}
