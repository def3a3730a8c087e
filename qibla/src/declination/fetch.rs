//! Fire-and-forget declination lookup.

use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::cell::DeclinationHandle;
use super::provider::{DeclinationError, DeclinationProvider};
use crate::geo::GeoCoordinate;

/// Default deadline for a declination lookup.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Current calendar year, used to pick the magnetic model epoch.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Starts a detached declination lookup for `coord`.
///
/// The provider runs on the blocking pool, bounded by `timeout`. On success
/// the value is written into `handle`; on failure the handle keeps whatever
/// it held before. The returned task handle is informational: nothing on the
/// heading path awaits it. Aborting it before completion discards the result.
pub fn spawn_declination_fetch(
    provider: Arc<dyn DeclinationProvider>,
    coord: GeoCoordinate,
    year: i32,
    handle: DeclinationHandle,
    timeout: Duration,
) -> JoinHandle<Result<f64, DeclinationError>> {
    tokio::spawn(async move {
        let provider_name = provider.name().to_string();
        let lookup = tokio::task::spawn_blocking(move || provider.fetch(&coord, year));

        let result = match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DeclinationError::Unavailable(join_error.to_string())),
            Err(_) => Err(DeclinationError::Timeout),
        };

        match &result {
            Ok(degrees) => {
                handle.set(*degrees);
                info!(
                    provider = %provider_name,
                    location = %coord,
                    declination = format!("{:.2}°", degrees),
                    "Declination updated"
                );
            }
            Err(e) => {
                debug!(
                    provider = %provider_name,
                    location = %coord,
                    error = %e,
                    fallback = handle.degrees(),
                    "Declination lookup failed, keeping last known value"
                );
            }
        }

        result
    })
}
