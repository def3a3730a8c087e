//! The compass session state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{CompassError, CompassReading, CompassStatus, RunSummary};
use crate::alignment::{evaluate_with, AlignmentConfig};
use crate::bearing::{compute_bearing, dial_rotation, target_rotation, Bearing};
use crate::declination::{
    spawn_declination_fetch, DeclinationError, DeclinationHandle, DeclinationProvider,
    DEFAULT_FETCH_TIMEOUT,
};
use crate::geo::{CoordError, GeoCoordinate};
use crate::haptics::HapticSink;
use crate::heading::{HeadingReconciler, HeadingSample, ReconcilerConfig};
use crate::location::{LocationError, LocationProvider};
use crate::sensor::{HeadingSensor, HeadingSubscription, SensorError};

/// Configuration for a compass session.
#[derive(Debug, Clone)]
pub struct CompassConfig {
    pub reconciler: ReconcilerConfig,
    pub alignment: AlignmentConfig,
    /// Deadline for each declination lookup.
    pub declination_timeout: Duration,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            reconciler: ReconcilerConfig::default(),
            alignment: AlignmentConfig::default(),
            declination_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// One active Qibla compass view.
///
/// Owns the bearing, the heading smoothing state and the last emitted
/// alignment gap. All updates happen through `&mut self`, one sample at a
/// time, in arrival order.
///
/// # Lifecycle
///
/// ```text
/// Pending ──[location fix]──► Ready ──[location error]──► LocationError
///    │                          ▲                              │
///    │                          └────────[location fix]────────┘
///    └──[no sensor]──► SensorUnavailable (idle)
/// ```
pub struct QiblaCompass<H: HapticSink> {
    config: CompassConfig,
    haptics: H,
    reconciler: HeadingReconciler,
    status: CompassStatus,
    location: Option<GeoCoordinate>,
    bearing: Option<Bearing>,
    last_emitted_delta: Option<f64>,
    focused: bool,
    declination_source: Option<(Arc<dyn DeclinationProvider>, i32)>,
    declination_task: Option<JoinHandle<Result<f64, DeclinationError>>>,
}

impl<H: HapticSink> std::fmt::Debug for QiblaCompass<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiblaCompass")
            .field("status", &self.status)
            .field("location", &self.location)
            .field("bearing", &self.bearing)
            .field("heading", &self.reconciler.current())
            .field("last_emitted_delta", &self.last_emitted_delta)
            .field("focused", &self.focused)
            .finish()
    }
}

impl<H: HapticSink> QiblaCompass<H> {
    /// Create a session with its own declination cell.
    pub fn new(config: CompassConfig, haptics: H) -> Self {
        Self::with_declination(config, haptics, DeclinationHandle::new())
    }

    /// Create a session reading declination from an existing cell.
    pub fn with_declination(
        config: CompassConfig,
        haptics: H,
        declination: DeclinationHandle,
    ) -> Self {
        let reconciler = HeadingReconciler::new(config.reconciler.clone(), declination);
        Self {
            config,
            haptics,
            reconciler,
            status: CompassStatus::Pending,
            location: None,
            bearing: None,
            last_emitted_delta: None,
            focused: true,
            declination_source: None,
            declination_task: None,
        }
    }

    pub fn status(&self) -> &CompassStatus {
        &self.status
    }

    pub fn bearing(&self) -> Option<Bearing> {
        self.bearing
    }

    pub fn location(&self) -> Option<GeoCoordinate> {
        self.location
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn last_emitted_delta(&self) -> Option<f64> {
        self.last_emitted_delta
    }

    pub fn declination_handle(&self) -> &DeclinationHandle {
        self.reconciler.declination_handle()
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    /// Start a session: check the sensor, fix the location, compute the
    /// bearing, kick off the declination lookup and subscribe to headings.
    ///
    /// The declination provider is kept for the session; every later
    /// [`Self::on_location_fix`] looks declination up again.
    ///
    /// Failures are also recorded in [`Self::status`] so a view can render
    /// them; the caller retries by calling this again.
    pub async fn initialize(
        &mut self,
        location: &dyn LocationProvider,
        sensor: &dyn HeadingSensor,
        declination: Option<Arc<dyn DeclinationProvider>>,
        year: i32,
    ) -> Result<HeadingSubscription, CompassError> {
        if !sensor.is_available() {
            self.on_sensor_unavailable();
            return Err(SensorError::Unavailable.into());
        }

        self.declination_source = declination.map(|provider| (provider, year));

        let coord = match location.current_coordinate().await {
            Ok(coord) => coord,
            Err(e) => {
                self.on_location_error(e.clone());
                return Err(e.into());
            }
        };

        self.on_location_fix(coord)?;

        sensor.subscribe().map_err(|e| {
            if e == SensorError::Unavailable {
                self.on_sensor_unavailable();
            }
            CompassError::from(e)
        })
    }

    /// Record a new location fix, recompute the bearing and, when the session
    /// has a declination provider, start a lookup for the new position.
    ///
    /// An invalid coordinate is rejected and the previous bearing kept. With
    /// a provider set this must run inside a Tokio runtime.
    pub fn on_location_fix(&mut self, coord: GeoCoordinate) -> Result<Bearing, CoordError> {
        let bearing = match compute_bearing(&coord) {
            Ok(bearing) => bearing,
            Err(e) => {
                warn!(error = %e, "Rejected location fix");
                return Err(e);
            }
        };

        info!(
            location = %coord,
            bearing = %bearing,
            direction = %bearing.compass_point(),
            "Qibla bearing computed"
        );

        self.location = Some(coord);
        self.bearing = Some(bearing);
        self.last_emitted_delta = None;
        if self.status != CompassStatus::SensorUnavailable {
            self.status = CompassStatus::Ready;
        }
        if let Some((provider, year)) = self.declination_source.clone() {
            self.start_declination_fetch(provider, year);
        }
        Ok(bearing)
    }

    /// Record a failed location request. Any earlier bearing stays in use.
    pub fn on_location_error(&mut self, error: LocationError) {
        warn!(error = %error, has_bearing = self.bearing.is_some(), "Location request failed");
        if self.status != CompassStatus::SensorUnavailable {
            self.status = CompassStatus::LocationError(error);
        }
    }

    /// Record that no heading source exists. Reported once; the session
    /// then ignores samples.
    pub fn on_sensor_unavailable(&mut self) {
        if self.status == CompassStatus::SensorUnavailable {
            return;
        }
        warn!("Compass sensor unavailable, heading updates disabled");
        self.status = CompassStatus::SensorUnavailable;
    }

    /// Look up declination for the current location in the background.
    ///
    /// A lookup still running for an earlier fix is aborted first so a stale
    /// value cannot overwrite a newer one. The provider is also used for
    /// later fixes. Does nothing without a location.
    pub fn start_declination_fetch(&mut self, provider: Arc<dyn DeclinationProvider>, year: i32) {
        self.declination_source = Some((Arc::clone(&provider), year));

        let Some(coord) = self.location else {
            debug!("No location yet, skipping declination lookup");
            return;
        };

        if let Some(task) = self.declination_task.take() {
            task.abort();
        }

        self.declination_task = Some(spawn_declination_fetch(
            provider,
            coord,
            year,
            self.reconciler.declination_handle().clone(),
            self.config.declination_timeout,
        ));
    }

    /// Mark the view as focused or not.
    ///
    /// While unfocused no haptic feedback is emitted. Regaining focus clears
    /// the last emitted gap so the next reading emits immediately.
    pub fn set_focused(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        debug!(focused, "Compass focus changed");
        self.focused = focused;
        if focused {
            self.last_emitted_delta = None;
        }
    }

    /// Process one heading sample.
    ///
    /// Returns `None` when the sample is malformed (it is skipped) or the
    /// session is idle because no sensor is available.
    pub fn ingest(&mut self, sample: &HeadingSample) -> Option<CompassReading> {
        if self.status == CompassStatus::SensorUnavailable {
            return None;
        }

        let heading = match self.reconciler.ingest(sample) {
            Ok(heading) => heading,
            Err(e) => {
                debug!(error = %e, ?sample, "Skipping malformed heading sample");
                return None;
            }
        };

        let alignment = self.bearing.map(|bearing| {
            evaluate_with(
                &self.config.alignment,
                bearing,
                heading,
                self.last_emitted_delta,
            )
        });

        let mut emitted = None;
        if let Some(state) = alignment {
            if state.should_emit && self.focused {
                let intensity = state.band.intensity();
                self.haptics.emit(intensity);
                self.last_emitted_delta = Some(state.delta);
                emitted = Some(intensity);
                debug!(
                    delta = format!("{:.1}°", state.delta),
                    band = %state.band,
                    intensity = %intensity,
                    "Alignment feedback"
                );
            }
        }

        Some(CompassReading {
            heading,
            direction: heading.compass_point(),
            dial_rotation: dial_rotation(heading.degrees()),
            bearing: self.bearing,
            target_rotation: self
                .bearing
                .map(|bearing| target_rotation(heading.degrees(), bearing)),
            alignment,
            emitted,
        })
    }

    /// Consume a subscription until it ends or `shutdown` is cancelled.
    ///
    /// Each sample is fully processed before the next is read. The
    /// subscription is released on exit.
    pub async fn run<F>(
        &mut self,
        mut subscription: HeadingSubscription,
        shutdown: CancellationToken,
        mut on_reading: F,
    ) -> RunSummary
    where
        F: FnMut(&CompassReading),
    {
        let mut summary = RunSummary::default();

        loop {
            let sample = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Compass loop cancelled");
                    break;
                }
                sample = subscription.next() => sample,
            };

            let Some(sample) = sample else {
                debug!("Heading stream ended");
                break;
            };

            summary.samples += 1;
            match self.ingest(&sample) {
                Some(reading) => {
                    if reading.emitted.is_some() {
                        summary.emitted += 1;
                    }
                    on_reading(&reading);
                }
                None => summary.skipped += 1,
            }
        }

        subscription.unsubscribe();
        info!(
            samples = summary.samples,
            skipped = summary.skipped,
            emitted = summary.emitted,
            "Compass loop stopped"
        );
        summary
    }

    /// Release background work when the view goes away.
    pub fn teardown(&mut self) {
        if let Some(task) = self.declination_task.take() {
            task.abort();
        }
        self.focused = false;
        self.reconciler.reset();
    }
}

impl<H: HapticSink> Drop for QiblaCompass<H> {
    fn drop(&mut self) {
        if let Some(task) = self.declination_task.take() {
            task.abort();
        }
    }
}
