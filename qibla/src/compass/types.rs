//! Compass session types.

use std::fmt;

use thiserror::Error;

use crate::alignment::{AlignmentState, FeedbackIntensity};
use crate::bearing::Bearing;
use crate::geo::{CompassPoint, CoordError};
use crate::heading::ReconciledHeading;
use crate::location::LocationError;
use crate::sensor::SensorError;

/// Recoverable state of a compass session, for display.
#[derive(Debug, Clone, PartialEq)]
pub enum CompassStatus {
    /// Waiting for a location fix.
    Pending,
    /// Bearing known, processing heading updates.
    Ready,
    /// The last location request failed. Any earlier bearing is still used.
    LocationError(LocationError),
    /// No heading source; the session stays idle.
    SensorUnavailable,
}

impl CompassStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CompassStatus::Ready)
    }
}

impl fmt::Display for CompassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompassStatus::Pending => write!(f, "Waiting for location"),
            CompassStatus::Ready => write!(f, "Ready"),
            CompassStatus::LocationError(e) => write!(f, "{}", e),
            CompassStatus::SensorUnavailable => write!(f, "Compass is not available on this device"),
        }
    }
}

/// Errors from starting a compass session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompassError {
    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),
}

/// Everything a compass view needs after one heading update.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassReading {
    /// Smoothed true heading.
    pub heading: ReconciledHeading,
    /// Eight-point label for the heading.
    pub direction: CompassPoint,
    /// Rotation that keeps the dial's north mark pointing north.
    pub dial_rotation: f64,
    /// Qibla bearing, once a location fix exists.
    pub bearing: Option<Bearing>,
    /// Rotation of the Qibla marker on the dial.
    pub target_rotation: Option<f64>,
    /// Alignment against the bearing, once a location fix exists.
    pub alignment: Option<AlignmentState>,
    /// Haptic pulse emitted for this update, if any.
    pub emitted: Option<FeedbackIntensity>,
}

impl CompassReading {
    /// Whether the device currently faces the Qibla.
    pub fn is_aligned(&self) -> bool {
        self.alignment
            .map(|a| a.band == crate::alignment::AlignmentBand::Aligned)
            .unwrap_or(false)
    }
}

/// Counters from one [`super::QiblaCompass::run`] loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples received from the sensor.
    pub samples: u64,
    /// Samples rejected as malformed.
    pub skipped: u64,
    /// Haptic pulses emitted.
    pub emitted: u64,
}
