//! Alignment classification and feedback gating.
//!
//! Compares the reconciled heading with the Qibla bearing, classifies the
//! angular gap into bands, and decides whether the change since the last
//! emitted feedback is large enough to emit again.
//!
//! # Bands
//!
//! ```text
//! 0°        10°        20°                         180°
//! ├─Aligned─┤──Close───┤────────────Far─────────────┤
//! ```
//!
//! Boundaries belong to the inner band: 10° is `Aligned`, 20° is `Close`.
//!
//! # Hysteresis
//!
//! Feedback fires only when the gap has moved at least 4° from the value at
//! the last emission. The last emitted gap is owned by the caller;
//! [`evaluate`] itself is pure.

use std::fmt;

use crate::bearing::Bearing;
use crate::geo::circular_delta;
use crate::heading::ReconciledHeading;

/// Largest gap still considered aligned, in degrees.
pub const ALIGNED_THRESHOLD_DEG: f64 = 10.0;

/// Largest gap still considered close, in degrees.
pub const CLOSE_THRESHOLD_DEG: f64 = 20.0;

/// Minimum change in gap between two feedback emissions, in degrees.
pub const EMIT_HYSTERESIS_DEG: f64 = 4.0;

/// Alignment quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentBand {
    /// Facing the Qibla.
    Aligned,
    /// Nearly facing the Qibla.
    Close,
    /// Facing elsewhere.
    Far,
}

impl AlignmentBand {
    /// Feedback strength for this band.
    pub fn intensity(&self) -> FeedbackIntensity {
        match self {
            AlignmentBand::Aligned => FeedbackIntensity::Strong,
            AlignmentBand::Close => FeedbackIntensity::Medium,
            AlignmentBand::Far => FeedbackIntensity::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentBand::Aligned => "Aligned",
            AlignmentBand::Close => "Close",
            AlignmentBand::Far => "Far",
        }
    }
}

impl fmt::Display for AlignmentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Haptic feedback strength.
///
/// `Strong` is the success pulse played when the device is aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackIntensity {
    Strong,
    Medium,
    Light,
}

impl FeedbackIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackIntensity::Strong => "strong",
            FeedbackIntensity::Medium => "medium",
            FeedbackIntensity::Light => "light",
        }
    }
}

impl fmt::Display for FeedbackIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slack for rounding noise in circular gaps when applying the hysteresis.
const HYSTERESIS_TOLERANCE_DEG: f64 = 1e-9;

/// Band thresholds and emission hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    pub aligned_threshold_deg: f64,
    pub close_threshold_deg: f64,
    pub emit_hysteresis_deg: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            aligned_threshold_deg: ALIGNED_THRESHOLD_DEG,
            close_threshold_deg: CLOSE_THRESHOLD_DEG,
            emit_hysteresis_deg: EMIT_HYSTERESIS_DEG,
        }
    }
}

impl AlignmentConfig {
    /// Classify a gap in degrees.
    pub fn classify(&self, delta: f64) -> AlignmentBand {
        if delta <= self.aligned_threshold_deg {
            AlignmentBand::Aligned
        } else if delta <= self.close_threshold_deg {
            AlignmentBand::Close
        } else {
            AlignmentBand::Far
        }
    }

    /// Whether a gap differs enough from the last emitted one to emit again.
    pub fn should_emit(&self, delta: f64, last_emitted_delta: Option<f64>) -> bool {
        match last_emitted_delta {
            None => true,
            Some(last) => {
                (delta - last).abs() >= self.emit_hysteresis_deg - HYSTERESIS_TOLERANCE_DEG
            }
        }
    }
}

/// Result of one alignment evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentState {
    /// Circular gap between bearing and heading, in [0, 180].
    pub delta: f64,
    pub band: AlignmentBand,
    /// Whether the caller should emit feedback and record `delta`.
    pub should_emit: bool,
}

impl AlignmentState {
    /// Feedback to emit, if any.
    pub fn feedback(&self) -> Option<FeedbackIntensity> {
        self.should_emit.then(|| self.band.intensity())
    }
}

/// Evaluate alignment with the default thresholds.
pub fn evaluate(
    bearing: Bearing,
    heading: ReconciledHeading,
    last_emitted_delta: Option<f64>,
) -> AlignmentState {
    evaluate_with(
        &AlignmentConfig::default(),
        bearing,
        heading,
        last_emitted_delta,
    )
}

/// Evaluate alignment with explicit thresholds.
pub fn evaluate_with(
    config: &AlignmentConfig,
    bearing: Bearing,
    heading: ReconciledHeading,
    last_emitted_delta: Option<f64>,
) -> AlignmentState {
    let delta = circular_delta(bearing.degrees(), heading.degrees());
    AlignmentState {
        delta,
        band: config.classify(delta),
        should_emit: config.should_emit(delta, last_emitted_delta),
    }
}
