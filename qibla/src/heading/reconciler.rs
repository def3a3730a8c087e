//! Heading reconciliation: normalize, correct, smooth.
//!
//! # Pipeline
//!
//! ```text
//! HeadingSample ──► raw degrees ──► + declination ──► circular EMA ──► ReconciledHeading
//!                   (atan2 for       (magnetic           (shortest-path
//!                    vectors)         samples only)       interpolation)
//! ```
//!
//! Smoothing works on the shortest signed arc between the previous output
//! and the new sample, so a sequence such as 350°, 355°, 2°, 8° moves forward
//! through north instead of swinging back across the dial.

use std::fmt;

use tracing::trace;

use super::sample::{HeadingSample, SampleError};
use crate::declination::DeclinationHandle;
use crate::geo::{normalize_degrees, signed_delta, CompassPoint};

/// Default smoothing factor (weight of each new sample).
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.15;

/// Default rotation applied to raw magnetometer vector angles.
pub const DEFAULT_VECTOR_OFFSET_DEG: f64 = 0.0;

/// Reconciler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Exponential smoothing factor α in [0, 1].
    ///
    /// 1.0 passes samples through unchanged; lower values smooth more.
    pub smoothing_factor: f64,
    /// Degrees added to raw vector angles before use.
    pub vector_offset_deg: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            vector_offset_deg: DEFAULT_VECTOR_OFFSET_DEG,
        }
    }
}

impl ReconcilerConfig {
    /// Set the smoothing factor (clamped to [0, 1]; NaN falls back to the default).
    pub fn with_smoothing_factor(mut self, alpha: f64) -> Self {
        self.smoothing_factor = if alpha.is_nan() {
            DEFAULT_SMOOTHING_FACTOR
        } else {
            alpha.clamp(0.0, 1.0)
        };
        self
    }

    /// Set the raw vector rotation.
    pub fn with_vector_offset(mut self, degrees: f64) -> Self {
        self.vector_offset_deg = normalize_degrees(degrees);
        self
    }
}

/// Smoothed, declination-corrected heading in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ReconciledHeading(f64);

impl ReconciledHeading {
    pub fn from_degrees(degrees: f64) -> Self {
        Self(normalize_degrees(degrees))
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn compass_point(&self) -> CompassPoint {
        CompassPoint::from_degrees(self.0)
    }
}

impl fmt::Display for ReconciledHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Turns a stream of sensor samples into a stable heading.
///
/// Owns the smoothing state for one active view. Samples must be fed in
/// arrival order; each call completes before the next one starts.
#[derive(Debug)]
pub struct HeadingReconciler {
    config: ReconcilerConfig,
    declination: DeclinationHandle,
    current: Option<f64>,
}

impl HeadingReconciler {
    /// Create a reconciler reading declination from `declination`.
    pub fn new(config: ReconcilerConfig, declination: DeclinationHandle) -> Self {
        Self {
            config,
            declination,
            current: None,
        }
    }

    /// Create with default configuration and no declination.
    pub fn with_defaults() -> Self {
        Self::new(ReconcilerConfig::default(), DeclinationHandle::new())
    }

    /// Feed one sample and return the updated heading.
    ///
    /// A malformed sample is rejected and leaves the smoothing state as it was.
    pub fn ingest(&mut self, sample: &HeadingSample) -> Result<ReconciledHeading, SampleError> {
        let raw = sample.raw_degrees(self.config.vector_offset_deg)?;

        let corrected = if sample.is_magnetic() {
            normalize_degrees(raw + self.declination.degrees())
        } else {
            raw
        };

        let next = match self.current {
            None => corrected,
            Some(prev) => {
                let delta = signed_delta(prev, corrected);
                normalize_degrees(prev + self.config.smoothing_factor * delta)
            }
        };

        trace!(raw, corrected, heading = next, "Heading sample reconciled");

        self.current = Some(next);
        Ok(ReconciledHeading(next))
    }

    /// The last reconciled heading, if any sample has been accepted.
    pub fn current(&self) -> Option<ReconciledHeading> {
        self.current.map(ReconciledHeading)
    }

    /// Declination currently applied to magnetic samples.
    pub fn declination(&self) -> f64 {
        self.declination.degrees()
    }

    /// Handle to the declination cell this reconciler reads.
    pub fn declination_handle(&self) -> &DeclinationHandle {
        &self.declination
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Drop the smoothing state; the next sample seeds a fresh value.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass_through() -> HeadingReconciler {
        HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(1.0),
            DeclinationHandle::new(),
        )
    }

    #[test]
    fn test_first_sample_seeds_state() {
        let mut reconciler = HeadingReconciler::with_defaults();
        assert!(reconciler.current().is_none());

        let heading = reconciler
            .ingest(&HeadingSample::True { degrees: 45.0 })
            .unwrap();
        assert_eq!(heading.degrees(), 45.0);
        assert_eq!(reconciler.current(), Some(heading));
    }

    #[test]
    fn test_smoothing_step() {
        let mut reconciler = HeadingReconciler::with_defaults();
        reconciler.ingest(&HeadingSample::True { degrees: 90.0 }).unwrap();
        let heading = reconciler
            .ingest(&HeadingSample::True { degrees: 100.0 })
            .unwrap();
        // 90 + 0.15 * 10
        assert!((heading.degrees() - 91.5).abs() < 1e-9);
    }

    #[test]
    fn test_smoothing_wraps_forward_through_north() {
        let mut reconciler = HeadingReconciler::with_defaults();
        let outputs: Vec<f64> = [350.0, 355.0, 2.0, 8.0]
            .iter()
            .map(|&d| {
                reconciler
                    .ingest(&HeadingSample::True { degrees: d })
                    .unwrap()
                    .degrees()
            })
            .collect();

        let expected = [350.0, 350.75, 352.4375, 354.771875];
        for (got, want) in outputs.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "got {}, want {}", got, want);
        }

        // Each step moves clockwise by a small amount, never ~350° backwards
        for pair in outputs.windows(2) {
            let step = signed_delta(pair[0], pair[1]);
            assert!(step > 0.0 && step < 10.0, "step {} from {:?}", step, pair);
        }
    }

    #[test]
    fn test_smoothing_converges_across_wrap() {
        let mut reconciler = HeadingReconciler::with_defaults();
        reconciler.ingest(&HeadingSample::True { degrees: 350.0 }).unwrap();
        let mut last = 350.0;
        for _ in 0..100 {
            last = reconciler
                .ingest(&HeadingSample::True { degrees: 10.0 })
                .unwrap()
                .degrees();
        }
        assert!((last - 10.0).abs() < 0.01, "converged to {}", last);
    }

    #[test]
    fn test_magnetic_sample_gets_declination() {
        let declination = DeclinationHandle::with_value(-13.0);
        let mut reconciler = HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(1.0),
            declination,
        );

        let heading = reconciler
            .ingest(&HeadingSample::Magnetic { degrees: 5.0 })
            .unwrap();
        assert!((heading.degrees() - 352.0).abs() < 1e-9);
    }

    #[test]
    fn test_true_sample_skips_declination() {
        let mut reconciler = HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(1.0),
            DeclinationHandle::with_value(20.0),
        );

        let heading = reconciler
            .ingest(&HeadingSample::True { degrees: 5.0 })
            .unwrap();
        assert_eq!(heading.degrees(), 5.0);
    }

    #[test]
    fn test_vector_sample_is_magnetic() {
        let mut reconciler = HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(1.0),
            DeclinationHandle::with_value(10.0),
        );

        let heading = reconciler
            .ingest(&HeadingSample::Vector { x: 0.0, y: 1.0 })
            .unwrap();
        assert!((heading.degrees() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_declination_treated_as_zero() {
        let mut reconciler = pass_through();
        let heading = reconciler
            .ingest(&HeadingSample::Magnetic { degrees: 123.0 })
            .unwrap();
        assert_eq!(heading.degrees(), 123.0);
        assert_eq!(reconciler.declination(), 0.0);
    }

    #[test]
    fn test_declination_arrives_mid_stream() {
        let declination = DeclinationHandle::new();
        let mut reconciler = HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(1.0),
            declination.clone(),
        );

        let before = reconciler
            .ingest(&HeadingSample::Magnetic { degrees: 100.0 })
            .unwrap();
        assert_eq!(before.degrees(), 100.0);

        declination.set(4.0);
        let after = reconciler
            .ingest(&HeadingSample::Magnetic { degrees: 100.0 })
            .unwrap();
        assert_eq!(after.degrees(), 104.0);
    }

    #[test]
    fn test_malformed_sample_leaves_state() {
        let mut reconciler = HeadingReconciler::with_defaults();
        reconciler.ingest(&HeadingSample::True { degrees: 30.0 }).unwrap();

        let result = reconciler.ingest(&HeadingSample::Vector { x: 0.0, y: 0.0 });
        assert_eq!(result, Err(SampleError::ZeroVector));
        assert_eq!(reconciler.current().unwrap().degrees(), 30.0);

        let result = reconciler.ingest(&HeadingSample::True { degrees: f64::NAN });
        assert_eq!(result, Err(SampleError::NonFinite));
        assert_eq!(reconciler.current().unwrap().degrees(), 30.0);
    }

    #[test]
    fn test_reset() {
        let mut reconciler = HeadingReconciler::with_defaults();
        reconciler.ingest(&HeadingSample::True { degrees: 30.0 }).unwrap();
        reconciler.reset();
        assert!(reconciler.current().is_none());

        let heading = reconciler
            .ingest(&HeadingSample::True { degrees: 200.0 })
            .unwrap();
        assert_eq!(heading.degrees(), 200.0);
    }

    #[test]
    fn test_config_clamping() {
        let config = ReconcilerConfig::default().with_smoothing_factor(3.0);
        assert_eq!(config.smoothing_factor, 1.0);

        let config = ReconcilerConfig::default().with_smoothing_factor(-0.5);
        assert_eq!(config.smoothing_factor, 0.0);

        let config = ReconcilerConfig::default().with_smoothing_factor(f64::NAN);
        assert_eq!(config.smoothing_factor, DEFAULT_SMOOTHING_FACTOR);

        let config = ReconcilerConfig::default().with_vector_offset(-90.0);
        assert_eq!(config.vector_offset_deg, 270.0);
    }

    #[test]
    fn test_zero_alpha_holds_first_heading() {
        let mut reconciler = HeadingReconciler::new(
            ReconcilerConfig::default().with_smoothing_factor(0.0),
            DeclinationHandle::new(),
        );
        reconciler.ingest(&HeadingSample::True { degrees: 12.0 }).unwrap();
        let heading = reconciler
            .ingest(&HeadingSample::True { degrees: 190.0 })
            .unwrap();
        assert_eq!(heading.degrees(), 12.0);
    }
}
