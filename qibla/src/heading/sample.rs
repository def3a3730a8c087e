//! Heading sensor samples.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::normalize_degrees;

/// Vectors shorter than this carry no usable direction.
const MIN_VECTOR_MAGNITUDE: f64 = 1e-9;

/// A sample that cannot be turned into a heading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// A component is NaN or infinite.
    #[error("Sample contains a non-finite value")]
    NonFinite,

    /// A raw vector with (near) zero magnitude.
    #[error("Magnetometer vector has zero magnitude")]
    ZeroVector,
}

/// One reading from the heading sensor.
///
/// Serialized as JSON with a `kind` tag, e.g.
/// `{"kind":"vector","x":0.3,"y":-0.1}` or `{"kind":"true","degrees":87.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeadingSample {
    /// Raw two-axis magnetometer vector.
    Vector { x: f64, y: f64 },
    /// OS heading relative to magnetic north.
    Magnetic { degrees: f64 },
    /// OS heading already corrected to true north.
    True { degrees: f64 },
}

impl HeadingSample {
    /// Whether this sample still needs declination correction.
    pub fn is_magnetic(&self) -> bool {
        !matches!(self, HeadingSample::True { .. })
    }

    /// Uncorrected heading in [0, 360).
    ///
    /// `vector_offset_deg` rotates raw vector angles to match how the
    /// sensor axes are mounted relative to the device's forward direction.
    pub fn raw_degrees(&self, vector_offset_deg: f64) -> Result<f64, SampleError> {
        match *self {
            HeadingSample::Vector { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(SampleError::NonFinite);
                }
                if x.hypot(y) < MIN_VECTOR_MAGNITUDE {
                    return Err(SampleError::ZeroVector);
                }
                Ok(normalize_degrees(y.atan2(x).to_degrees() + vector_offset_deg))
            }
            HeadingSample::Magnetic { degrees } | HeadingSample::True { degrees } => {
                if !degrees.is_finite() {
                    return Err(SampleError::NonFinite);
                }
                Ok(normalize_degrees(degrees))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_angle() {
        let east = HeadingSample::Vector { x: 0.0, y: 1.0 };
        assert!((east.raw_degrees(0.0).unwrap() - 90.0).abs() < 1e-9);

        let west = HeadingSample::Vector { x: 0.0, y: -25.0 };
        assert!((west.raw_degrees(0.0).unwrap() - 270.0).abs() < 1e-9);

        let along_x = HeadingSample::Vector { x: 30.0, y: 0.0 };
        assert_eq!(along_x.raw_degrees(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_vector_offset() {
        let sample = HeadingSample::Vector { x: 1.0, y: 0.0 };
        assert_eq!(sample.raw_degrees(270.0).unwrap(), 270.0);

        let sample = HeadingSample::Vector { x: 0.0, y: 1.0 };
        assert!(sample.raw_degrees(270.0).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_scalar_samples_normalized() {
        assert_eq!(
            HeadingSample::True { degrees: 370.0 }.raw_degrees(0.0),
            Ok(10.0)
        );
        assert_eq!(
            HeadingSample::Magnetic { degrees: -10.0 }.raw_degrees(0.0),
            Ok(350.0)
        );
    }

    #[test]
    fn test_offset_ignored_for_scalars() {
        assert_eq!(
            HeadingSample::True { degrees: 45.0 }.raw_degrees(270.0),
            Ok(45.0)
        );
    }

    #[test]
    fn test_malformed_samples() {
        assert_eq!(
            HeadingSample::Vector { x: 0.0, y: 0.0 }.raw_degrees(0.0),
            Err(SampleError::ZeroVector)
        );
        assert_eq!(
            HeadingSample::Vector {
                x: f64::NAN,
                y: 1.0
            }
            .raw_degrees(0.0),
            Err(SampleError::NonFinite)
        );
        assert_eq!(
            HeadingSample::Magnetic {
                degrees: f64::INFINITY
            }
            .raw_degrees(0.0),
            Err(SampleError::NonFinite)
        );
    }

    #[test]
    fn test_is_magnetic() {
        assert!(HeadingSample::Vector { x: 1.0, y: 0.0 }.is_magnetic());
        assert!(HeadingSample::Magnetic { degrees: 0.0 }.is_magnetic());
        assert!(!HeadingSample::True { degrees: 0.0 }.is_magnetic());
    }

    #[test]
    fn test_json_format() {
        let sample: HeadingSample =
            serde_json::from_str(r#"{"kind":"true","degrees":87.5}"#).unwrap();
        assert_eq!(sample, HeadingSample::True { degrees: 87.5 });

        let sample: HeadingSample =
            serde_json::from_str(r#"{"kind":"vector","x":0.3,"y":-0.1}"#).unwrap();
        assert_eq!(sample, HeadingSample::Vector { x: 0.3, y: -0.1 });

        let json = serde_json::to_string(&HeadingSample::Magnetic { degrees: 12.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"magnetic","degrees":12.0}"#);
    }
}
