//! Heading reconciliation.
//!
//! Converts raw sensor readings (magnetometer vectors or OS headings) into a
//! single smoothed heading relative to true north.
//!
//! # Example
//!
//! ```ignore
//! use qibla::declination::DeclinationHandle;
//! use qibla::heading::{HeadingReconciler, HeadingSample, ReconcilerConfig};
//!
//! let declination = DeclinationHandle::new();
//! let mut reconciler = HeadingReconciler::new(ReconcilerConfig::default(), declination.clone());
//!
//! // Declination arrives later from the network; until then 0 is used
//! let heading = reconciler.ingest(&HeadingSample::Magnetic { degrees: 87.0 })?;
//! declination.set(-12.9);
//! ```

mod reconciler;
mod sample;

pub use reconciler::{
    HeadingReconciler, ReconciledHeading, ReconcilerConfig, DEFAULT_SMOOTHING_FACTOR,
    DEFAULT_VECTOR_OFFSET_DEG,
};
pub use sample::{HeadingSample, SampleError};
