//! Qibla - direction to the Kaaba from anywhere on Earth
//!
//! Computes the great-circle bearing toward the Kaaba, turns raw compass
//! readings into a smoothed true-north heading, and grades how well the
//! device lines up with the bearing to drive haptic feedback.
//!
//! The main entry point is [`compass::QiblaCompass`]; the lower layers
//! ([`bearing`], [`heading`], [`alignment`]) are usable on their own.

pub mod alignment;
pub mod bearing;
pub mod compass;
pub mod config;
pub mod declination;
pub mod geo;
pub mod haptics;
pub mod heading;
pub mod location;
pub mod logging;
pub mod sensor;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
