//! Geographic coordinates and circular angle arithmetic.
//!
//! Every angle in this crate is in degrees, measured clockwise from north.
//! Headings and bearings are circular quantities: 0° and 360° are the same
//! direction, so all differences go through [`signed_delta`] or
//! [`circular_delta`] rather than plain subtraction.

mod types;

pub use types::{
    CompassPoint, CoordError, GeoCoordinate, KAABA, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Normalizes an angle to [0, 360).
///
/// Non-finite input yields 0.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let normalized = ((angle % 360.0) + 360.0) % 360.0;
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Shortest signed angular difference from `from` to `to`.
///
/// Positive values are clockwise. The result lies in (-180, 180]; a pair
/// exactly opposite each other reports +180.
#[inline]
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from + 540.0) - 180.0;
    if delta <= -180.0 {
        180.0
    } else {
        delta
    }
}

/// Unsigned circular distance between two angles, in [0, 180].
#[inline]
pub fn circular_delta(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-720.0), 0.0);
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
        assert_eq!(normalize_degrees(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_stays_in_range() {
        let n = normalize_degrees(-1e-15);
        assert!((0.0..360.0).contains(&n), "got {}", n);
    }

    #[test]
    fn test_signed_delta_across_north() {
        assert!((signed_delta(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((signed_delta(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!((signed_delta(359.0, 1.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_delta_opposite_is_positive() {
        assert_eq!(signed_delta(0.0, 180.0), 180.0);
        assert_eq!(signed_delta(180.0, 0.0), 180.0);
        assert_eq!(signed_delta(90.0, 270.0), 180.0);
    }

    #[test]
    fn test_circular_delta() {
        assert_eq!(circular_delta(10.0, 10.0), 0.0);
        assert!((circular_delta(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((circular_delta(0.0, 180.0) - 180.0).abs() < 1e-9);
        assert!((circular_delta(45.0, 315.0) - 90.0).abs() < 1e-9);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_normalize_range(angle in -1.0e6..1.0e6_f64) {
                let n = normalize_degrees(angle);
                prop_assert!((0.0..360.0).contains(&n), "{} -> {}", angle, n);
            }

            #[test]
            fn test_signed_delta_range(a in 0.0..360.0_f64, b in 0.0..360.0_f64) {
                let d = signed_delta(a, b);
                prop_assert!(d > -180.0 && d <= 180.0, "{} -> {}: {}", a, b, d);
            }

            #[test]
            fn test_circular_delta_symmetric(a in 0.0..360.0_f64, b in 0.0..360.0_f64) {
                prop_assert_eq!(circular_delta(a, b), circular_delta(b, a));
                prop_assert_eq!(circular_delta(a, a), 0.0);
                let d = circular_delta(a, b);
                prop_assert!((0.0..=180.0).contains(&d));
            }

            #[test]
            fn test_circular_delta_opposite(a in 0.0..360.0_f64) {
                let opposite = (a + 180.0) % 360.0;
                prop_assert!((circular_delta(a, opposite) - 180.0).abs() < 1e-9);
            }
        }
    }
}
