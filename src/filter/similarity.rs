//! Log-similarity exponents of expected versus observed measurements.
//!
//! Both return `-k·d²` with `d` a normalized error in `[0, 1]`; summing the
//! exponents of several observations and exponentiating gives a particle's
//! relative weight.

use std::f32::consts::FRAC_1_PI;

use crate::angle::abs_min_angle_diff;
use crate::simd::Lane;

/// Distance error relative to the larger of the two distances, so far
/// landmarks tolerate larger absolute errors.
#[inline]
pub fn distance_exponent<T: Lane>(expected: T, observed: T, coefficient: T) -> T {
    let d = (expected - observed).abs() / expected.max(observed);
    debug_assert!(
        d.all_within(0.0, 1.0),
        "distance_exponent: normalized error {d:?} outside [0, 1]"
    );
    -coefficient * d * d
}

/// Bearing error as a fraction of π.
#[inline]
pub fn bearing_exponent<T: Lane>(expected: T, observed: T, coefficient: T) -> T {
    let d = abs_min_angle_diff(expected, observed) * T::splat(FRAC_1_PI);
    debug_assert!(
        d.all_within(0.0, 1.0),
        "bearing_exponent: normalized error {d:?} outside [0, 1]"
    );
    -coefficient * d * d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::F32x4;
    use std::f32::consts::PI;

    #[test]
    fn test_exact_match_is_zero() {
        assert_eq!(distance_exponent(1000.0f32, 1000.0, 25.0), 0.0);
        assert_eq!(bearing_exponent(0.5f32, 0.5, 400.0), 0.0);
    }

    #[test]
    fn test_distance_exponent_symmetric() {
        let a = distance_exponent(800.0f32, 1000.0, 25.0);
        let b = distance_exponent(1000.0f32, 800.0, 25.0);
        assert_eq!(a, b);
        assert!((a - (-25.0 * 0.04)).abs() < 1e-5);
    }

    #[test]
    fn test_bearing_exponent_bounds() {
        let worst = bearing_exponent(PI, 0.0, 400.0);
        assert!((worst + 400.0).abs() < 1e-2);
        let wrapped = bearing_exponent(PI - 0.05, -PI + 0.05, 400.0);
        let direct = bearing_exponent(0.05f32, -0.05, 400.0);
        assert!((wrapped - direct).abs() < 1e-3);
    }

    #[test]
    fn test_four_wide_matches_scalar() {
        let expected = [100.0f32, 2500.0, 10.0, 4000.0];
        let observed = [120.0f32, 2000.0, 10.0, 1.0];
        let bearings = [0.1f32, -3.0, 3.0, 1.0];
        let seen = [-0.1f32, 3.0, 2.9, 1.0];
        let d4 = distance_exponent(
            F32x4::from_array(expected),
            F32x4::from_array(observed),
            F32x4::splat(25.0),
        );
        let b4 = bearing_exponent(
            F32x4::from_array(bearings),
            F32x4::from_array(seen),
            F32x4::splat(400.0),
        );
        for i in 0..4 {
            assert_eq!(d4.lane(i), distance_exponent(expected[i], observed[i], 25.0));
            assert_eq!(b4.lane(i), bearing_exponent(bearings[i], seen[i], 400.0));
        }
    }
}
