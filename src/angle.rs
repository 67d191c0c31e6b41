//! Angle wrapping and angular distance.
//!
//! Every function is generic over [`Lane`], so the same code serves single
//! angles and 4-wide lane groups. Angles are radians; the canonical range is
//! `[-π, π]`.

use std::f32::consts::PI;

use crate::simd::{Lane, LaneMask};

pub const TWO_PI: f32 = 2.0 * PI;

/// Wraps any finite angle into `[-π, π]`.
///
/// Values far outside the range are first reduced with an exact floating
/// point remainder, so the correction loops run at most once per direction.
#[inline]
pub fn normalize_angle<T: Lane>(angle: T) -> T {
    let limit = T::splat(2.0 * TWO_PI);
    let mut a = angle;
    if a.gt(limit).any() || a.lt(-limit).any() {
        a = a.rem(TWO_PI);
    }

    let pi = T::splat(PI);
    let two_pi = T::splat(TWO_PI);
    loop {
        let over = a.gt(pi);
        if !over.any() {
            break;
        }
        a = T::select(over, a - two_pi, a);
    }
    loop {
        let under = a.lt(-pi);
        if !under.any() {
            break;
        }
        a = T::select(under, a + two_pi, a);
    }
    a
}

/// Wraps an angle already within `[-2π, 2π]` into `[-π, π]` with a single
/// correction.
#[inline]
pub fn normalize_angle_rd<T: Lane>(angle: T) -> T {
    debug_assert!(
        angle.all_within(-TWO_PI, TWO_PI),
        "normalize_angle_rd: {angle:?} outside [-2π, 2π]"
    );
    let pi = T::splat(PI);
    let two_pi = T::splat(TWO_PI);
    let a = T::select(angle.gt(pi), angle - two_pi, angle);
    T::select(a.lt(-pi), a + two_pi, a)
}

/// Smallest unsigned angle between two normalized angles, in `[0, π]`.
#[inline]
pub fn abs_min_angle_diff<T: Lane>(a: T, b: T) -> T {
    debug_assert!(a.all_within(-PI, PI), "abs_min_angle_diff: {a:?} outside [-π, π]");
    debug_assert!(b.all_within(-PI, PI), "abs_min_angle_diff: {b:?} outside [-π, π]");
    let d = (a - b).abs();
    T::select(d.le(T::splat(PI)), d, T::splat(TWO_PI) - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::F32x4;

    #[test]
    fn test_normalize_scalar() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-3.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert_eq!(normalize_angle(1.0f32), 1.0);
        assert_eq!(normalize_angle(PI), PI);
        assert_eq!(normalize_angle(-PI), -PI);
    }

    #[test]
    fn test_normalize_huge_values_terminates() {
        for &v in &[1e7f32, -1e9, 3.4e38, -3.4e38] {
            let n = normalize_angle(v);
            assert!((-PI..=PI).contains(&n), "{v} -> {n}");
        }
    }

    #[test]
    fn test_normalize_vector_matches_scalar() {
        let input = [7.0f32, -7.0, 0.25, 100.0];
        let v = normalize_angle(F32x4::from_array(input)).to_array();
        for (lane, &x) in input.iter().enumerate() {
            assert_eq!(v[lane], normalize_angle(x));
        }
    }

    #[test]
    fn test_normalize_rd() {
        assert!((normalize_angle_rd(1.5 * PI) + 0.5 * PI).abs() < 1e-6);
        assert!((normalize_angle_rd(-1.5 * PI) - 0.5 * PI).abs() < 1e-6);
        assert_eq!(normalize_angle_rd(0.3f32), 0.3);
        let v = normalize_angle_rd(F32x4::new(TWO_PI, -TWO_PI, 0.0, PI)).to_array();
        assert!(v.iter().all(|a| (-PI..=PI).contains(a)));
    }

    #[test]
    fn test_abs_min_angle_diff_wraps() {
        let d = abs_min_angle_diff(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
        assert_eq!(abs_min_angle_diff(0.5f32, 0.5), 0.0);
        assert!((abs_min_angle_diff(PI, -PI)).abs() < 1e-6);

        let a = F32x4::new(PI - 0.1, 0.0, -1.0, 3.0);
        let b = F32x4::new(-PI + 0.1, 1.0, 1.0, -3.0);
        let v = abs_min_angle_diff(a, b).to_array();
        for lane in 0..4 {
            assert_eq!(v[lane], abs_min_angle_diff(a.lane(lane), b.lane(lane)));
        }
    }
}
