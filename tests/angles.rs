//! Properties of angle wrapping and angular distance on random inputs, for
//! single angles and lane groups.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdloc::angle::{abs_min_angle_diff, normalize_angle, normalize_angle_rd, TWO_PI};
use simdloc::simd::F32x4;

#[test]
fn test_normalize_lands_in_range_and_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..10_000 {
        let a: f32 = rng.random_range(-1000.0..1000.0);
        let n = normalize_angle(a);
        assert!((-PI..=PI).contains(&n), "{a} -> {n}");
        assert_eq!(normalize_angle(n), n);
        // same direction
        assert!((n.sin() - a.sin()).abs() < 1e-3, "{a} -> {n}");
        assert!((n.cos() - a.cos()).abs() < 1e-3, "{a} -> {n}");
    }
}

#[test]
fn test_reduced_normalize_matches_full() {
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..10_000 {
        let a: f32 = rng.random_range(-TWO_PI..TWO_PI);
        assert_eq!(normalize_angle_rd(a), normalize_angle(a));
    }
}

#[test]
fn test_lane_groups_match_single_angles() {
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..2500 {
        let lanes: [f32; 4] = std::array::from_fn(|_| rng.random_range(-50.0..50.0));
        let v = normalize_angle(F32x4::from_array(lanes)).to_array();
        for (lane, &a) in lanes.iter().enumerate() {
            assert_eq!(v[lane], normalize_angle(a));
        }
    }
}

#[test]
fn test_min_angle_diff_properties() {
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..10_000 {
        let a: f32 = rng.random_range(-PI..PI);
        let b: f32 = rng.random_range(-PI..PI);
        let d = abs_min_angle_diff(a, b);
        assert!((0.0..=PI).contains(&d));
        assert_eq!(d, abs_min_angle_diff(b, a));
        assert_eq!(abs_min_angle_diff(a, a), 0.0);

        let rotated = normalize_angle(a + d);
        let other = normalize_angle(a - d);
        let hits = abs_min_angle_diff(rotated, b) < 1e-4 || abs_min_angle_diff(other, b) < 1e-4;
        assert!(hits, "a = {a}, b = {b}, d = {d}");
    }
}

#[test]
fn test_min_angle_diff_lane_groups() {
    let a = F32x4::new(PI, -PI, 3.0, 0.5);
    let b = F32x4::new(-PI, PI, -3.0, -0.5);
    let d = abs_min_angle_diff(a, b).to_array();
    assert_eq!(d[0], 0.0);
    assert_eq!(d[1], 0.0);
    assert!((d[2] - (TWO_PI - 6.0)).abs() < 1e-6);
    assert_eq!(d[3], 1.0);
}
