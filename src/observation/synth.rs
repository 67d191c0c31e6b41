use std::f32::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use super::Observation;
use crate::angle::normalize_angle;
use crate::config::NoiseSection;
use crate::geometry::Point2D;
use crate::particle::Particle;

/// Generates `count` observations of `landmarks` (cycling through them in
/// order) as seen from `actual`.
///
/// Without `noise` the measurements are exact. With it, each distance is
/// scaled by `1 + σ_d·n` and each bearing offset by `σ_b·π·n`, `n` drawn
/// from a standard normal distribution.
pub fn synthesize<R: Rng + ?Sized>(
    actual: &Particle,
    landmarks: &[Point2D],
    count: usize,
    noise: Option<&NoiseSection>,
    rng: &mut R,
) -> Vec<Observation> {
    if landmarks.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let landmark = i % landmarks.len();
            let target = landmarks[landmark];
            let mut distance = actual.distance_to(target);
            let mut bearing = actual.bearing_to(target);
            if let Some(noise) = noise {
                let n_distance: f32 = rng.sample(StandardNormal);
                let n_bearing: f32 = rng.sample(StandardNormal);
                distance *= 1.0 + noise.distance_sigma * n_distance;
                bearing = normalize_angle(bearing + noise.bearing_sigma * PI * n_bearing);
            }
            Observation::new(landmark, distance.max(f32::MIN_POSITIVE), bearing)
        })
        .collect()
}
