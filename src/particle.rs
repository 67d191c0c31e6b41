//! Pose hypotheses: a position and a heading.
//!
//! `Particle` is one hypothesis, `Particle4` packs four of them lane-wise so
//! the filter can score four particles per instruction.

use std::f32::consts::PI;

use rand::Rng;

use crate::angle::TWO_PI;
use crate::geometry::{Point2, Point2D, Rectangle};
use crate::simd::{F32x4, Lane, LANE_COUNT};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle<T = f32> {
    pub pos: Point2<T>,
    /// Heading in `[-π, π]`.
    pub ang: T,
}

pub type Particle4 = Particle<F32x4>;

impl<T: Lane> Particle<T> {
    #[inline]
    pub fn new(pos: Point2<T>, ang: T) -> Self {
        Self { pos, ang }
    }

    #[inline]
    pub fn distance_to(&self, target: Point2<T>) -> T {
        self.pos.distance_to(target)
    }

    /// Bearing of `target` relative to the particle's heading.
    #[inline]
    pub fn bearing_to(&self, target: Point2<T>) -> T {
        self.pos.bearing_to(target, self.ang)
    }
}

impl Particle {
    /// Draws a particle uniformly inside `bounds` with a uniform heading.
    pub fn place_randomly<R: Rng + ?Sized>(bounds: &Rectangle, rng: &mut R) -> Self {
        let lo = bounds.bottom_left();
        let x = lo.x + bounds.width() * rng.random::<f32>();
        let y = lo.y + bounds.height() * rng.random::<f32>();
        let ang = -PI + TWO_PI * rng.random::<f32>();
        Self::new(Point2D::new(x, y), ang.min(PI))
    }
}

impl Particle4 {
    /// Packs four particles lane-wise, lane `i` holding `particles[i]`.
    pub fn from_particles(particles: &[Particle; LANE_COUNT]) -> Self {
        Self::new(
            Point2::<F32x4>::from_points(particles.map(|p| p.pos)),
            F32x4::from_array(particles.map(|p| p.ang)),
        )
    }

    /// Repeats one particle in every lane.
    pub fn splat(particle: Particle) -> Self {
        Self::new(Point2::expand(particle.pos), F32x4::splat(particle.ang))
    }

    #[inline]
    pub fn lane(&self, index: usize) -> Particle {
        Particle::new(self.pos.lane(index), self.ang.lane(index))
    }

    pub fn to_particles(&self) -> [Particle; LANE_COUNT] {
        std::array::from_fn(|i| self.lane(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_place_randomly_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(12345);
        let bounds = Rectangle::centered(6800.0, 4400.0);
        for _ in 0..10_000 {
            let p = Particle::place_randomly(&bounds, &mut rng);
            assert!(bounds.contains(p.pos), "{p:?}");
            assert!((-PI..=PI).contains(&p.ang), "{p:?}");
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let bounds = Rectangle::centered(100.0, 100.0);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(
                Particle::place_randomly(&bounds, &mut a),
                Particle::place_randomly(&bounds, &mut b)
            );
        }
    }

    #[test]
    fn test_pack_and_unpack() {
        let particles = [
            Particle::new(Point2D::new(1.0, 2.0), 0.1),
            Particle::new(Point2D::new(3.0, 4.0), -0.2),
            Particle::new(Point2D::new(5.0, 6.0), 0.3),
            Particle::new(Point2D::new(7.0, 8.0), -0.4),
        ];
        let packed = Particle4::from_particles(&particles);
        assert_eq!(packed.to_particles(), particles);
        assert_eq!(Particle4::splat(particles[2]).lane(3), particles[2]);
    }

    #[test]
    fn test_bearing_matches_scalar() {
        let particles = [
            Particle::new(Point2D::new(0.0, 0.0), 0.0),
            Particle::new(Point2D::new(-1000.0, 500.0), 2.5),
            Particle::new(Point2D::new(2500.0, -900.0), -3.0),
            Particle::new(Point2D::new(10.0, 10.0), 1.0),
        ];
        let landmark = Point2D::new(2600.0, 700.0);
        let packed = Particle4::from_particles(&particles);
        let bearing = packed.bearing_to(Point2::expand(landmark));
        let distance = packed.distance_to(Point2::expand(landmark));
        for (i, p) in particles.iter().enumerate() {
            assert!((bearing.lane(i) - p.bearing_to(landmark)).abs() < 1e-5);
            let d = p.distance_to(landmark);
            assert!((distance.lane(i) - d).abs() <= d * 1e-6);
        }
    }
}
