//! Weighted pose statistics over a particle population.
//!
//! The estimator runs two passes. The first accumulates the weighted
//! position sum and the circular mean of the headings, the second the
//! weighted squared deviations from those means. Each particle's weight is
//! `exp(distance + bearing)` of its accumulated exponents.

use std::fmt;
use std::ops::Sub;

use crate::angle::{abs_min_angle_diff, normalize_angle_rd};
use crate::geometry::{Point2, Point2D};
use crate::particle::Particle;
use crate::simd::Lane;

use super::exponents::ProbabilityExponents;

/// Estimated (or actual) robot pose with its spread.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RobotPose {
    pub pos_mean: Point2D,
    /// Circular mean heading in `[-π, π]`.
    pub ang_mean: f32,
    /// Standard deviation along x and along y.
    pub pos_sd: Point2D,
    pub ang_sd: f32,
}

impl RobotPose {
    pub fn new(pos_mean: Point2D, ang_mean: f32, pos_sd: Point2D, ang_sd: f32) -> Self {
        Self {
            pos_mean,
            ang_mean,
            pos_sd,
            ang_sd,
        }
    }

    /// A pose known exactly.
    pub fn exact(particle: Particle) -> Self {
        Self::new(particle.pos, particle.ang, Point2D::zero(), 0.0)
    }
}

/// Field-wise difference; the heading difference is wrapped into `[-π, π]`.
impl Sub for RobotPose {
    type Output = RobotPose;

    fn sub(self, rhs: Self) -> RobotPose {
        RobotPose::new(
            self.pos_mean - rhs.pos_mean,
            normalize_angle_rd(self.ang_mean - rhs.ang_mean),
            self.pos_sd - rhs.pos_sd,
            self.ang_sd - rhs.ang_sd,
        )
    }
}

impl fmt::Display for RobotPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "position: ({:.6}, {:.6}), angle: {:.6}",
            self.pos_mean.x, self.pos_mean.y, self.ang_mean
        )?;
        write!(
            f,
            "std dev position: ({:.6}, {:.6}), std dev angle: {:.6}",
            self.pos_sd.x, self.pos_sd.y, self.ang_sd
        )
    }
}

/// Two-pass weighted mean and standard deviation of `particles`, weighted by
/// the matching `exponents`.
///
/// Works on single particles (`T = f32`) and on lane groups
/// (`T = F32x4`); lane sums are reduced to scalars between the passes.
/// The total weight and the circular mean vector must be non-zero.
pub fn estimate_pose<T: Lane>(
    particles: &[Particle<T>],
    exponents: &[ProbabilityExponents<T>],
) -> RobotPose {
    debug_assert_eq!(particles.len(), exponents.len());

    let mut pos_accum = Point2::<T>::zero();
    let mut ori_accum = Point2::<T>::zero();
    let mut w_accum = T::splat(0.0);
    for (p, e) in particles.iter().zip(exponents) {
        let w = e.total().exp();
        pos_accum += p.pos * w;
        ori_accum += Point2::from_polar(w, p.ang);
        w_accum += w;
    }
    let pos_accum = pos_accum.reduce_add();
    let ori_accum = ori_accum.reduce_add();
    let w_accum = w_accum.reduce_add();
    debug_assert!(w_accum != 0.0, "estimate_pose: total weight is zero");
    debug_assert!(
        ori_accum.magnitude() != 0.0,
        "estimate_pose: circular mean vector has zero magnitude"
    );

    let inv_total_w = 1.0 / w_accum;
    let pos_mean = pos_accum * inv_total_w;
    let ang_mean = ori_accum.direction();

    let pos_mean_t = Point2::<T>::expand(pos_mean);
    let ang_mean_t = T::splat(ang_mean);
    let mut pd2_accum = Point2::<T>::zero();
    let mut ad2_accum = T::splat(0.0);
    for (p, e) in particles.iter().zip(exponents) {
        let w = e.total().exp();
        let pd = p.pos - pos_mean_t;
        pd2_accum += pd * pd * w;
        let ad = abs_min_angle_diff(p.ang, ang_mean_t);
        ad2_accum += ad * ad * w;
    }
    let pos_var = pd2_accum.reduce_add() * inv_total_w;
    let ang_var = ad2_accum.reduce_add() * inv_total_w;

    RobotPose::new(pos_mean, ang_mean, pos_var.sqrt(), ang_var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle4;
    use crate::simd::F32x4;
    use std::f32::consts::PI;

    #[test]
    fn test_single_particle_concentrates() {
        let p = Particle::new(Point2D::new(120.0, -40.0), 2.0);
        let pose = estimate_pose(&[p], &[ProbabilityExponents::zero()]);
        assert!((pose.pos_mean.x - 120.0).abs() < 1e-4);
        assert!((pose.pos_mean.y + 40.0).abs() < 1e-4);
        assert!((pose.ang_mean - 2.0).abs() < 1e-6);
        assert_eq!(pose.pos_sd, Point2D::zero());
        assert!(pose.ang_sd < 1e-6);
    }

    #[test]
    fn test_weight_dominates() {
        let particles = [
            Particle::new(Point2D::new(0.0, 0.0), 0.0),
            Particle::new(Point2D::new(1000.0, 1000.0), 1.0),
        ];
        let exponents = [
            ProbabilityExponents::new(-60.0, -60.0),
            ProbabilityExponents::zero(),
        ];
        let pose = estimate_pose(&particles, &exponents);
        assert!((pose.pos_mean.x - 1000.0).abs() < 1e-3);
        assert!((pose.ang_mean - 1.0).abs() < 1e-5);
        assert!(pose.pos_sd.x < 1e-3);
    }

    #[test]
    fn test_circular_mean_across_wrap() {
        let particles = [
            Particle::new(Point2D::zero(), PI - 0.1),
            Particle::new(Point2D::zero(), -PI + 0.1),
        ];
        let exponents = [ProbabilityExponents::zero(); 2];
        let pose = estimate_pose(&particles, &exponents);
        assert!((pose.ang_mean.abs() - PI).abs() < 1e-5);
        assert!((pose.ang_sd - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_equal_weights_statistics() {
        let particles = [
            Particle::new(Point2D::new(-1.0, 10.0), 0.0),
            Particle::new(Point2D::new(1.0, 20.0), 0.0),
            Particle::new(Point2D::new(-1.0, 30.0), 0.0),
            Particle::new(Point2D::new(1.0, 40.0), 0.0),
        ];
        let exponents = [ProbabilityExponents::zero(); 4];
        let pose = estimate_pose(&particles, &exponents);
        assert!(pose.pos_mean.x.abs() < 1e-6);
        assert!((pose.pos_mean.y - 25.0).abs() < 1e-4);
        assert!((pose.pos_sd.x - 1.0).abs() < 1e-5);
        assert!((pose.pos_sd.y - 125.0f32.sqrt()).abs() < 1e-3);

        let packed = [Particle4::from_particles(&particles)];
        let exponents4 = [ProbabilityExponents::<F32x4>::zero()];
        let pose4 = estimate_pose(&packed, &exponents4);
        assert!((pose4.pos_mean.y - pose.pos_mean.y).abs() < 1e-4);
        assert!((pose4.pos_sd.y - pose.pos_sd.y).abs() < 1e-3);
    }

    #[test]
    fn test_pose_difference_wraps_heading() {
        let a = RobotPose::new(Point2D::new(10.0, 5.0), PI - 0.05, Point2D::new(2.0, 2.0), 0.1);
        let b = RobotPose::new(Point2D::new(4.0, 5.0), -PI + 0.05, Point2D::new(1.0, 1.0), 0.05);
        let d = a - b;
        assert_eq!(d.pos_mean, Point2D::new(6.0, 0.0));
        assert!((d.ang_mean + 0.1).abs() < 1e-5);
        assert_eq!(d.pos_sd, Point2D::new(1.0, 1.0));
        assert!((d.ang_sd - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_display() {
        let pose = RobotPose::exact(Particle::new(Point2D::new(1500.0, 1500.0), 0.0));
        let text = pose.to_string();
        assert!(text.contains("position: (1500.000000, 1500.000000)"));
        assert!(text.contains("std dev angle: 0.000000"));
    }
}
