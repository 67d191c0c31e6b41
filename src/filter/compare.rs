use std::fmt;

use tracing::{info, warn};

use super::{EvaluationMode, ParticleFilter, RobotPose};
use crate::harness::abs_diff;
use crate::simd::LANE_COUNT;

/// Agreement between the scalar and the lane group evaluation of one
/// population, in log-space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    /// Particles whose differences were finite.
    pub compared: usize,
    pub nan_count: usize,
    pub max_distance_diff: f32,
    pub avg_distance_diff: f32,
    pub max_bearing_diff: f32,
    pub avg_bearing_diff: f32,
    pub scalar_pose: RobotPose,
    pub simd_pose: RobotPose,
}

impl ComparisonReport {
    /// `simd_pose - scalar_pose`
    pub fn pose_delta(&self) -> RobotPose {
        self.simd_pose - self.scalar_pose
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scalar vs simd comparison")?;
        writeln!(f, "-------------------------")?;
        writeln!(f, "per-particle similarity diff (in log-space):")?;
        writeln!(
            f,
            "max distance diff: {:.6e}, avg distance diff: {:.6e}",
            self.max_distance_diff, self.avg_distance_diff
        )?;
        writeln!(
            f,
            "max bearing diff: {:.6e}, avg bearing diff: {:.6e}",
            self.max_bearing_diff, self.avg_bearing_diff
        )?;
        if self.nan_count != 0 {
            writeln!(f, "found {} NaN differences", self.nan_count)?;
        }
        writeln!(f)?;
        writeln!(f, "scalar pose:\n{}\n", self.scalar_pose)?;
        writeln!(f, "simd pose:\n{}\n", self.simd_pose)?;
        write!(f, "diff pose:\n{}", self.pose_delta())
    }
}

impl ParticleFilter<'_> {
    /// Runs a scalar cycle and a lane group cycle over the current window and
    /// compares the per-particle exponents and the two estimates. The
    /// selected mode is restored afterwards.
    pub fn compare_modes(&mut self) -> ComparisonReport {
        let previous = self.mode;

        self.mode = EvaluationMode::Scalar;
        let scalar_pose = self.run();
        self.mode = EvaluationMode::Simd;
        let simd_pose = self.run();
        self.mode = previous;

        let mut compared = 0usize;
        let mut nan_count = 0usize;
        let mut total_distance_diff = 0.0f64;
        let mut total_bearing_diff = 0.0f64;
        let mut max_distance_diff = 0.0f32;
        let mut max_bearing_diff = 0.0f32;

        let scalar_groups = self.exponents.chunks_exact(LANE_COUNT);
        for (group, e4) in scalar_groups.zip(self.exponents4.iter()) {
            for (lane, a) in group.iter().enumerate() {
                let b = e4.lane(lane);
                let distance_diff = abs_diff(a.distance, b.distance);
                let bearing_diff = abs_diff(a.bearing, b.bearing);
                if (distance_diff + bearing_diff).is_nan() {
                    nan_count += 1;
                    continue;
                }
                compared += 1;
                total_distance_diff += f64::from(distance_diff);
                total_bearing_diff += f64::from(bearing_diff);
                max_distance_diff = max_distance_diff.max(distance_diff);
                max_bearing_diff = max_bearing_diff.max(bearing_diff);
            }
        }

        let average = |total: f64| {
            if compared == 0 {
                0.0
            } else {
                (total / compared as f64) as f32
            }
        };
        let report = ComparisonReport {
            compared,
            nan_count,
            max_distance_diff,
            avg_distance_diff: average(total_distance_diff),
            max_bearing_diff,
            avg_bearing_diff: average(total_bearing_diff),
            scalar_pose,
            simd_pose,
        };

        if nan_count != 0 {
            warn!(nan_count, "scalar and simd exponents disagree with NaNs");
        }
        info!(
            window = %self.window,
            max_distance_diff,
            max_bearing_diff,
            "compared evaluation modes"
        );
        report
    }
}
