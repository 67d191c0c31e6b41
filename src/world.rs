//! The known environment the filter localizes in.
//!
//! ```text
//!                +---------+
//!                |         |
//!  y             |         |
//!  ^             |    O    |    O: origin at the centre of the field
//!  |             |         |
//!  +---> x       +---------+
//! ```

use crate::config::WorldSection;
use crate::geometry::{Point2D, Rectangle};
use crate::particle::Particle;

#[derive(Clone, Debug, PartialEq)]
pub struct World {
    field: Rectangle,
    grass: Rectangle,
    landmarks: Vec<Point2D>,
    actual_pose: Particle,
}

impl World {
    pub fn new(
        field: Rectangle,
        grass: Rectangle,
        landmarks: Vec<Point2D>,
        actual_pose: Particle,
    ) -> Self {
        Self {
            field,
            grass,
            landmarks,
            actual_pose,
        }
    }

    pub fn from_config(section: &WorldSection) -> Self {
        Self::new(
            section.field,
            section.grass,
            section.landmark_points(),
            section.robot(),
        )
    }

    /// In-bounds playing area.
    pub fn field(&self) -> Rectangle {
        self.field
    }

    /// Region particles are placed in.
    pub fn grass(&self) -> Rectangle {
        self.grass
    }

    pub fn landmarks(&self) -> &[Point2D] {
        &self.landmarks
    }

    /// Position of landmark `id`, if registered.
    pub fn landmark(&self, id: usize) -> Option<Point2D> {
        self.landmarks.get(id).copied()
    }

    /// Where the robot actually is, for display and evaluation.
    pub fn actual_pose(&self) -> Particle {
        self.actual_pose
    }
}

impl Default for World {
    fn default() -> Self {
        Self::from_config(&WorldSection::default())
    }
}
