//! Landmark observations and the window the filter evaluates them through.
//!
//! | Item | Role |
//! |---|---|
//! | [`Observation`] | one `(landmark, distance, bearing)` measurement |
//! | [`ObservationWindow`] | clamped cursor over the loaded sequence |
//! | [`load_observations`] / [`save_observations`] | CSV files, one `id,distance,bearing` record per line |
//! | [`synthesize`] | measurements generated from a known pose |

mod io;
mod synth;
mod window;

pub use io::{load_observations, read_observations, save_observations, write_observations};
pub use synth::synthesize;
pub use window::ObservationWindow;

use serde::{Deserialize, Serialize};

use crate::angle::normalize_angle;
use crate::error::{malformed_observation, LocalizationError, Result};

/// A measured distance (mm) and bearing (rad) to a known landmark.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Index into the world's landmark list.
    pub landmark: usize,
    pub distance: f32,
    pub bearing: f32,
}

impl Observation {
    pub fn new(landmark: usize, distance: f32, bearing: f32) -> Self {
        Self {
            landmark,
            distance,
            bearing,
        }
    }

    /// Checks record `index` against a world with `landmark_count` landmarks
    /// and wraps its bearing into `[-π, π]`.
    pub(crate) fn validated(self, index: usize, landmark_count: usize) -> Result<Self> {
        if self.landmark >= landmark_count {
            return Err(LocalizationError::UnknownLandmark {
                index,
                id: self.landmark,
                known: landmark_count,
            });
        }
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(malformed_observation(
                index,
                format!("distance must be positive and finite, got {}", self.distance),
            ));
        }
        if !self.bearing.is_finite() {
            return Err(malformed_observation(
                index,
                format!("bearing must be finite, got {}", self.bearing),
            ));
        }
        Ok(Self {
            bearing: normalize_angle(self.bearing),
            ..self
        })
    }
}
