//! Filter configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! standard 6000×4000 mm field with three landmarks.
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`ParticleSection`] | population size and placement seed |
//! | [`NoiseSection`] | observation standard deviations |
//! | [`WorldSection`] | field, grass, landmarks, actual robot pose |
//! | [`RuntimeSection`] | evaluation mode and frame rate target |
//!
//! ## Example
//!
//! ```yaml
//! particles:
//!   count: 65536
//!   seed: 7
//! noise:
//!   distance_sigma: 0.2
//!   bearing_sigma: 0.05
//! world:
//!   landmarks: [[2600, 700], [2600, -700], [2000, -1000]]
//!   robot_position: [1500, 1500]
//! runtime:
//!   mode: scalar
//!   ideal_fps: 30
//! ```

mod defaults;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{invalid_config, io_error, LocalizationError, Result};
use crate::filter::EvaluationMode;
use crate::geometry::{Point2D, Rectangle};
use crate::particle::Particle;
use crate::simd::LANE_COUNT;

/// Full filter configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub particles: ParticleSection,

    #[serde(default)]
    pub noise: NoiseSection,

    #[serde(default)]
    pub world: WorldSection,

    #[serde(default)]
    pub runtime: RuntimeSection,
}

impl FilterConfig {
    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Self::from_yaml(&contents)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| LocalizationError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LocalizationError::ConfigParse(e.to_string()))
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let count = self.particles.count;
        if count == 0 || count % LANE_COUNT != 0 {
            return Err(invalid_config(format!(
                "particle count must be a positive multiple of {LANE_COUNT}, got {count}"
            )));
        }
        for (name, sigma) in [
            ("distance_sigma", self.noise.distance_sigma),
            ("bearing_sigma", self.noise.bearing_sigma),
        ] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(invalid_config(format!(
                    "{name} must be positive and finite, got {sigma}"
                )));
            }
        }
        if self.world.landmarks.is_empty() {
            return Err(invalid_config("at least one landmark is required"));
        }
        let grass = self.world.grass;
        if !(grass.width() > 0.0 && grass.height() > 0.0) {
            return Err(invalid_config("grass rectangle must have a positive area"));
        }
        if !(self.runtime.ideal_fps.is_finite() && self.runtime.ideal_fps > 0.0) {
            return Err(invalid_config(format!(
                "ideal_fps must be positive, got {}",
                self.runtime.ideal_fps
            )));
        }
        let heading = self.world.robot_heading;
        if !(-std::f32::consts::PI..=std::f32::consts::PI).contains(&heading) {
            return Err(invalid_config(format!(
                "robot heading must lie in [-π, π], got {heading}"
            )));
        }
        Ok(())
    }
}

/// Particle population settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticleSection {
    /// Number of particles, a multiple of 4.
    #[serde(default = "defaults::particle_count")]
    pub count: usize,

    /// Seed for random placement.
    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

impl Default for ParticleSection {
    fn default() -> Self {
        Self {
            count: defaults::particle_count(),
            seed: defaults::seed(),
        }
    }
}

/// Standard deviations of the observation model.
///
/// Distance noise is relative to the distance, bearing noise is a fraction
/// of π.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseSection {
    #[serde(default = "defaults::distance_sigma")]
    pub distance_sigma: f32,

    #[serde(default = "defaults::bearing_sigma")]
    pub bearing_sigma: f32,
}

impl NoiseSection {
    /// `1 / σ_d²`
    pub fn distance_coefficient(&self) -> f32 {
        1.0 / (self.distance_sigma * self.distance_sigma)
    }

    /// `1 / σ_b²`
    pub fn bearing_coefficient(&self) -> f32 {
        1.0 / (self.bearing_sigma * self.bearing_sigma)
    }
}

impl Default for NoiseSection {
    fn default() -> Self {
        Self {
            distance_sigma: defaults::distance_sigma(),
            bearing_sigma: defaults::bearing_sigma(),
        }
    }
}

/// The known world: field bounds, placement bounds, landmark map and the
/// robot's actual pose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSection {
    /// In-bounds area, drawn for reference.
    #[serde(default = "defaults::field")]
    pub field: Rectangle,

    /// Area particles are placed in, slightly larger than the field.
    #[serde(default = "defaults::grass")]
    pub grass: Rectangle,

    /// Landmark positions, indexed by observation landmark id.
    #[serde(default = "defaults::landmarks")]
    pub landmarks: Vec<[f32; 2]>,

    #[serde(default = "defaults::robot_position")]
    pub robot_position: [f32; 2],

    #[serde(default = "defaults::robot_heading")]
    pub robot_heading: f32,
}

impl WorldSection {
    pub fn landmark_points(&self) -> Vec<Point2D> {
        self.landmarks
            .iter()
            .map(|&[x, y]| Point2D::new(x, y))
            .collect()
    }

    pub fn robot(&self) -> Particle {
        let [x, y] = self.robot_position;
        Particle::new(Point2D::new(x, y), self.robot_heading)
    }
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            field: defaults::field(),
            grass: defaults::grass(),
            landmarks: defaults::landmarks(),
            robot_position: defaults::robot_position(),
            robot_heading: defaults::robot_heading(),
        }
    }
}

/// Run-time behaviour of the filter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeSection {
    /// Evaluation path used by [`run`](crate::filter::ParticleFilter::run).
    #[serde(default = "defaults::mode")]
    pub mode: EvaluationMode,

    /// Cycles slower than this rate are logged as warnings.
    #[serde(default = "defaults::ideal_fps")]
    pub ideal_fps: f32,

    /// Upper bound on the window size used when comparing modes.
    #[serde(default = "defaults::comparison_window")]
    pub comparison_window: usize,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            mode: defaults::mode(),
            ideal_fps: defaults::ideal_fps(),
            comparison_window: defaults::comparison_window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.particles.count, 16384);
        assert_eq!(config.world.landmarks.len(), 3);
        assert_eq!(config.runtime.mode, EvaluationMode::Simd);
        assert!((config.noise.distance_coefficient() - 25.0).abs() < 1e-3);
        assert!((config.noise.bearing_coefficient() - 400.0).abs() < 1e-2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = FilterConfig::from_yaml("{}").unwrap();
        assert_eq!(config.particles.seed, 1);
        assert_eq!(config.world.grass, Rectangle::centered(6800.0, 4400.0));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "particles:\n  count: 64\nruntime:\n  mode: scalar\n";
        let config = FilterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.particles.count, 64);
        assert_eq!(config.particles.seed, 1);
        assert_eq!(config.runtime.mode, EvaluationMode::Scalar);
        assert_eq!(config.runtime.ideal_fps, 30.0);
    }

    #[test]
    fn test_rectangle_corners_in_any_order() {
        let yaml = "world:\n  field:\n    corner_a: [10, 10]\n    corner_b: [-10, -10]\n";
        let config = FilterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.world.field.bottom_left(), Point2D::new(-10.0, -10.0));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = FilterConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = FilterConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.particles.count, config.particles.count);
        assert_eq!(parsed.world.landmarks, config.world.landmarks);
        assert_eq!(parsed.world.field, config.world.field);
    }

    #[test]
    fn test_rejects_bad_particle_count() {
        let err = FilterConfig::from_yaml("particles:\n  count: 10\n").unwrap_err();
        assert!(matches!(err, LocalizationError::InvalidConfig { .. }));
        assert!(FilterConfig::from_yaml("particles:\n  count: 0\n").is_err());
    }

    #[test]
    fn test_rejects_bad_sigma_and_landmarks() {
        assert!(FilterConfig::from_yaml("noise:\n  bearing_sigma: 0\n").is_err());
        assert!(FilterConfig::from_yaml("world:\n  landmarks: []\n").is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = FilterConfig::from_yaml("particles: [").unwrap_err();
        assert!(matches!(err, LocalizationError::ConfigParse(_)));
    }
}
