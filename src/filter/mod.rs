//! The particle filter: a fixed population of pose hypotheses re-weighted
//! against a window of landmark observations every cycle.
//!
//! The population is held twice, once as single particles and once packed
//! four to a [`Particle4`], and the filter evaluates whichever layout the
//! current [`EvaluationMode`] selects:
//!
//! | Mode | Layout | Kernels |
//! |---|---|---|
//! | [`EvaluationMode::Scalar`] | `[Particle]` | standard library `f32` functions |
//! | [`EvaluationMode::Simd`] | `[Particle4]` | fast lane group kernels in [`simd::math`](crate::simd::math) |
//!
//! Both layouts describe the same particles and both paths run the same
//! generic code, so their results agree to within the kernels' error
//! bounds. [`ParticleFilter::compare_modes`] measures that agreement.
//!
//! One cycle ([`ParticleFilter::run`]):
//!
//! 1. reset every accumulator to zero,
//! 2. for each observation in the window and each particle, add the
//!    distance and bearing log-similarity of the particle's expected
//!    measurement,
//! 3. estimate the pose from the weights `exp(distance + bearing)`.
//!
//! The population is never resampled; it only changes when
//! [`ParticleFilter::initialize`] scatters a new one.

mod compare;
mod estimate;
mod exponents;
mod similarity;

pub use compare::ComparisonReport;
pub use estimate::{estimate_pose, RobotPose};
pub use exponents::{ProbabilityExponents, ProbabilityExponents4, SimilarityView};
pub use similarity::{bearing_exponent, distance_exponent};

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FilterConfig;
use crate::error::{malformed_observation, Result};
use crate::geometry::{Point2, Point2D, Rectangle};
use crate::observation::{Observation, ObservationWindow};
use crate::particle::{Particle, Particle4};
use crate::simd::{backend_name, Lane, LANE_COUNT};
use crate::world::World;

/// Particles whose display weight falls below this are not worth drawing.
pub const PARTICLE_WEIGHT_THRESHOLD: f32 = 0.01;

/// Which code path evaluates the population.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    Scalar,
    #[default]
    Simd,
}

impl EvaluationMode {
    pub fn name(self) -> &'static str {
        match self {
            EvaluationMode::Scalar => "scalar",
            EvaluationMode::Simd => "simd",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            EvaluationMode::Scalar => EvaluationMode::Simd,
            EvaluationMode::Simd => EvaluationMode::Scalar,
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(EvaluationMode::Scalar),
            "simd" | "sse" | "neon" => Ok(EvaluationMode::Simd),
            other => Err(format!("unknown evaluation mode '{other}' (expected scalar or simd)")),
        }
    }
}

/// `k_d` and `k_b` of the similarity exponents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub distance: f32,
    pub bearing: f32,
}

/// Particle filter context: owns the population, its accumulators and the
/// observation window, and borrows the observation sequence.
pub struct ParticleFilter<'obs> {
    world: World,
    observations: &'obs [Observation],
    window: ObservationWindow,
    particles: Box<[Particle]>,
    exponents: Box<[ProbabilityExponents]>,
    particles4: Box<[Particle4]>,
    exponents4: Box<[ProbabilityExponents4]>,
    mode: EvaluationMode,
    coefficients: Coefficients,
    ideal_fps: f32,
    last_fps: f32,
}

impl<'obs> ParticleFilter<'obs> {
    /// Builds a filter over `observations` and scatters the population with
    /// the configured seed.
    ///
    /// Fails if the configuration is invalid or an observation references a
    /// landmark the world does not have.
    pub fn new(config: &FilterConfig, observations: &'obs [Observation]) -> Result<Self> {
        config.validate()?;
        let world = World::from_config(&config.world);

        let landmark_count = world.landmarks().len();
        for (index, obs) in observations.iter().enumerate() {
            let checked = obs.validated(index, landmark_count)?;
            if checked.bearing != obs.bearing {
                return Err(malformed_observation(
                    index,
                    format!("bearing {} outside [-π, π]", obs.bearing),
                ));
            }
        }

        let count = config.particles.count;
        let mut filter = Self {
            world,
            observations,
            window: ObservationWindow::initial(observations.len()),
            particles: vec![Particle::default(); count].into_boxed_slice(),
            exponents: vec![ProbabilityExponents::default(); count].into_boxed_slice(),
            particles4: vec![Particle4::default(); count / LANE_COUNT].into_boxed_slice(),
            exponents4: vec![ProbabilityExponents4::default(); count / LANE_COUNT]
                .into_boxed_slice(),
            mode: config.runtime.mode,
            coefficients: Coefficients {
                distance: config.noise.distance_coefficient(),
                bearing: config.noise.bearing_coefficient(),
            },
            ideal_fps: config.runtime.ideal_fps,
            last_fps: 0.0,
        };
        filter.initialize(config.particles.seed);

        info!(
            particles = count,
            observations = observations.len(),
            landmarks = landmark_count,
            mode = %filter.mode,
            backend = backend_name(),
            "particle filter ready"
        );
        Ok(filter)
    }

    /// Scatters a fresh population uniformly over the grass with a
    /// deterministic `seed`, then packs it into lane groups.
    pub fn initialize(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let grass = self.world.grass();
        for p in self.particles.iter_mut() {
            *p = Particle::place_randomly(&grass, &mut rng);
        }
        for (group, chunk) in self
            .particles4
            .iter_mut()
            .zip(self.particles.chunks_exact(LANE_COUNT))
        {
            *group = Particle4::from_particles(&[chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        self.exponents.fill(ProbabilityExponents::zero());
        self.exponents4.fill(ProbabilityExponents4::zero());
        debug!(seed, particles = self.particles.len(), "particles initialized");
    }

    /// Runs one full cycle in the current mode and returns the estimate.
    pub fn run(&mut self) -> RobotPose {
        let start = Instant::now();
        let pose = match self.mode {
            EvaluationMode::Scalar => {
                self.evaluate_scalar();
                self.estimate_pose_scalar()
            }
            EvaluationMode::Simd => {
                self.evaluate_simd();
                self.estimate_pose_simd()
            }
        };
        let seconds = start.elapsed().as_secs_f32();
        self.last_fps = 1.0 / seconds;

        if self.last_fps < self.ideal_fps {
            warn!(mode = %self.mode, seconds, "inner loop exceeded time threshold");
        } else {
            debug!(mode = %self.mode, seconds, "inner loop");
        }
        pose
    }

    /// Recomputes the scalar accumulators over the current window.
    pub fn evaluate_scalar(&mut self) {
        let active = &self.observations[self.window.range()];
        evaluate(
            &self.particles,
            &mut self.exponents,
            active,
            self.world.landmarks(),
            self.coefficients,
        );
    }

    /// Recomputes the lane group accumulators over the current window.
    pub fn evaluate_simd(&mut self) {
        let active = &self.observations[self.window.range()];
        evaluate(
            &self.particles4,
            &mut self.exponents4,
            active,
            self.world.landmarks(),
            self.coefficients,
        );
    }

    pub fn estimate_pose_scalar(&self) -> RobotPose {
        estimate_pose(&self.particles, &self.exponents)
    }

    pub fn estimate_pose_simd(&self) -> RobotPose {
        estimate_pose(&self.particles4, &self.exponents4)
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EvaluationMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> EvaluationMode {
        self.mode = self.mode.toggled();
        debug!(mode = %self.mode, "evaluation mode toggled");
        self.mode
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    /// Navigation handle for the observation window; takes effect on the
    /// next cycle.
    pub fn window_mut(&mut self) -> &mut ObservationWindow {
        &mut self.window
    }

    pub fn observations(&self) -> &'obs [Observation] {
        self.observations
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn exponents(&self) -> &[ProbabilityExponents] {
        &self.exponents
    }

    pub fn particles4(&self) -> &[Particle4] {
        &self.particles4
    }

    pub fn exponents4(&self) -> &[ProbabilityExponents4] {
        &self.exponents4
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn field(&self) -> Rectangle {
        self.world.field()
    }

    pub fn grass(&self) -> Rectangle {
        self.world.grass()
    }

    pub fn landmarks(&self) -> &[Point2D] {
        self.world.landmarks()
    }

    pub fn actual_pose(&self) -> RobotPose {
        RobotPose::exact(self.world.actual_pose())
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    /// Throughput of the last [`run`](Self::run), in cycles per second.
    pub fn last_fps(&self) -> f32 {
        self.last_fps
    }

    /// Every particle with its weight under `view`, read from the layout of
    /// the current mode.
    pub fn weighted_particles(&self, view: SimilarityView) -> Vec<(Particle, f32)> {
        match self.mode {
            EvaluationMode::Scalar => self
                .particles
                .iter()
                .zip(self.exponents.iter())
                .map(|(p, e)| (*p, view.weight(e)))
                .collect(),
            EvaluationMode::Simd => self
                .particles4
                .iter()
                .zip(self.exponents4.iter())
                .flat_map(|(p4, e4)| {
                    let w4 = view.weight(e4);
                    (0..LANE_COUNT).map(move |lane| (p4.lane(lane), w4.lane(lane)))
                })
                .collect(),
        }
    }
}

/// Zeroes `exponents` and accumulates the similarity of every particle to
/// every observation in `observations`.
fn evaluate<T: Lane>(
    particles: &[Particle<T>],
    exponents: &mut [ProbabilityExponents<T>],
    observations: &[Observation],
    landmarks: &[Point2D],
    coefficients: Coefficients,
) {
    exponents.fill(ProbabilityExponents::zero());

    let k_d = T::splat(coefficients.distance);
    let k_b = T::splat(coefficients.bearing);
    for obs in observations {
        let observed_distance = T::splat(obs.distance);
        let observed_bearing = T::splat(obs.bearing);
        let landmark = Point2::<T>::expand(landmarks[obs.landmark]);

        for (p, e) in particles.iter().zip(exponents.iter_mut()) {
            let expected_distance = p.distance_to(landmark);
            let expected_bearing = p.bearing_to(landmark);
            *e += ProbabilityExponents::new(
                distance_exponent(expected_distance, observed_distance, k_d),
                bearing_exponent(expected_bearing, observed_bearing, k_b),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizationError;

    fn small_config(count: usize) -> FilterConfig {
        let mut config = FilterConfig::default();
        config.particles.count = count;
        config
    }

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new(0, 1360.15, -0.6288),
            Observation::new(1, 2476.0, -1.1184),
            Observation::new(2, 2594.2, -1.3633),
        ]
    }

    #[test]
    fn test_mode_parse_and_toggle() {
        assert_eq!("scalar".parse::<EvaluationMode>(), Ok(EvaluationMode::Scalar));
        assert_eq!("SSE".parse::<EvaluationMode>(), Ok(EvaluationMode::Simd));
        assert!("gpu".parse::<EvaluationMode>().is_err());
        assert_eq!(EvaluationMode::Simd.toggled(), EvaluationMode::Scalar);
        assert_eq!(EvaluationMode::Scalar.to_string(), "scalar");
    }

    #[test]
    fn test_rejects_unknown_landmark() {
        let obs = vec![Observation::new(5, 100.0, 0.0)];
        let err = ParticleFilter::new(&small_config(16), &obs).err();
        assert!(matches!(
            err,
            Some(LocalizationError::UnknownLandmark { id: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_unnormalized_bearing() {
        let obs = vec![Observation::new(0, 100.0, 4.0)];
        assert!(ParticleFilter::new(&small_config(16), &obs).is_err());
    }

    #[test]
    fn test_layouts_hold_same_population() {
        let obs = observations();
        let filter = ParticleFilter::new(&small_config(64), &obs).unwrap();
        assert_eq!(filter.particles().len(), 64);
        assert_eq!(filter.particles4().len(), 16);
        for (i, p4) in filter.particles4().iter().enumerate() {
            for lane in 0..LANE_COUNT {
                assert_eq!(p4.lane(lane), filter.particles()[i * LANE_COUNT + lane]);
            }
        }
    }

    #[test]
    fn test_initialize_is_deterministic() {
        let obs = observations();
        let mut a = ParticleFilter::new(&small_config(32), &obs).unwrap();
        let b = ParticleFilter::new(&small_config(32), &obs).unwrap();
        assert_eq!(a.particles(), b.particles());
        a.initialize(99);
        assert_ne!(a.particles(), b.particles());
    }

    #[test]
    fn test_accumulators_reset_each_cycle() {
        let obs = observations();
        let mut filter = ParticleFilter::new(&small_config(16), &obs).unwrap();
        filter.evaluate_scalar();
        let first = filter.exponents().to_vec();
        filter.evaluate_scalar();
        assert_eq!(filter.exponents(), first.as_slice());
        assert!(first.iter().all(|e| e.distance <= 0.0 && e.bearing <= 0.0));
    }

    #[test]
    fn test_mode_switch_keeps_population() {
        let obs = observations();
        let mut filter = ParticleFilter::new(&small_config(16), &obs).unwrap();
        let before = filter.particles().to_vec();
        assert_eq!(filter.mode(), EvaluationMode::Simd);
        filter.run();
        assert_eq!(filter.toggle_mode(), EvaluationMode::Scalar);
        filter.run();
        assert_eq!(filter.particles(), before.as_slice());
        assert!(filter.last_fps() > 0.0);
    }

    #[test]
    fn test_weighted_particles_both_modes() {
        let obs = observations();
        let mut filter = ParticleFilter::new(&small_config(16), &obs).unwrap();
        filter.window_mut().grow();
        filter.evaluate_scalar();
        filter.evaluate_simd();

        filter.set_mode(EvaluationMode::Scalar);
        let scalar = filter.weighted_particles(SimilarityView::Distance);
        filter.set_mode(EvaluationMode::Simd);
        let simd = filter.weighted_particles(SimilarityView::Distance);
        assert_eq!(scalar.len(), 16);
        assert_eq!(simd.len(), 16);
        for ((p, w), (q, v)) in scalar.iter().zip(&simd) {
            assert_eq!(p, q);
            assert!((w - v).abs() <= 1e-5 + 1e-4 * w.abs());
        }

        let all = filter.weighted_particles(SimilarityView::AllParticles);
        assert!(all.iter().all(|(_, w)| *w == 1.0));
    }

    #[test]
    fn test_empty_observations() {
        let mut filter = ParticleFilter::new(&small_config(16), &[]).unwrap();
        assert_eq!(filter.window().size(), 0);
        let pose = filter.run();
        assert!(filter.grass().contains(pose.pos_mean));
    }
}
