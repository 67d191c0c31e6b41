//! Monte-Carlo robot localization with a scalar and a 4-wide SIMD
//! evaluation path.
//!
//! A fixed population of pose hypotheses is weighted against bearing and
//! distance observations of known landmarks, and the weighted population
//! yields a pose estimate with its spread. The same generic code runs over
//! single `f32` values (standard library math) and over [`simd::F32x4`]
//! lane groups (fast polynomial kernels), and the two paths are expected to
//! agree within the kernels' error bounds.
//!
//! ```no_run
//! use simdloc::config::FilterConfig;
//! use simdloc::filter::ParticleFilter;
//! use simdloc::observation::load_observations;
//!
//! # fn main() -> simdloc::error::Result<()> {
//! let config = FilterConfig::default();
//! let observations = load_observations("sim_obs.csv", config.world.landmarks.len())?;
//! let mut filter = ParticleFilter::new(&config, &observations)?;
//! filter.window_mut().grow();
//! println!("{}", filter.run());
//! # Ok(())
//! # }
//! ```

pub mod angle;
pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod harness;
pub mod observation;
pub mod particle;
pub mod simd;
pub mod world;
