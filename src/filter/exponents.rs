use std::fmt;
use std::ops::{Add, AddAssign};

use crate::simd::{F32x4, Lane};

/// Accumulated distance and bearing log-similarity of one particle (or of
/// four particles lane-wise).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProbabilityExponents<T = f32> {
    pub distance: T,
    pub bearing: T,
}

pub type ProbabilityExponents4 = ProbabilityExponents<F32x4>;

impl<T: Lane> ProbabilityExponents<T> {
    #[inline]
    pub fn new(distance: T, bearing: T) -> Self {
        Self { distance, bearing }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::splat(0.0), T::splat(0.0))
    }

    /// Combined exponent; `exp` of it is the particle weight.
    #[inline]
    pub fn total(&self) -> T {
        self.distance + self.bearing
    }
}

impl ProbabilityExponents4 {
    #[inline]
    pub fn lane(&self, index: usize) -> ProbabilityExponents {
        ProbabilityExponents::new(self.distance.lane(index), self.bearing.lane(index))
    }
}

impl<T: Lane> Add for ProbabilityExponents<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.distance + rhs.distance, self.bearing + rhs.bearing)
    }
}

impl<T: Lane> AddAssign for ProbabilityExponents<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Which part of the similarity a per-particle weight is derived from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SimilarityView {
    #[default]
    DistanceAndBearing,
    Distance,
    Bearing,
    /// Every particle at full weight.
    AllParticles,
}

impl SimilarityView {
    pub const ALL: [SimilarityView; 4] = [
        SimilarityView::DistanceAndBearing,
        SimilarityView::Distance,
        SimilarityView::Bearing,
        SimilarityView::AllParticles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SimilarityView::DistanceAndBearing => "distance and bearing",
            SimilarityView::Distance => "distance",
            SimilarityView::Bearing => "bearing",
            SimilarityView::AllParticles => "all particles",
        }
    }

    /// Cycles through the views round-robin.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Exponent this view weighs a particle by.
    #[inline]
    pub fn exponent<T: Lane>(self, e: &ProbabilityExponents<T>) -> T {
        match self {
            SimilarityView::DistanceAndBearing => e.total(),
            SimilarityView::Distance => e.distance,
            SimilarityView::Bearing => e.bearing,
            SimilarityView::AllParticles => T::splat(0.0),
        }
    }

    #[inline]
    pub fn weight<T: Lane>(self, e: &ProbabilityExponents<T>) -> T {
        self.exponent(e).exp()
    }
}

impl fmt::Display for SimilarityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
