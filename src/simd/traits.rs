//! Traits that let geometry and filter code be written once for a single
//! `f32` and for a 4-wide [`F32x4`] lane group.
//!
//! The scalar implementation calls the standard library functions and is the
//! reference path. The lane group implementation calls the fast kernels in
//! [`math`](super::math). Code generic over [`Lane`] therefore runs the same
//! algorithm on both paths, only instruction selection differs.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{math, F32x4, Mask4};

/// Boolean result of a lane-wise comparison.
pub trait LaneMask: Copy {
    fn any(self) -> bool;
    fn all(self) -> bool;
}

impl LaneMask for bool {
    #[inline(always)]
    fn any(self) -> bool {
        self
    }

    #[inline(always)]
    fn all(self) -> bool {
        self
    }
}

impl LaneMask for Mask4 {
    #[inline(always)]
    fn any(self) -> bool {
        Mask4::any(self)
    }

    #[inline(always)]
    fn all(self) -> bool {
        Mask4::all(self)
    }
}

/// A value holding one or more independent `f32` lanes.
pub trait Lane:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    type Mask: LaneMask;

    const WIDTH: usize;

    fn splat(value: f32) -> Self;

    fn abs(self) -> Self;

    fn sqrt(self) -> Self;

    fn exp(self) -> Self;

    fn sin(self) -> Self;

    fn cos(self) -> Self;

    /// Four quadrant arctangent of `self / x`.
    fn atan2(self, x: Self) -> Self;

    /// Returns `rhs` when the comparison is unordered.
    fn max(self, rhs: Self) -> Self;

    /// Returns `rhs` when the comparison is unordered.
    fn min(self, rhs: Self) -> Self;

    fn lt(self, rhs: Self) -> Self::Mask;

    fn le(self, rhs: Self) -> Self::Mask;

    fn gt(self, rhs: Self) -> Self::Mask;

    fn ge(self, rhs: Self) -> Self::Mask;

    /// Per lane `mask ? on_true : on_false`.
    fn select(mask: Self::Mask, on_true: Self, on_false: Self) -> Self;

    /// Exact floating point remainder `self % divisor` per lane.
    fn rem(self, divisor: f32) -> Self;

    /// True when every lane lies within `[lo, hi]`. NaN lanes fail.
    fn all_within(self, lo: f32, hi: f32) -> bool;

    /// Sum of all lanes.
    fn reduce_add(self) -> f32;
}

impl Lane for f32 {
    type Mask = bool;

    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        value
    }

    #[inline(always)]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    #[inline(always)]
    fn exp(self) -> Self {
        f32::exp(self)
    }

    #[inline(always)]
    fn sin(self) -> Self {
        f32::sin(self)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        f32::cos(self)
    }

    #[inline(always)]
    fn atan2(self, x: Self) -> Self {
        f32::atan2(self, x)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> bool {
        self < rhs
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> bool {
        self <= rhs
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> bool {
        self > rhs
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> bool {
        self >= rhs
    }

    #[inline(always)]
    fn select(mask: bool, on_true: Self, on_false: Self) -> Self {
        if mask {
            on_true
        } else {
            on_false
        }
    }

    #[inline(always)]
    fn rem(self, divisor: f32) -> Self {
        self % divisor
    }

    #[inline(always)]
    fn all_within(self, lo: f32, hi: f32) -> bool {
        (lo..=hi).contains(&self)
    }

    #[inline(always)]
    fn reduce_add(self) -> f32 {
        self
    }
}

impl Lane for F32x4 {
    type Mask = Mask4;

    const WIDTH: usize = super::LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        F32x4::splat(value)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        math::abs(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        F32x4::sqrt(self)
    }

    #[inline(always)]
    fn exp(self) -> Self {
        math::exp(self)
    }

    #[inline(always)]
    fn sin(self) -> Self {
        math::sin(self)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        math::cos(self)
    }

    #[inline(always)]
    fn atan2(self, x: Self) -> Self {
        math::atan2(self, x)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        F32x4::max(self, rhs)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        F32x4::min(self, rhs)
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Mask4 {
        self.simd_lt(rhs)
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Mask4 {
        self.simd_le(rhs)
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> Mask4 {
        self.simd_gt(rhs)
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Mask4 {
        self.simd_ge(rhs)
    }

    #[inline(always)]
    fn select(mask: Mask4, on_true: Self, on_false: Self) -> Self {
        F32x4::blend(mask, on_true, on_false)
    }

    #[inline(always)]
    fn rem(self, divisor: f32) -> Self {
        self.map(|v| v % divisor)
    }

    #[inline(always)]
    fn all_within(self, lo: f32, hi: f32) -> bool {
        math::inbounds(self, lo, hi)
    }

    #[inline(always)]
    fn reduce_add(self) -> f32 {
        F32x4::reduce_add(self)
    }
}
