use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Not, Sub,
    SubAssign,
};

use super::backend as be;
use super::{shuffle_mask, I32x4, Mask4, LANE_COUNT};

const SIGN_BIT: u32 = 0x8000_0000;

/// A lane group of 4 single precision floats.
///
/// Arithmetic is IEEE per lane. Bitwise operators act on the raw bit
/// patterns, which is how the kernels in [`math`](super::math) manipulate
/// signs and exponents without branching.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(pub(crate) be::F32);

impl F32x4 {
    #[inline(always)]
    pub fn splat(value: f32) -> Self {
        Self(be::splat_f(value))
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(0.0)
    }

    #[inline(always)]
    pub fn new(l0: f32, l1: f32, l2: f32, l3: f32) -> Self {
        Self(be::from_array_f([l0, l1, l2, l3]))
    }

    #[inline(always)]
    pub fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        Self(be::from_array_f(lanes))
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; LANE_COUNT] {
        be::to_array_f(self.0)
    }

    /// Builds a lane group from a bit pattern repeated in every lane.
    #[inline(always)]
    pub fn splat_bits(bits: u32) -> Self {
        Self::splat(f32::from_bits(bits))
    }

    /// Loads the first 4 values of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer than 4 values.
    #[inline(always)]
    pub fn load(slice: &[f32]) -> Self {
        assert!(
            slice.len() >= LANE_COUNT,
            "Size must be >= {LANE_COUNT}, got {}",
            slice.len()
        );
        Self::new(slice[0], slice[1], slice[2], slice[3])
    }

    /// Writes the 4 lanes into the front of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer than 4 values.
    #[inline(always)]
    pub fn store(self, slice: &mut [f32]) {
        assert!(
            slice.len() >= LANE_COUNT,
            "Size must be >= {LANE_COUNT}, got {}",
            slice.len()
        );
        slice[..LANE_COUNT].copy_from_slice(&self.to_array());
    }

    #[inline(always)]
    pub fn lane(self, index: usize) -> f32 {
        self.to_array()[index]
    }

    /// Returns a copy with lane `index` replaced.
    #[inline(always)]
    pub fn with_lane(self, index: usize, value: f32) -> Self {
        let mut lanes = self.to_array();
        lanes[index] = value;
        Self::from_array(lanes)
    }

    /// Applies a scalar function to every lane.
    #[inline(always)]
    pub fn map(self, op: impl Fn(f32) -> f32) -> Self {
        Self::from_array(self.to_array().map(op))
    }

    #[inline(always)]
    pub fn simd_eq(self, rhs: Self) -> Mask4 {
        Mask4(be::eq_f(self.0, rhs.0))
    }

    /// True for unordered lanes too.
    #[inline(always)]
    pub fn simd_ne(self, rhs: Self) -> Mask4 {
        Mask4(be::ne_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_lt(self, rhs: Self) -> Mask4 {
        Mask4(be::lt_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_le(self, rhs: Self) -> Mask4 {
        Mask4(be::le_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_gt(self, rhs: Self) -> Mask4 {
        Mask4(be::gt_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_ge(self, rhs: Self) -> Mask4 {
        Mask4(be::ge_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn is_nan(self) -> Mask4 {
        self.simd_ne(self)
    }

    /// Lanes inside the closed interval `[lo, hi]`.
    #[inline(always)]
    pub fn in_range(self, lo: f32, hi: f32) -> Mask4 {
        self.simd_ge(Self::splat(lo)) & self.simd_le(Self::splat(hi))
    }

    /// Lanes inside the open interval `(lo, hi)`.
    #[inline(always)]
    pub fn ex_range(self, lo: f32, hi: f32) -> Mask4 {
        self.simd_gt(Self::splat(lo)) & self.simd_lt(Self::splat(hi))
    }

    /// Lanes whose sign bit is set, including `-0.0` and negative NaNs.
    #[inline(always)]
    pub fn sign_bit(self) -> Mask4 {
        self.to_bits().shr::<31>().simd_ne(I32x4::zero())
    }

    /// Per lane `mask ? on_true : on_false`.
    #[inline(always)]
    pub fn blend(mask: Mask4, on_true: Self, on_false: Self) -> Self {
        Self(be::blend_f(mask.0, on_true.0, on_false.0))
    }

    /// Lane permutation; build `MASK` with [`shuffle_mask`].
    #[inline(always)]
    pub fn shuffle<const MASK: i32>(self) -> Self {
        Self(be::shuffle_f::<MASK>(self.0))
    }

    /// Lane-wise minimum; returns `rhs` when the lanes are unordered.
    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        Self(be::min_f(self.0, rhs.0))
    }

    /// Lane-wise maximum; returns `rhs` when the lanes are unordered.
    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self(be::max_f(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(be::sqrt_f(self.0))
    }

    /// Backend reciprocal estimate, see [`math::approx_rcp`](super::math::approx_rcp).
    #[inline(always)]
    pub fn rcp_estimate(self) -> Self {
        Self(be::rcp_f(self.0))
    }

    /// `!self & rhs` on the bit patterns.
    #[inline(always)]
    pub fn and_not(self, rhs: Self) -> Self {
        Self(be::andnot_f(self.0, rhs.0))
    }

    /// `(l0 + l1) + (l2 + l3)`, in that order on every backend.
    #[inline(always)]
    pub fn reduce_add(self) -> f32 {
        let pairs = self + self.shuffle::<{ shuffle_mask(1, 0, 3, 2) }>();
        (pairs + pairs.shuffle::<{ shuffle_mask(2, 3, 0, 1) }>()).lane(0)
    }

    #[inline(always)]
    pub fn reduce_mul(self) -> f32 {
        let pairs = self * self.shuffle::<{ shuffle_mask(1, 0, 3, 2) }>();
        (pairs * pairs.shuffle::<{ shuffle_mask(2, 3, 0, 1) }>()).lane(0)
    }

    #[inline(always)]
    pub fn reduce_min(self) -> f32 {
        let pairs = self.min(self.shuffle::<{ shuffle_mask(1, 0, 3, 2) }>());
        pairs
            .min(pairs.shuffle::<{ shuffle_mask(2, 3, 0, 1) }>())
            .lane(0)
    }

    #[inline(always)]
    pub fn reduce_max(self) -> f32 {
        let pairs = self.max(self.shuffle::<{ shuffle_mask(1, 0, 3, 2) }>());
        pairs
            .max(pairs.shuffle::<{ shuffle_mask(2, 3, 0, 1) }>())
            .lane(0)
    }

    /// Reinterprets the lanes as integers without conversion.
    #[inline(always)]
    pub fn to_bits(self) -> I32x4 {
        I32x4(be::bits_f2i(self.0))
    }

    #[inline(always)]
    pub fn from_bits(bits: I32x4) -> Self {
        Self(be::bits_i2f(bits.0))
    }

    /// Rounds to the nearest integer, ties to even.
    #[inline(always)]
    pub fn round_to_i32(self) -> I32x4 {
        I32x4(be::round_f2i(self.0))
    }
}

impl Default for F32x4 {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for F32x4 {
    /// All lanes compare equal (IEEE, so a NaN lane is never equal).
    fn eq(&self, other: &Self) -> bool {
        F32x4::simd_eq(*self, *other).all()
    }
}

impl From<[f32; LANE_COUNT]> for F32x4 {
    fn from(lanes: [f32; LANE_COUNT]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<f32> for F32x4 {
    fn from(value: f32) -> Self {
        Self::splat(value)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:path) => {
        impl $trait for F32x4 {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self($op(self.0, rhs.0))
            }
        }

        impl $trait<f32> for F32x4 {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: f32) -> Self {
                Self($op(self.0, be::splat_f(rhs)))
            }
        }

        impl $assign_trait for F32x4 {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = Self($op(self.0, rhs.0));
            }
        }

        impl $assign_trait<f32> for F32x4 {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: f32) {
                *self = Self($op(self.0, be::splat_f(rhs)));
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, be::add_f);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, be::sub_f);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, be::mul_f);
impl_binary_op!(Div, div, DivAssign, div_assign, be::div_f);

impl Neg for F32x4 {
    type Output = Self;

    /// Flips the sign bit, so `-0.0` and NaN payloads behave like scalar negation.
    #[inline(always)]
    fn neg(self) -> Self {
        self ^ Self::splat_bits(SIGN_BIT)
    }
}

impl BitAnd for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(be::and_f(self.0, rhs.0))
    }
}

impl BitOr for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(be::or_f(self.0, rhs.0))
    }
}

impl BitXor for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(be::xor_f(self.0, rhs.0))
    }
}

impl Not for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self ^ Self::splat_bits(u32::MAX)
    }
}
