use std::fmt;
use std::ops::{Add, AddAssign, BitAnd, BitOr, BitXor, Neg, Not, Sub, SubAssign};

use super::backend as be;
use super::{shuffle_mask, F32x4, Mask4, LANE_COUNT};

/// A lane group of 4 signed 32-bit integers with wrapping arithmetic.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(pub(crate) be::I32);

impl I32x4 {
    #[inline(always)]
    pub fn splat(value: i32) -> Self {
        Self(be::splat_i(value))
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(0)
    }

    #[inline(always)]
    pub fn new(l0: i32, l1: i32, l2: i32, l3: i32) -> Self {
        Self(be::from_array_i([l0, l1, l2, l3]))
    }

    #[inline(always)]
    pub fn from_array(lanes: [i32; LANE_COUNT]) -> Self {
        Self(be::from_array_i(lanes))
    }

    #[inline(always)]
    pub fn to_array(self) -> [i32; LANE_COUNT] {
        be::to_array_i(self.0)
    }

    #[inline(always)]
    pub fn lane(self, index: usize) -> i32 {
        self.to_array()[index]
    }

    /// Converts every lane to the nearest float.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        F32x4(be::cvt_i2f(self.0))
    }

    /// Reinterprets the lanes as floats without conversion.
    #[inline(always)]
    pub fn to_bits_f32(self) -> F32x4 {
        F32x4::from_bits(self)
    }

    #[inline(always)]
    pub fn shl<const BITS: i32>(self) -> Self {
        Self(be::shl_i::<BITS>(self.0))
    }

    /// Logical shift, the vacated high bits are zero.
    #[inline(always)]
    pub fn shr<const BITS: i32>(self) -> Self {
        Self(be::shr_i::<BITS>(self.0))
    }

    #[inline(always)]
    pub fn simd_eq(self, rhs: Self) -> Mask4 {
        Mask4(be::eq_i(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_ne(self, rhs: Self) -> Mask4 {
        !self.simd_eq(rhs)
    }

    #[inline(always)]
    pub fn simd_lt(self, rhs: Self) -> Mask4 {
        Mask4(be::lt_i(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_gt(self, rhs: Self) -> Mask4 {
        Mask4(be::gt_i(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn simd_le(self, rhs: Self) -> Mask4 {
        !self.simd_gt(rhs)
    }

    #[inline(always)]
    pub fn simd_ge(self, rhs: Self) -> Mask4 {
        !self.simd_lt(rhs)
    }

    #[inline(always)]
    pub fn blend(mask: Mask4, on_true: Self, on_false: Self) -> Self {
        Self(be::blend_i(mask.0, on_true.0, on_false.0))
    }

    #[inline(always)]
    pub fn shuffle<const MASK: i32>(self) -> Self {
        Self(be::shuffle_i::<MASK>(self.0))
    }

    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        Self::blend(self.simd_lt(rhs), self, rhs)
    }

    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self::blend(self.simd_gt(rhs), self, rhs)
    }

    /// Wrapping sum of the 4 lanes.
    #[inline(always)]
    pub fn reduce_add(self) -> i32 {
        let pairs = self + self.shuffle::<{ shuffle_mask(1, 0, 3, 2) }>();
        (pairs + pairs.shuffle::<{ shuffle_mask(2, 3, 0, 1) }>()).lane(0)
    }

    /// Lanes whose sign bit is set.
    #[inline(always)]
    pub fn sign_bit(self) -> Mask4 {
        self.shr::<31>().simd_ne(Self::zero())
    }
}

impl Default for I32x4 {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for I32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("I32x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for I32x4 {
    fn eq(&self, other: &Self) -> bool {
        self.simd_eq(*other).all()
    }
}

impl Eq for I32x4 {}

impl Add for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(be::add_i(self.0, rhs.0))
    }
}

impl Sub for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(be::sub_i(self.0, rhs.0))
    }
}

impl AddAssign for I32x4 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for I32x4 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self::zero() - self
    }
}

impl BitAnd for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(be::and_i(self.0, rhs.0))
    }
}

impl BitOr for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(be::or_i(self.0, rhs.0))
    }
}

impl BitXor for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(be::xor_i(self.0, rhs.0))
    }
}

impl Not for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self ^ Self::splat(-1)
    }
}
