use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

use super::backend as be;
use super::LANE_COUNT;

/// Four independent booleans produced by lane-wise comparisons.
///
/// Every lane is either all-ones or all-zeros so the mask can be used directly
/// as a bit pattern by [`F32x4::blend`](super::F32x4::blend).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask4(pub(crate) be::Mask);

impl Mask4 {
    #[inline(always)]
    pub fn all_on() -> Self {
        Self(be::mask_from_array([u32::MAX; LANE_COUNT]))
    }

    #[inline(always)]
    pub fn all_off() -> Self {
        Self(be::mask_from_array([0; LANE_COUNT]))
    }

    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        if value {
            Self::all_on()
        } else {
            Self::all_off()
        }
    }

    #[inline(always)]
    pub fn from_bools(lanes: [bool; LANE_COUNT]) -> Self {
        Self(be::mask_from_array(
            lanes.map(|on| if on { u32::MAX } else { 0 }),
        ))
    }

    #[inline(always)]
    pub fn to_bools(self) -> [bool; LANE_COUNT] {
        be::mask_to_array(self.0).map(|bits| bits != 0)
    }

    #[inline(always)]
    pub fn lane(self, index: usize) -> bool {
        assert!(index < LANE_COUNT, "lane index {index} out of range");
        self.bitmask() & (1 << index) != 0
    }

    /// One bit per lane, lane 0 in bit 0.
    #[inline(always)]
    pub fn bitmask(self) -> u32 {
        be::mask_bits(self.0)
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        self.bitmask() == 0b1111
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    pub fn none(self) -> bool {
        self.bitmask() == 0
    }

    /// Lanes set in `self` and clear in `other`.
    #[inline(always)]
    pub fn and_not(self, other: Self) -> Self {
        self & !other
    }
}

impl PartialEq for Mask4 {
    fn eq(&self, other: &Self) -> bool {
        self.bitmask() == other.bitmask()
    }
}

impl Eq for Mask4 {}

impl fmt::Debug for Mask4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mask4").field(&self.to_bools()).finish()
    }
}

impl BitAnd for Mask4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(be::mask_and(self.0, rhs.0))
    }
}

impl BitOr for Mask4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(be::mask_or(self.0, rhs.0))
    }
}

impl BitXor for Mask4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(be::mask_xor(self.0, rhs.0))
    }
}

impl Not for Mask4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(be::mask_not(self.0))
    }
}

impl BitAndAssign for Mask4 {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitOrAssign for Mask4 {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reductions() {
        let m = Mask4::from_bools([true, false, false, true]);
        assert_eq!(m.bitmask(), 0b1001);
        assert!(m.any());
        assert!(!m.all());
        assert!(!m.none());
        assert!(Mask4::all_on().all());
        assert!(Mask4::all_off().none());
    }

    #[test]
    fn test_logic() {
        let a = Mask4::from_bools([true, true, false, false]);
        let b = Mask4::from_bools([true, false, true, false]);
        assert_eq!((a & b).to_bools(), [true, false, false, false]);
        assert_eq!((a | b).to_bools(), [true, true, true, false]);
        assert_eq!((a ^ b).to_bools(), [false, true, true, false]);
        assert_eq!((!a).to_bools(), [false, false, true, true]);
        assert_eq!(a.and_not(b).to_bools(), [false, true, false, false]);
        assert!(a.lane(1));
        assert!(!a.lane(2));
    }
}
