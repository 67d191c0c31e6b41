//! AArch64 NEON backend for the 4-wide lane groups.
//!
//! NEON's `vminq`/`vmaxq` propagate NaN from either operand while the SSE
//! instructions return the second operand; `min_f`/`max_f` are built from a
//! compare and a bit select so both backends agree lane for lane.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

pub type F32 = float32x4_t;
pub type I32 = int32x4_t;
pub type Mask = uint32x4_t;

#[inline(always)]
fn u(v: F32) -> uint32x4_t {
    unsafe { vreinterpretq_u32_f32(v) }
}

#[inline(always)]
fn f(v: uint32x4_t) -> F32 {
    unsafe { vreinterpretq_f32_u32(v) }
}

#[inline(always)]
pub fn splat_f(value: f32) -> F32 {
    unsafe { vdupq_n_f32(value) }
}

#[inline(always)]
pub fn from_array_f(values: [f32; 4]) -> F32 {
    unsafe { vld1q_f32(values.as_ptr()) }
}

#[inline(always)]
pub fn to_array_f(v: F32) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    unsafe { vst1q_f32(out.as_mut_ptr(), v) };
    out
}

#[inline(always)]
pub fn add_f(a: F32, b: F32) -> F32 {
    unsafe { vaddq_f32(a, b) }
}

#[inline(always)]
pub fn sub_f(a: F32, b: F32) -> F32 {
    unsafe { vsubq_f32(a, b) }
}

#[inline(always)]
pub fn mul_f(a: F32, b: F32) -> F32 {
    unsafe { vmulq_f32(a, b) }
}

#[inline(always)]
pub fn div_f(a: F32, b: F32) -> F32 {
    unsafe { vdivq_f32(a, b) }
}

#[inline(always)]
pub fn and_f(a: F32, b: F32) -> F32 {
    unsafe { f(vandq_u32(u(a), u(b))) }
}

#[inline(always)]
pub fn or_f(a: F32, b: F32) -> F32 {
    unsafe { f(vorrq_u32(u(a), u(b))) }
}

#[inline(always)]
pub fn xor_f(a: F32, b: F32) -> F32 {
    unsafe { f(veorq_u32(u(a), u(b))) }
}

/// `!a & b`
#[inline(always)]
pub fn andnot_f(a: F32, b: F32) -> F32 {
    unsafe { f(vbicq_u32(u(b), u(a))) }
}

#[inline(always)]
pub fn min_f(a: F32, b: F32) -> F32 {
    unsafe { vbslq_f32(vcltq_f32(a, b), a, b) }
}

#[inline(always)]
pub fn max_f(a: F32, b: F32) -> F32 {
    unsafe { vbslq_f32(vcgtq_f32(a, b), a, b) }
}

#[inline(always)]
pub fn sqrt_f(v: F32) -> F32 {
    unsafe { vsqrtq_f32(v) }
}

/// `vrecpe` alone only carries 8 bits; one `vrecps` step brings it to the
/// accuracy class of the SSE estimate.
#[inline(always)]
pub fn rcp_f(v: F32) -> F32 {
    unsafe {
        let estimate = vrecpeq_f32(v);
        vmulq_f32(vrecpsq_f32(v, estimate), estimate)
    }
}

#[inline(always)]
pub fn eq_f(a: F32, b: F32) -> Mask {
    unsafe { vceqq_f32(a, b) }
}

#[inline(always)]
pub fn ne_f(a: F32, b: F32) -> Mask {
    unsafe { vmvnq_u32(vceqq_f32(a, b)) }
}

#[inline(always)]
pub fn lt_f(a: F32, b: F32) -> Mask {
    unsafe { vcltq_f32(a, b) }
}

#[inline(always)]
pub fn le_f(a: F32, b: F32) -> Mask {
    unsafe { vcleq_f32(a, b) }
}

#[inline(always)]
pub fn gt_f(a: F32, b: F32) -> Mask {
    unsafe { vcgtq_f32(a, b) }
}

#[inline(always)]
pub fn ge_f(a: F32, b: F32) -> Mask {
    unsafe { vcgeq_f32(a, b) }
}

#[inline(always)]
fn lane_index(mask: i32, lane: usize) -> usize {
    ((mask >> (2 * lane)) & 0b11) as usize
}

#[inline(always)]
pub fn shuffle_f<const MASK: i32>(v: F32) -> F32 {
    let a = to_array_f(v);
    from_array_f([
        a[lane_index(MASK, 0)],
        a[lane_index(MASK, 1)],
        a[lane_index(MASK, 2)],
        a[lane_index(MASK, 3)],
    ])
}

#[inline(always)]
pub fn bits_f2i(v: F32) -> I32 {
    unsafe { vreinterpretq_s32_f32(v) }
}

#[inline(always)]
pub fn bits_i2f(v: I32) -> F32 {
    unsafe { vreinterpretq_f32_s32(v) }
}

/// Round to nearest, ties to even. Out of range lanes become `i32::MIN`
/// like `cvtps2dq` instead of saturating.
#[inline(always)]
pub fn round_f2i(v: F32) -> I32 {
    unsafe {
        let in_range = vandq_u32(
            vcgeq_f32(v, vdupq_n_f32(-2_147_483_648.0)),
            vcltq_f32(v, vdupq_n_f32(2_147_483_648.0)),
        );
        vbslq_s32(in_range, vcvtnq_s32_f32(v), vdupq_n_s32(i32::MIN))
    }
}

#[inline(always)]
pub fn cvt_i2f(v: I32) -> F32 {
    unsafe { vcvtq_f32_s32(v) }
}

#[inline(always)]
pub fn splat_i(value: i32) -> I32 {
    unsafe { vdupq_n_s32(value) }
}

#[inline(always)]
pub fn from_array_i(values: [i32; 4]) -> I32 {
    unsafe { vld1q_s32(values.as_ptr()) }
}

#[inline(always)]
pub fn to_array_i(v: I32) -> [i32; 4] {
    let mut out = [0i32; 4];
    unsafe { vst1q_s32(out.as_mut_ptr(), v) };
    out
}

#[inline(always)]
pub fn add_i(a: I32, b: I32) -> I32 {
    unsafe { vaddq_s32(a, b) }
}

#[inline(always)]
pub fn sub_i(a: I32, b: I32) -> I32 {
    unsafe { vsubq_s32(a, b) }
}

#[inline(always)]
pub fn and_i(a: I32, b: I32) -> I32 {
    unsafe { vandq_s32(a, b) }
}

#[inline(always)]
pub fn or_i(a: I32, b: I32) -> I32 {
    unsafe { vorrq_s32(a, b) }
}

#[inline(always)]
pub fn xor_i(a: I32, b: I32) -> I32 {
    unsafe { veorq_s32(a, b) }
}

#[inline(always)]
pub fn shl_i<const BITS: i32>(v: I32) -> I32 {
    unsafe { vshlq_n_s32::<BITS>(v) }
}

/// Logical (zero filling) right shift.
#[inline(always)]
pub fn shr_i<const BITS: i32>(v: I32) -> I32 {
    unsafe { vreinterpretq_s32_u32(vshrq_n_u32::<BITS>(vreinterpretq_u32_s32(v))) }
}

#[inline(always)]
pub fn eq_i(a: I32, b: I32) -> Mask {
    unsafe { vceqq_s32(a, b) }
}

#[inline(always)]
pub fn lt_i(a: I32, b: I32) -> Mask {
    unsafe { vcltq_s32(a, b) }
}

#[inline(always)]
pub fn gt_i(a: I32, b: I32) -> Mask {
    unsafe { vcgtq_s32(a, b) }
}

#[inline(always)]
pub fn shuffle_i<const MASK: i32>(v: I32) -> I32 {
    let a = to_array_i(v);
    from_array_i([
        a[lane_index(MASK, 0)],
        a[lane_index(MASK, 1)],
        a[lane_index(MASK, 2)],
        a[lane_index(MASK, 3)],
    ])
}

#[inline(always)]
pub fn mask_from_array(lanes: [u32; 4]) -> Mask {
    unsafe { vld1q_u32(lanes.as_ptr()) }
}

#[inline(always)]
pub fn mask_to_array(m: Mask) -> [u32; 4] {
    let mut out = [0u32; 4];
    unsafe { vst1q_u32(out.as_mut_ptr(), m) };
    out
}

#[inline(always)]
pub fn mask_and(a: Mask, b: Mask) -> Mask {
    unsafe { vandq_u32(a, b) }
}

#[inline(always)]
pub fn mask_or(a: Mask, b: Mask) -> Mask {
    unsafe { vorrq_u32(a, b) }
}

#[inline(always)]
pub fn mask_xor(a: Mask, b: Mask) -> Mask {
    unsafe { veorq_u32(a, b) }
}

#[inline(always)]
pub fn mask_not(m: Mask) -> Mask {
    unsafe { vmvnq_u32(m) }
}

/// One bit per lane, lane 0 in bit 0.
#[inline(always)]
pub fn mask_bits(m: Mask) -> u32 {
    mask_to_array(m)
        .iter()
        .enumerate()
        .fold(0, |bits, (lane, &v)| bits | ((v >> 31) << lane))
}

#[inline(always)]
pub fn blend_f(m: Mask, t: F32, f: F32) -> F32 {
    unsafe { vbslq_f32(m, t, f) }
}

#[inline(always)]
pub fn blend_i(m: Mask, t: I32, f: I32) -> I32 {
    unsafe { vbslq_s32(m, t, f) }
}
