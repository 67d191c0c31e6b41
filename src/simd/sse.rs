//! SSE2 backend for the 4-wide lane groups.
//!
//! SSE2 is part of the x86_64 baseline, so every intrinsic used here is
//! available without runtime detection. Masks are kept as `__m128i` with each
//! lane either all-ones or all-zeros, the layout `cmpps` produces.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

pub type F32 = __m128;
pub type I32 = __m128i;
pub type Mask = __m128i;

#[inline(always)]
pub fn splat_f(value: f32) -> F32 {
    unsafe { _mm_set1_ps(value) }
}

#[inline(always)]
pub fn from_array_f(values: [f32; 4]) -> F32 {
    unsafe { _mm_loadu_ps(values.as_ptr()) }
}

#[inline(always)]
pub fn to_array_f(v: F32) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    unsafe { _mm_storeu_ps(out.as_mut_ptr(), v) };
    out
}

#[inline(always)]
pub fn add_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_add_ps(a, b) }
}

#[inline(always)]
pub fn sub_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_sub_ps(a, b) }
}

#[inline(always)]
pub fn mul_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_mul_ps(a, b) }
}

#[inline(always)]
pub fn div_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_div_ps(a, b) }
}

#[inline(always)]
pub fn and_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_and_ps(a, b) }
}

#[inline(always)]
pub fn or_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_or_ps(a, b) }
}

#[inline(always)]
pub fn xor_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_xor_ps(a, b) }
}

/// `!a & b`
#[inline(always)]
pub fn andnot_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_andnot_ps(a, b) }
}

#[inline(always)]
pub fn min_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_min_ps(a, b) }
}

#[inline(always)]
pub fn max_f(a: F32, b: F32) -> F32 {
    unsafe { _mm_max_ps(a, b) }
}

#[inline(always)]
pub fn sqrt_f(v: F32) -> F32 {
    unsafe { _mm_sqrt_ps(v) }
}

/// Hardware reciprocal estimate, relative error below 1.5 * 2^-12.
#[inline(always)]
pub fn rcp_f(v: F32) -> F32 {
    unsafe { _mm_rcp_ps(v) }
}

#[inline(always)]
pub fn eq_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmpeq_ps(a, b)) }
}

#[inline(always)]
pub fn ne_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmpneq_ps(a, b)) }
}

#[inline(always)]
pub fn lt_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmplt_ps(a, b)) }
}

#[inline(always)]
pub fn le_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmple_ps(a, b)) }
}

#[inline(always)]
pub fn gt_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmpgt_ps(a, b)) }
}

#[inline(always)]
pub fn ge_f(a: F32, b: F32) -> Mask {
    unsafe { _mm_castps_si128(_mm_cmpge_ps(a, b)) }
}

#[inline(always)]
pub fn shuffle_f<const MASK: i32>(v: F32) -> F32 {
    unsafe { _mm_shuffle_ps::<MASK>(v, v) }
}

#[inline(always)]
pub fn bits_f2i(v: F32) -> I32 {
    unsafe { _mm_castps_si128(v) }
}

#[inline(always)]
pub fn bits_i2f(v: I32) -> F32 {
    unsafe { _mm_castsi128_ps(v) }
}

/// Converts using the MXCSR rounding mode (round to nearest even unless
/// somebody changed it). Out of range lanes become `i32::MIN`.
#[inline(always)]
pub fn round_f2i(v: F32) -> I32 {
    unsafe { _mm_cvtps_epi32(v) }
}

#[inline(always)]
pub fn cvt_i2f(v: I32) -> F32 {
    unsafe { _mm_cvtepi32_ps(v) }
}

#[inline(always)]
pub fn splat_i(value: i32) -> I32 {
    unsafe { _mm_set1_epi32(value) }
}

#[inline(always)]
pub fn from_array_i(values: [i32; 4]) -> I32 {
    unsafe { _mm_loadu_si128(values.as_ptr() as *const __m128i) }
}

#[inline(always)]
pub fn to_array_i(v: I32) -> [i32; 4] {
    let mut out = [0i32; 4];
    unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v) };
    out
}

#[inline(always)]
pub fn add_i(a: I32, b: I32) -> I32 {
    unsafe { _mm_add_epi32(a, b) }
}

#[inline(always)]
pub fn sub_i(a: I32, b: I32) -> I32 {
    unsafe { _mm_sub_epi32(a, b) }
}

#[inline(always)]
pub fn and_i(a: I32, b: I32) -> I32 {
    unsafe { _mm_and_si128(a, b) }
}

#[inline(always)]
pub fn or_i(a: I32, b: I32) -> I32 {
    unsafe { _mm_or_si128(a, b) }
}

#[inline(always)]
pub fn xor_i(a: I32, b: I32) -> I32 {
    unsafe { _mm_xor_si128(a, b) }
}

#[inline(always)]
pub fn shl_i<const BITS: i32>(v: I32) -> I32 {
    unsafe { _mm_slli_epi32::<BITS>(v) }
}

/// Logical (zero filling) right shift.
#[inline(always)]
pub fn shr_i<const BITS: i32>(v: I32) -> I32 {
    unsafe { _mm_srli_epi32::<BITS>(v) }
}

#[inline(always)]
pub fn eq_i(a: I32, b: I32) -> Mask {
    unsafe { _mm_cmpeq_epi32(a, b) }
}

#[inline(always)]
pub fn lt_i(a: I32, b: I32) -> Mask {
    unsafe { _mm_cmplt_epi32(a, b) }
}

#[inline(always)]
pub fn gt_i(a: I32, b: I32) -> Mask {
    unsafe { _mm_cmpgt_epi32(a, b) }
}

#[inline(always)]
pub fn shuffle_i<const MASK: i32>(v: I32) -> I32 {
    unsafe { _mm_shuffle_epi32::<MASK>(v) }
}

#[inline(always)]
pub fn mask_from_array(lanes: [u32; 4]) -> Mask {
    unsafe { _mm_loadu_si128(lanes.as_ptr() as *const __m128i) }
}

#[inline(always)]
pub fn mask_to_array(m: Mask) -> [u32; 4] {
    let mut out = [0u32; 4];
    unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, m) };
    out
}

#[inline(always)]
pub fn mask_and(a: Mask, b: Mask) -> Mask {
    and_i(a, b)
}

#[inline(always)]
pub fn mask_or(a: Mask, b: Mask) -> Mask {
    or_i(a, b)
}

#[inline(always)]
pub fn mask_xor(a: Mask, b: Mask) -> Mask {
    xor_i(a, b)
}

#[inline(always)]
pub fn mask_not(m: Mask) -> Mask {
    xor_i(m, splat_i(-1))
}

/// One bit per lane, lane 0 in bit 0.
#[inline(always)]
pub fn mask_bits(m: Mask) -> u32 {
    unsafe { _mm_movemask_ps(_mm_castsi128_ps(m)) as u32 }
}

#[inline(always)]
pub fn blend_f(m: Mask, t: F32, f: F32) -> F32 {
    unsafe {
        let m = _mm_castsi128_ps(m);
        _mm_or_ps(_mm_and_ps(m, t), _mm_andnot_ps(m, f))
    }
}

#[inline(always)]
pub fn blend_i(m: Mask, t: I32, f: I32) -> I32 {
    unsafe { _mm_or_si128(_mm_and_si128(m, t), _mm_andnot_si128(m, f)) }
}
