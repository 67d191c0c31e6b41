//! Vectorized approximations of the elementary functions used by the
//! particle filter, each paired with a `*_ref` reference that applies the
//! standard library function lane by lane.
//!
//! The reference versions exist for auditing only: the
//! [`harness`](crate::harness) sweeps every kernel against its reference and
//! reports timing and relative error.
//!
//! # Kernels
//!
//! | Function | Domain | Max rel. error | Technique |
//! |---|---|---|---|
//! | [`abs`] | all | exact | sign bit cleared |
//! | [`sqrt`] | `[0, ∞]` | exact | hardware square root |
//! | [`approx_rcp`] | non-zero | ~3.7e-4 (SSE) | hardware estimate |
//! | [`approx_div`] | `d != 0` | ~3.7e-4 (SSE) | `n * approx_rcp(d)` |
//! | [`nr_rcp`] | non-zero | ~2 ulp | estimate + one Newton-Raphson step |
//! | [`nr_div`] | `0 < |d| < 2^124` | ~2 ulp | `n * nr_rcp(d)` folded into one step |
//! | [`nr_div_guarded`] | all | ~2 ulp | [`nr_div`], big divisors pre-scaled |
//! | [`atan`] | all | ~1e-6 | Euler series on `|t| <= tan(π/8)` |
//! | [`atan2`] | all but NaN | ~1e-6 | `atan(y / x)` + quadrant fix |
//! | [`exp`] | `[-87.34, 88.38]`, clamped | ~2e-7 | `2^n` built from bits · degree 6 polynomial |
//! | [`sin`] / [`cos`] | `|x| < 2^15` | ~2e-7 abs | reduce by `kπ`, degree 9 odd polynomial |
//!
//! # Range reduction
//!
//! * **atan**: odd symmetry handles negative inputs, `atan(x) = π/2 - atan(1/x)`
//!   folds `|x| > 1` into `[0, 1]` and `atan(t) = π/4 + atan((t-1)/(t+1))`
//!   folds `(tan(π/8), 1]` into `[-tan(π/8), 0]`.
//! * **exp**: `x = n·ln2 + r` with `|r| <= ln2/2`; `2^n` is written straight
//!   into the IEEE-754 exponent field.
//! * **sin**: `x = kπ + r` with `|r| <= π/2`, the sign of the result flips when
//!   `k` is odd. `kπ` is subtracted in three parts so the reduction stays
//!   exact for moderate `k`.
//!
//! # Preconditions
//!
//! Domain preconditions are checked with `debug_assert!`. They abort debug
//! builds and cost nothing in release builds, where out of domain input gives
//! an unspecified (but memory safe) result.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::{F32x4, I32x4};

const SIGN_MASK: u32 = 0x8000_0000;
const ABS_MASK: u32 = 0x7fff_ffff;

// Euler's series for atan: atan(x) = x/(1+x²) · Σ c_n·z^n, z = x²/(1+x²)

/// c₁ = 1
const ATAN_C1: u32 = 0x3f80_0000;
/// c₂ = 2/3
const ATAN_C2: u32 = 0x3f2a_aaab;
/// c₃ = 8/15
const ATAN_C3: u32 = 0x3f08_8889;
/// c₄ = 16/35
const ATAN_C4: u32 = 0x3eea_0ea1;
/// c₅ = 128/315
const ATAN_C5: u32 = 0x3ed0_0d01;
/// c₆ = 256/693
const ATAN_C6: u32 = 0x3ebd_2318;
/// c₇ = 1024/3003
const ATAN_C7: u32 = 0x3eae_968c;
/// Below ~3.52e-4 `atan(x) == x` to within half an ulp.
const ATAN_SMALL: u32 = 0x39b8_9ba3;

/// tan(π/8)
#[allow(clippy::excessive_precision)]
const TAN_FRAC_PI_8: f32 = 0.414_213_562_373_095_05;

/// Lower clamp for exp, e^x is the smallest normal float here.
const EXP_MIN: u32 = 0xc2ae_ac51;
/// Upper clamp for exp, the largest input whose exponent still fits in 8 bits.
const EXP_MAX: u32 = 0x42b0_c0a5;
/// log₂(e)
const LOG2E: u32 = 0x3fb8_aa3b;
/// ln 2 split for Cody-Waite reduction; `LN2_HI · n` is exact for |n| <= 2^15.
const LN2_HI: f32 = 0.693_359_375;
#[allow(clippy::excessive_precision)]
const LN2_LO: f32 = -2.121_944_400_546_905_827_679_2e-4;
/// Bits of 1.0; adding `n << 23` to it yields 2^n.
const ONE_BITS: i32 = 0x3f80_0000;

// e^r ≈ 1 + r + r²/2 + c₃r³ + (r²/2)²·(c₃ + c₅r + c₆r²)

/// ≈ 1/6
const EXP_C3: u32 = 0x3e2a_aa1d;
/// ≈ 4/120
const EXP_C5: u32 = 0x3d09_3a89;
/// ≈ 4/720
const EXP_C6: u32 = 0x3bb7_1b61;

/// 1/π
const INV_PI: u32 = 0x3ea2_f983;
/// π split in three; `k · PI_A` is exact for |k| <= 2^15.
const PI_A: f32 = 3.140_625;
#[allow(clippy::excessive_precision)]
const PI_B: f32 = 0.000_967_025_756_835_937_5;
#[allow(clippy::excessive_precision)]
const PI_C: f32 = 6.277_114_152_908_325_195_3e-7;

// Odd minimax polynomial for sin on [-π/2, π/2]

/// ≈ -1/3!
const SIN_C3: u32 = 0xbe2a_aaab;
/// ≈ 1/5!
const SIN_C5: u32 = 0x3c08_87e6;
/// ≈ -1/7!
const SIN_C7: u32 = 0xb94f_c635;
/// ≈ 1/9!
const SIN_C9: u32 = 0x362f_5e1d;
/// Below ~4.44e-4 `sin(x) == x` to within half an ulp.
const SIN_SMALL: u32 = 0x39e8_9769;
/// `|x|` bound of [`sin`]; the three part π reduction is exact below it.
const SIN_LIMIT: f32 = 32768.0;

/// 2^124; the reciprocal estimate of a larger divisor underflows.
const DIV_BIG: u32 = 0x7d80_0000;
/// 2^-4, applied to both operands of a division by a big divisor.
const DIV_SCALE: f32 = 0.0625;

#[inline(always)]
fn bits(b: u32) -> F32x4 {
    F32x4::splat_bits(b)
}

/// True when every lane lies in `[lo, hi]`; NaN lanes fail.
#[inline(always)]
pub fn inbounds(v: F32x4, lo: f32, hi: f32) -> bool {
    v.in_range(lo, hi).all()
}

/// True when every lane lies in `[lo, hi]` or is NaN.
#[inline(always)]
fn inbounds_or_nan(v: F32x4, lo: f32, hi: f32) -> bool {
    (v.in_range(lo, hi) | v.is_nan()).all()
}

/// `|x|` by clearing the sign bit.
#[inline(always)]
pub fn abs(x: F32x4) -> F32x4 {
    x & bits(ABS_MASK)
}

pub fn abs_ref(x: F32x4) -> F32x4 {
    x.map(f32::abs)
}

/// Copies the sign of `sign` onto the magnitude of `magnitude`.
#[inline(always)]
pub fn copysign(magnitude: F32x4, sign: F32x4) -> F32x4 {
    abs(magnitude) | (sign & bits(SIGN_MASK))
}

#[inline(always)]
pub fn sqrt(x: F32x4) -> F32x4 {
    x.sqrt()
}

pub fn sqrt_ref(x: F32x4) -> F32x4 {
    x.map(f32::sqrt)
}

/// Raw hardware reciprocal estimate.
///
/// The precision depends on the backend: about 12 bits on SSE, about 16 bits
/// on NEON, exact on the portable fallback.
#[inline(always)]
pub fn approx_rcp(x: F32x4) -> F32x4 {
    x.rcp_estimate()
}

/// Reciprocal refined with one Newton-Raphson step, `r' = r + r - x·r²`.
///
/// Every lane must be non-zero.
#[inline(always)]
pub fn nr_rcp(x: F32x4) -> F32x4 {
    debug_assert!(
        x.simd_eq(F32x4::zero()).none(),
        "nr_rcp: zero lane in {x:?}"
    );
    let r = approx_rcp(x);
    r + r - x * r * r
}

/// [`nr_rcp`] defined for every input: `±0 → ±∞`, `±∞ → ±0`.
#[inline(always)]
pub fn nr_rcp_guarded(x: F32x4) -> F32x4 {
    let r = approx_rcp(x);
    let refined = r + r - x * r * r;
    F32x4::blend(refined.is_nan(), r, refined)
}

pub fn rcp_ref(x: F32x4) -> F32x4 {
    x.map(|v| 1.0 / v)
}

/// `numer / denom` through the raw reciprocal estimate.
#[inline(always)]
pub fn approx_div(numer: F32x4, denom: F32x4) -> F32x4 {
    numer * approx_rcp(denom)
}

/// Quotient refined with one Newton-Raphson step.
///
/// A lane with `denom == 0` must also have `numer == 0`.
#[inline(always)]
pub fn nr_div(numer: F32x4, denom: F32x4) -> F32x4 {
    let zero = F32x4::zero();
    debug_assert!(
        (numer.simd_ne(zero) & denom.simd_eq(zero)).none(),
        "nr_div: {numer:?} / {denom:?} divides a non-zero lane by zero"
    );
    let r = approx_rcp(denom);
    let nr = numer * r;
    nr + nr - denom * r * nr
}

/// [`nr_div`] defined for every input.
///
/// Lanes where the refinement step is meaningless (infinite or zero operands)
/// keep the unrefined quotient, which carries the correct IEEE sign and
/// magnitude: `y/±0 = ±∞`, `y/±∞ = ±0`, `±0/x = ±0`.
///
/// Finite divisors of magnitude `2^124` and above scale both operands by
/// `2^-4` first, so the reciprocal estimate stays a normal float and
/// `f32::MAX / f32::MAX` is still 1.
#[inline(always)]
pub fn nr_div_guarded(numer: F32x4, denom: F32x4) -> F32x4 {
    let mag = abs(denom);
    let big = mag.simd_ge(bits(DIV_BIG)) & mag.simd_lt(F32x4::splat(f32::INFINITY));
    let scale = F32x4::blend(big, F32x4::splat(DIV_SCALE), F32x4::splat(1.0));
    let (numer, denom) = (numer * scale, denom * scale);

    let r = approx_rcp(denom);
    let nr = numer * r;
    let refined = nr + nr - denom * r * nr;
    let keep = refined.is_nan() | nr.simd_eq(F32x4::zero());
    F32x4::blend(keep, nr, refined)
}

pub fn div_ref(numer: F32x4, denom: F32x4) -> F32x4 {
    F32x4::from_array(std::array::from_fn(|i| numer.lane(i) / denom.lane(i)))
}

/// Euler's series, valid for `|x| <= 1`, accurate for `|x| <= tan(π/8)`.
#[inline(always)]
fn atan_series(x: F32x4) -> F32x4 {
    let one = bits(ATAN_C1);
    let x2 = x * x;
    let q = nr_div(x, x2 + one);
    let z = x * q;
    let z2 = z * z;
    let z3 = z2 * z;

    let s = one
        + bits(ATAN_C2) * z
        + bits(ATAN_C3) * z2
        + z3 * (bits(ATAN_C5) * z + bits(ATAN_C4) + bits(ATAN_C6) * z2 + bits(ATAN_C7) * z3);

    F32x4::blend(abs(x).simd_lt(bits(ATAN_SMALL)), x, q * s)
}

/// Arctangent on the reduced domain `[0, 1]`.
#[inline(always)]
pub fn atan_rd(x: F32x4) -> F32x4 {
    debug_assert!(inbounds_or_nan(x, 0.0, 1.0), "atan_rd: {x:?} outside [0, 1]");

    let one = F32x4::splat(1.0);
    let upper = x.simd_gt(F32x4::splat(TAN_FRAC_PI_8));
    let t = F32x4::blend(upper, nr_div(x - one, x + one), x);
    let s = atan_series(t);
    // adding only where reduced keeps the sign of a -0.0 input
    F32x4::blend(upper, s + FRAC_PI_4, s)
}

/// Arctangent over all floats. `atan(±∞) = ±π/2`, signed zeros are kept.
#[inline(always)]
pub fn atan(x: F32x4) -> F32x4 {
    let one = F32x4::splat(1.0);
    let neg = x.simd_lt(F32x4::zero());
    let sign_conv = F32x4::blend(neg, -one, one);
    let abs_x = sign_conv * x;

    let invert = abs_x.simd_gt(one);
    // Only inverted lanes use the reciprocal; the rest get a harmless 1.
    let denom = F32x4::blend(invert, abs_x, one);
    let x_ror = F32x4::blend(invert, one.min(nr_rcp_guarded(denom)), abs_x);

    let r = sign_conv * atan_rd(x_ror);
    let base = F32x4::blend(neg, F32x4::splat(-FRAC_PI_2), F32x4::splat(FRAC_PI_2));
    F32x4::blend(invert, base - r, r)
}

pub fn atan_ref(x: F32x4) -> F32x4 {
    x.map(f32::atan)
}

/// Four quadrant arctangent of `y / x`, result in `[-π, π]`.
///
/// Quadrants are chosen from the sign bits, so signed zeros count as signed.
/// The `(±0, ±0)` and `(±∞, ±∞)` pairs follow the IEEE `atan2` conventions.
/// Finite operands up to `f32::MAX` are fine, see [`nr_div_guarded`].
#[inline(always)]
pub fn atan2(y: F32x4, x: F32x4) -> F32x4 {
    let zero = F32x4::zero();
    let one = F32x4::splat(1.0);
    let pi = F32x4::splat(PI);
    let inf = F32x4::splat(f32::INFINITY);

    // ∞/∞ has no quotient; unit magnitudes with the same signs give π/4 multiples
    let both_inf = abs(y).simd_eq(inf) & abs(x).simd_eq(inf);
    let y_eff = F32x4::blend(both_inf, copysign(one, y), y);
    let x_eff = F32x4::blend(both_inf, copysign(one, x), x);

    let raw = atan(nr_div_guarded(y_eff, x_eff));

    let neg_x = x.sign_bit();
    let neg_y = y.sign_bit();
    let second = neg_x.and_not(neg_y);
    let third = neg_x & neg_y;
    let result = F32x4::blend(second, raw + pi, F32x4::blend(third, raw - pi, raw));

    let both_zero = y.simd_eq(zero) & x.simd_eq(zero);
    let zero_result = copysign(F32x4::blend(neg_x, pi, zero), y);
    F32x4::blend(both_zero, zero_result, result)
}

pub fn atan2_ref(y: F32x4, x: F32x4) -> F32x4 {
    F32x4::from_array(std::array::from_fn(|i| y.lane(i).atan2(x.lane(i))))
}

/// `2^n` for integer lanes in `[-126, 127]`.
#[inline(always)]
fn exp_exponent(n: I32x4) -> F32x4 {
    (n.shl::<23>() + I32x4::splat(ONE_BITS)).to_bits_f32()
}

/// `e^r` for `|r| <= ln2 / 2`.
#[inline(always)]
fn exp_mantissa(r: F32x4) -> F32x4 {
    let c3 = bits(EXP_C3);
    let r2 = r * r;
    let r2_2 = r2 * 0.5;
    F32x4::splat(1.0)
        + r
        + r2_2
        + c3 * r * r2
        + r2_2 * r2_2 * (c3 + bits(EXP_C5) * r + bits(EXP_C6) * r2)
}

/// `e^x` with the input clamped to `[-87.336555, 88.37626]`.
///
/// Inputs below the range return ~1.18e-38 and inputs above return ~2.4e38,
/// never 0 or infinity. NaN propagates.
#[inline(always)]
pub fn exp(x: F32x4) -> F32x4 {
    // max/min return their second operand for NaN, which keeps NaN lanes NaN
    let x = bits(EXP_MAX).min(bits(EXP_MIN).max(x));

    let n = (x * bits(LOG2E)).round_to_i32();
    let nf = n.to_f32();
    let r = (x - nf * LN2_HI) - nf * LN2_LO;

    exp_exponent(n) * exp_mantissa(r)
}

pub fn exp_ref(x: F32x4) -> F32x4 {
    x.map(f32::exp)
}

/// Polynomial core of [`sin`], valid on `[-π, π]` and accurate on `[-π/2, π/2]`.
#[inline(always)]
pub fn sin_ror(x: F32x4) -> F32x4 {
    debug_assert!(inbounds_or_nan(x, -PI, PI), "sin_ror: {x:?} outside [-π, π]");

    let x2 = x * x;
    let x3 = x2 * x;
    let approx = x
        + x3 * bits(SIN_C3)
        + x3 * x2 * (x2 * bits(SIN_C7) + bits(SIN_C5) + x2 * x2 * bits(SIN_C9));
    F32x4::blend(abs(x).simd_lt(bits(SIN_SMALL)), x, approx)
}

/// Sine with reduction by the nearest multiple of π.
///
/// Every lane must satisfy `|x| <= 2^15` (NaN passes through).
#[inline(always)]
pub fn sin(x: F32x4) -> F32x4 {
    debug_assert!(
        inbounds_or_nan(x, -SIN_LIMIT, SIN_LIMIT),
        "sin: {x:?} outside [-2^15, 2^15]"
    );
    let k = (x * bits(INV_PI)).round_to_i32();
    let kf = k.to_f32();
    let reduced = ((x - kf * PI_A) - kf * PI_B) - kf * PI_C;
    // odd k lands in the opposite half turn: move its low bit into the sign
    let x_ror = reduced ^ k.shl::<31>().to_bits_f32();
    sin_ror(x_ror)
}

pub fn sin_ref(x: F32x4) -> F32x4 {
    x.map(f32::sin)
}

/// `cos(x) = sin(x + π/2)`, so every lane must satisfy `|x| <= 2^15 - π/2`.
#[inline(always)]
pub fn cos(x: F32x4) -> F32x4 {
    debug_assert!(
        inbounds_or_nan(x, -SIN_LIMIT + FRAC_PI_2, SIN_LIMIT - FRAC_PI_2),
        "cos: {x:?} outside [-2^15 + π/2, 2^15 - π/2]"
    );
    sin(x + FRAC_PI_2)
}

pub fn cos_ref(x: F32x4) -> F32x4 {
    x.map(f32::cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq_rel(a: f32, b: f32, rel_tol: f32) {
        let diff = (a - b).abs();
        let scale = a.abs().max(b.abs());
        assert!(
            diff <= rel_tol * scale || diff <= f32::MIN_POSITIVE,
            "assertion failed: {a} ≈ {b} (rel diff {})",
            diff / scale
        );
    }

    fn check_lanes(fast: F32x4, reference: F32x4, rel_tol: f32) {
        for (a, b) in fast.to_array().into_iter().zip(reference.to_array()) {
            assert_approx_eq_rel(a, b, rel_tol);
        }
    }

    #[test]
    fn test_abs_clears_sign() {
        let x = F32x4::new(-1.5, 2.0, -0.0, f32::NEG_INFINITY);
        let a = abs(x).to_array();
        assert_eq!(a[..2], [1.5, 2.0]);
        assert!(a[2] == 0.0 && a[2].is_sign_positive());
        assert_eq!(a[3], f32::INFINITY);
    }

    #[test]
    fn test_nr_rcp_and_div() {
        let x = F32x4::new(3.0, -7.0, 1e-3, 12345.0);
        check_lanes(nr_rcp(x), rcp_ref(x), 5e-7);
        let n = F32x4::new(1.0, 2.0, -3.0, 0.0);
        check_lanes(nr_div(n, x), div_ref(n, x), 5e-7);
    }

    #[test]
    fn test_guarded_reciprocal_handles_zero_and_infinity() {
        let x = F32x4::new(0.0, -0.0, f32::INFINITY, 4.0);
        let r = nr_rcp_guarded(x).to_array();
        assert_eq!(r[0], f32::INFINITY);
        assert_eq!(r[1], f32::NEG_INFINITY);
        assert_eq!(r[2], 0.0);
        assert_approx_eq_rel(r[3], 0.25, 5e-7);
    }

    #[test]
    fn test_approx_div_within_estimate_precision() {
        let n = F32x4::new(1.0, -250.0, 3.5, 1e6);
        let d = F32x4::new(3.0, 7.0, -0.125, 4096.5);
        check_lanes(approx_div(n, d), div_ref(n, d), 1e-3);
    }

    #[test]
    fn test_guarded_division_by_huge_divisors() {
        let n = F32x4::splat(1e38);
        let d = F32x4::new(1.0, 1e38, 3e38, f32::MAX);
        check_lanes(nr_div_guarded(n, d), div_ref(n, d), 5e-7);

        let n = F32x4::new(f32::MAX, -f32::MAX, 1.0, 0.0);
        let d = F32x4::new(f32::MAX, 2.5e37, -4e37, 3e38);
        let q = nr_div_guarded(n, d).to_array();
        assert_approx_eq_rel(q[0], 1.0, 5e-7);
        assert_approx_eq_rel(q[1], -f32::MAX / 2.5e37, 5e-7);
        assert_approx_eq_rel(q[2], -2.5e-38, 1e-6);
        assert_eq!(q[3], 0.0);
    }

    #[test]
    fn test_guarded_division_keeps_ieee_signs() {
        let n = F32x4::new(1.0, -1.0, -0.0, 1.0);
        let d = F32x4::new(0.0, 0.0, 5.0, f32::NEG_INFINITY);
        let q = nr_div_guarded(n, d).to_array();
        assert_eq!(q[0], f32::INFINITY);
        assert_eq!(q[1], f32::NEG_INFINITY);
        assert!(q[2] == 0.0 && q[2].is_sign_negative());
        assert!(q[3] == 0.0 && q[3].is_sign_negative());
    }

    #[test]
    fn test_atan_reduced_domain() {
        for &v in &[0.0f32, 1e-5, 0.2, 0.41, 0.42, 0.75, 0.999, 1.0] {
            let x = F32x4::splat(v);
            check_lanes(atan_rd(x), atan_ref(x), 2e-6);
        }
    }

    #[test]
    fn test_atan_full_range() {
        let x = F32x4::new(-1e8, -3.0, 2.5, 1e30);
        check_lanes(atan(x), atan_ref(x), 2e-6);
        let x = F32x4::new(f32::INFINITY, f32::NEG_INFINITY, -0.0, 0.0);
        let a = atan(x).to_array();
        assert_eq!(a[0], FRAC_PI_2);
        assert_eq!(a[1], -FRAC_PI_2);
        assert!(a[2] == 0.0 && a[2].is_sign_negative());
        assert!(a[3] == 0.0 && a[3].is_sign_positive());
    }

    #[test]
    fn test_atan_propagates_nan() {
        assert!(atan(F32x4::splat(f32::NAN)).is_nan().all());
    }

    #[test]
    fn test_atan2_quadrants() {
        let y = F32x4::new(1.0, 1.0, -1.0, -1.0);
        let x = F32x4::new(1.0, -1.0, -1.0, 1.0);
        check_lanes(atan2(y, x), atan2_ref(y, x), 2e-6);
    }

    #[test]
    fn test_atan2_signed_zeros_follow_ieee() {
        let y = F32x4::new(0.0, -0.0, 0.0, -0.0);
        let x = F32x4::new(0.0, 0.0, -0.0, -0.0);
        let fast = atan2(y, x).to_array();
        let reference = atan2_ref(y, x).to_array();
        for (a, b) in fast.iter().zip(reference.iter()) {
            assert_eq!(a, b);
            assert_eq!(a.is_sign_negative(), b.is_sign_negative());
        }
    }

    #[test]
    fn test_atan2_near_float_max() {
        let y = F32x4::new(3e38, 1e38, -2e38, -f32::MAX);
        let x = F32x4::new(3e38, 2e38, 1e38, -f32::MAX);
        check_lanes(atan2(y, x), atan2_ref(y, x), 2e-6);

        let y = F32x4::new(1.0, 3e38, -1e30, 5e37);
        let x = F32x4::new(1e38, -1.0, -3e38, -2e37);
        let fast = atan2(y, x).to_array();
        let reference = atan2_ref(y, x).to_array();
        assert!((fast[0] - reference[0]).abs() < 1e-37, "{} vs {}", fast[0], reference[0]);
        for lane in 1..4 {
            assert_approx_eq_rel(fast[lane], reference[lane], 2e-6);
        }
    }

    #[test]
    fn test_atan2_axes_and_infinities() {
        let y = F32x4::new(1.0, -1.0, f32::INFINITY, -f32::INFINITY);
        let x = F32x4::new(-0.0, 0.0, f32::NEG_INFINITY, f32::INFINITY);
        check_lanes(atan2(y, x), atan2_ref(y, x), 2e-6);

        let y = F32x4::new(0.0, -0.0, 5.0, -5.0);
        let x = F32x4::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::INFINITY, -0.0);
        check_lanes(atan2(y, x), atan2_ref(y, x), 2e-6);
    }

    #[test]
    fn test_exp_values() {
        let x = F32x4::new(-10.0, -0.5, 0.0, 20.0);
        check_lanes(exp(x), exp_ref(x), 1e-6);
        let x = F32x4::new(-80.0, 1.0, std::f32::consts::LN_2, 80.0);
        check_lanes(exp(x), exp_ref(x), 1e-6);
    }

    #[test]
    fn test_exp_saturates_instead_of_overflowing() {
        let e = exp(F32x4::new(-1000.0, 1000.0, f32::NEG_INFINITY, f32::INFINITY)).to_array();
        assert!(e[0] > 0.0 && e[0] < 1.2e-38);
        assert!(e[1].is_finite() && e[1] > 2.0e38);
        assert_eq!(e[2], e[0]);
        assert_eq!(e[3], e[1]);
        assert!(exp(F32x4::splat(f32::NAN)).is_nan().all());
    }

    #[test]
    fn test_sin_cos_values() {
        let x = F32x4::new(-3.0, -0.5, 1.0, 2.9);
        for (a, b) in sin(x).to_array().iter().zip(sin_ref(x).to_array()) {
            assert!((a - b).abs() < 1e-6, "sin: {a} vs {b}");
        }
        for (a, b) in cos(x).to_array().iter().zip(cos_ref(x).to_array()) {
            assert!((a - b).abs() < 1e-6, "cos: {a} vs {b}");
        }
    }

    #[test]
    fn test_sin_small_values_pass_through() {
        let x = F32x4::new(1e-5, -2e-4, 0.0, -0.0);
        assert_eq!(sin(x).to_array()[..2], [1e-5, -2e-4]);
    }

    #[test]
    fn test_sin_large_arguments() {
        let x = F32x4::new(-99.0, 42.0, 77.7, 100.0);
        for (a, b) in sin(x).to_array().iter().zip(sin_ref(x).to_array()) {
            assert!((a - b).abs() < 1e-5, "sin: {a} vs {b}");
        }
    }

    #[test]
    fn test_sin_cos_at_domain_edge() {
        let x = F32x4::new(32768.0, -32768.0, 32000.5, -20000.25);
        for (a, b) in sin(x).to_array().iter().zip(sin_ref(x).to_array()) {
            assert!((a - b).abs() < 1e-3, "sin: {a} vs {b}");
        }
        let x = F32x4::new(32766.0, -32766.0, 0.0, 1e4);
        for (a, b) in cos(x).to_array().iter().zip(cos_ref(x).to_array()) {
            assert!((a - b).abs() < 1e-2, "cos: {a} vs {b}");
        }
        assert!(sin(F32x4::splat(f32::NAN)).is_nan().all());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside [-2^15, 2^15]")]
    fn test_sin_rejects_arguments_beyond_reduction_range() {
        sin(F32x4::new(0.0, 1e5, 1.0, 2.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cos:")]
    fn test_cos_rejects_arguments_beyond_reduction_range() {
        cos(F32x4::splat(-32768.0));
    }

    #[test]
    fn test_inbounds() {
        assert!(inbounds(F32x4::new(0.0, 0.5, 1.0, 0.25), 0.0, 1.0));
        assert!(!inbounds(F32x4::new(0.0, 0.5, 1.5, 0.25), 0.0, 1.0));
        assert!(!inbounds(F32x4::splat(f32::NAN), 0.0, 1.0));
    }
}
