//! Portable backend: a lane group is a plain `[f32; 4]` and every operation
//! is a per-lane loop.
//!
//! The loops reproduce the SSE semantics where IEEE leaves room for choice
//! (unordered `min`/`max`, out of range float to int conversion) so results
//! do not depend on which backend the build script picked.

pub type F32 = [f32; 4];
pub type I32 = [i32; 4];
pub type Mask = [u32; 4];

const ON: u32 = u32::MAX;

#[inline(always)]
fn map_f(a: F32, op: impl Fn(f32) -> f32) -> F32 {
    [op(a[0]), op(a[1]), op(a[2]), op(a[3])]
}

#[inline(always)]
fn zip_f(a: F32, b: F32, op: impl Fn(f32, f32) -> f32) -> F32 {
    [op(a[0], b[0]), op(a[1], b[1]), op(a[2], b[2]), op(a[3], b[3])]
}

#[inline(always)]
fn zip_bits(a: F32, b: F32, op: impl Fn(u32, u32) -> u32) -> F32 {
    zip_f(a, b, |x, y| f32::from_bits(op(x.to_bits(), y.to_bits())))
}

#[inline(always)]
fn cmp_f(a: F32, b: F32, op: impl Fn(f32, f32) -> bool) -> Mask {
    let lane = |i: usize| if op(a[i], b[i]) { ON } else { 0 };
    [lane(0), lane(1), lane(2), lane(3)]
}

#[inline(always)]
fn zip_i(a: I32, b: I32, op: impl Fn(i32, i32) -> i32) -> I32 {
    [op(a[0], b[0]), op(a[1], b[1]), op(a[2], b[2]), op(a[3], b[3])]
}

#[inline(always)]
fn cmp_i(a: I32, b: I32, op: impl Fn(i32, i32) -> bool) -> Mask {
    let lane = |i: usize| if op(a[i], b[i]) { ON } else { 0 };
    [lane(0), lane(1), lane(2), lane(3)]
}

#[inline(always)]
fn lane_index(mask: i32, lane: usize) -> usize {
    ((mask >> (2 * lane)) & 0b11) as usize
}

#[inline(always)]
pub fn splat_f(value: f32) -> F32 {
    [value; 4]
}

#[inline(always)]
pub fn from_array_f(values: [f32; 4]) -> F32 {
    values
}

#[inline(always)]
pub fn to_array_f(v: F32) -> [f32; 4] {
    v
}

#[inline(always)]
pub fn add_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| x + y)
}

#[inline(always)]
pub fn sub_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| x - y)
}

#[inline(always)]
pub fn mul_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| x * y)
}

#[inline(always)]
pub fn div_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| x / y)
}

#[inline(always)]
pub fn and_f(a: F32, b: F32) -> F32 {
    zip_bits(a, b, |x, y| x & y)
}

#[inline(always)]
pub fn or_f(a: F32, b: F32) -> F32 {
    zip_bits(a, b, |x, y| x | y)
}

#[inline(always)]
pub fn xor_f(a: F32, b: F32) -> F32 {
    zip_bits(a, b, |x, y| x ^ y)
}

/// `!a & b`
#[inline(always)]
pub fn andnot_f(a: F32, b: F32) -> F32 {
    zip_bits(a, b, |x, y| !x & y)
}

#[inline(always)]
pub fn min_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| if x < y { x } else { y })
}

#[inline(always)]
pub fn max_f(a: F32, b: F32) -> F32 {
    zip_f(a, b, |x, y| if x > y { x } else { y })
}

#[inline(always)]
pub fn sqrt_f(v: F32) -> F32 {
    map_f(v, f32::sqrt)
}

/// No estimate instruction to mimic, so the "estimate" is exact.
#[inline(always)]
pub fn rcp_f(v: F32) -> F32 {
    map_f(v, |x| 1.0 / x)
}

#[inline(always)]
pub fn eq_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x == y)
}

#[inline(always)]
pub fn ne_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x != y)
}

#[inline(always)]
pub fn lt_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x < y)
}

#[inline(always)]
pub fn le_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x <= y)
}

#[inline(always)]
pub fn gt_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x > y)
}

#[inline(always)]
pub fn ge_f(a: F32, b: F32) -> Mask {
    cmp_f(a, b, |x, y| x >= y)
}

#[inline(always)]
pub fn shuffle_f<const MASK: i32>(v: F32) -> F32 {
    [
        v[lane_index(MASK, 0)],
        v[lane_index(MASK, 1)],
        v[lane_index(MASK, 2)],
        v[lane_index(MASK, 3)],
    ]
}

#[inline(always)]
pub fn bits_f2i(v: F32) -> I32 {
    v.map(|x| x.to_bits() as i32)
}

#[inline(always)]
pub fn bits_i2f(v: I32) -> F32 {
    v.map(|x| f32::from_bits(x as u32))
}

/// Round to nearest, ties to even; NaN and out of range lanes become
/// `i32::MIN` as `cvtps2dq` does.
#[inline(always)]
pub fn round_f2i(v: F32) -> I32 {
    v.map(|x| {
        if (-2_147_483_648.0..2_147_483_648.0).contains(&x) {
            x.round_ties_even() as i32
        } else {
            i32::MIN
        }
    })
}

#[inline(always)]
pub fn cvt_i2f(v: I32) -> F32 {
    v.map(|x| x as f32)
}

#[inline(always)]
pub fn splat_i(value: i32) -> I32 {
    [value; 4]
}

#[inline(always)]
pub fn from_array_i(values: [i32; 4]) -> I32 {
    values
}

#[inline(always)]
pub fn to_array_i(v: I32) -> [i32; 4] {
    v
}

#[inline(always)]
pub fn add_i(a: I32, b: I32) -> I32 {
    zip_i(a, b, i32::wrapping_add)
}

#[inline(always)]
pub fn sub_i(a: I32, b: I32) -> I32 {
    zip_i(a, b, i32::wrapping_sub)
}

#[inline(always)]
pub fn and_i(a: I32, b: I32) -> I32 {
    zip_i(a, b, |x, y| x & y)
}

#[inline(always)]
pub fn or_i(a: I32, b: I32) -> I32 {
    zip_i(a, b, |x, y| x | y)
}

#[inline(always)]
pub fn xor_i(a: I32, b: I32) -> I32 {
    zip_i(a, b, |x, y| x ^ y)
}

#[inline(always)]
pub fn shl_i<const BITS: i32>(v: I32) -> I32 {
    v.map(|x| ((x as u32) << BITS) as i32)
}

/// Logical (zero filling) right shift.
#[inline(always)]
pub fn shr_i<const BITS: i32>(v: I32) -> I32 {
    v.map(|x| ((x as u32) >> BITS) as i32)
}

#[inline(always)]
pub fn eq_i(a: I32, b: I32) -> Mask {
    cmp_i(a, b, |x, y| x == y)
}

#[inline(always)]
pub fn lt_i(a: I32, b: I32) -> Mask {
    cmp_i(a, b, |x, y| x < y)
}

#[inline(always)]
pub fn gt_i(a: I32, b: I32) -> Mask {
    cmp_i(a, b, |x, y| x > y)
}

#[inline(always)]
pub fn shuffle_i<const MASK: i32>(v: I32) -> I32 {
    [
        v[lane_index(MASK, 0)],
        v[lane_index(MASK, 1)],
        v[lane_index(MASK, 2)],
        v[lane_index(MASK, 3)],
    ]
}

#[inline(always)]
pub fn mask_from_array(lanes: [u32; 4]) -> Mask {
    lanes
}

#[inline(always)]
pub fn mask_to_array(m: Mask) -> [u32; 4] {
    m
}

#[inline(always)]
pub fn mask_and(a: Mask, b: Mask) -> Mask {
    [a[0] & b[0], a[1] & b[1], a[2] & b[2], a[3] & b[3]]
}

#[inline(always)]
pub fn mask_or(a: Mask, b: Mask) -> Mask {
    [a[0] | b[0], a[1] | b[1], a[2] | b[2], a[3] | b[3]]
}

#[inline(always)]
pub fn mask_xor(a: Mask, b: Mask) -> Mask {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

#[inline(always)]
pub fn mask_not(m: Mask) -> Mask {
    m.map(|x| !x)
}

/// One bit per lane, lane 0 in bit 0.
#[inline(always)]
pub fn mask_bits(m: Mask) -> u32 {
    m.iter()
        .enumerate()
        .fold(0, |bits, (lane, &v)| bits | ((v >> 31) << lane))
}

#[inline(always)]
pub fn blend_f(m: Mask, t: F32, f: F32) -> F32 {
    let lane = |i: usize| f32::from_bits((m[i] & t[i].to_bits()) | (!m[i] & f[i].to_bits()));
    [lane(0), lane(1), lane(2), lane(3)]
}

#[inline(always)]
pub fn blend_i(m: Mask, t: I32, f: I32) -> I32 {
    let lane = |i: usize| ((m[i] & t[i] as u32) | (!m[i] & f[i] as u32)) as i32;
    [lane(0), lane(1), lane(2), lane(3)]
}
