//! Accuracy and performance audit of the fast kernels against their
//! `*_ref` references.
//!
//! A sweep walks the normal floats of a domain in bit order: lane `k` of
//! group `g` holds the float whose bit pattern is
//! `min_normal + (4g + k) · stride`, for positive and negative signs. With a
//! stride of 1 every normal float is visited.
//!
//! | Sweep | Threads | Output |
//! |---|---|---|
//! | [`precision_unary`], [`precision_atan2`] | rayon, one task per chunk of groups | [`PrecisionStats`] |
//! | [`time_unary`], [`time_atan2`] | calling thread | wall time |
//!
//! [`Kernel`] names the audited kernels with their default domains.

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::simd::{math, F32x4, LANE_COUNT};

pub type UnaryKernel = fn(F32x4) -> F32x4;
pub type BinaryKernel = fn(F32x4, F32x4) -> F32x4;

const MIN_NORMAL_BITS: u32 = 0x0080_0000;
const SIGN_BIT: u32 = 0x8000_0000;
const CHUNK_GROUPS: u64 = 1 << 14;

/// `|a - b|`, except that two equal infinities differ by 0.
pub fn abs_diff(a: f32, b: f32) -> f32 {
    if a.is_infinite() && a == b {
        0.0
    } else {
        (a - b).abs()
    }
}

/// Relative error of `approx` against `base`; 0 when both are zero.
pub fn rel_err(approx: f32, base: f32) -> f32 {
    if approx == 0.0 && base == 0.0 {
        0.0
    } else {
        abs_diff(approx, base) / base.abs()
    }
}

/// Interval of a one-argument sweep. Each side stops just short of its
/// bound; `extraordinary` adds `+0, -0, +∞, -∞`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Domain {
    pub lo: f32,
    pub hi: f32,
    pub extraordinary: bool,
}

impl Domain {
    pub const fn new(lo: f32, hi: f32, extraordinary: bool) -> Self {
        Self {
            lo,
            hi,
            extraordinary,
        }
    }
}

/// Running maximum and average relative error of a sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PrecisionStats {
    /// Lanes evaluated, NaN results included.
    pub tested: u64,
    /// Lanes whose relative error was NaN.
    pub nan_count: u64,
    pub max_rel_err: f32,
    pub total_rel_err: f64,
    /// Input at the maximum error; `worst_y` is only meaningful for
    /// two-argument kernels.
    pub worst_x: f32,
    pub worst_y: f32,
}

impl PrecisionStats {
    fn record(&mut self, fast: F32x4, reference: F32x4, x: F32x4, y: F32x4) {
        for lane in 0..LANE_COUNT {
            self.tested += 1;
            let err = rel_err(fast.lane(lane), reference.lane(lane));
            if err.is_nan() {
                self.nan_count += 1;
                continue;
            }
            self.total_rel_err += f64::from(err);
            if err > self.max_rel_err {
                self.max_rel_err = err;
                self.worst_x = x.lane(lane);
                self.worst_y = y.lane(lane);
            }
        }
    }

    fn merge(self, other: Self) -> Self {
        let worst = if other.max_rel_err > self.max_rel_err {
            other
        } else {
            self
        };
        Self {
            tested: self.tested + other.tested,
            nan_count: self.nan_count + other.nan_count,
            max_rel_err: worst.max_rel_err,
            total_rel_err: self.total_rel_err + other.total_rel_err,
            worst_x: worst.worst_x,
            worst_y: worst.worst_y,
        }
    }

    pub fn avg_rel_err(&self) -> f64 {
        if self.tested == 0 {
            0.0
        } else {
            self.total_rel_err / self.tested as f64
        }
    }
}

/// One signed half of a domain, walked in bit order.
#[derive(Copy, Clone, Debug)]
struct HalfSweep {
    start: u32,
    stride: u32,
    groups: u64,
}

impl HalfSweep {
    #[inline]
    fn group(&self, g: u64) -> F32x4 {
        let first = g * LANE_COUNT as u64;
        F32x4::from_array(std::array::from_fn(|k| {
            let offset = (first + k as u64) * u64::from(self.stride);
            f32::from_bits(self.start + offset as u32)
        }))
    }

    /// Applies `visit` to every group, split into chunks across the rayon
    /// pool, and merges the per-chunk statistics.
    fn par_stats<F>(&self, visit: F) -> PrecisionStats
    where
        F: Fn(F32x4, &mut PrecisionStats) + Sync + Send,
    {
        let chunks = self.groups.div_ceil(CHUNK_GROUPS);
        (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let mut stats = PrecisionStats::default();
                let end = ((chunk + 1) * CHUNK_GROUPS).min(self.groups);
                for g in chunk * CHUNK_GROUPS..end {
                    visit(self.group(g), &mut stats);
                }
                stats
            })
            .reduce(PrecisionStats::default, PrecisionStats::merge)
    }
}

/// Normal floats in `[min_normal, |bound|)` with the sign of `bound`.
fn half_sweeps(lo: f32, hi: f32, stride: u32) -> Vec<HalfSweep> {
    debug_assert!(lo <= 0.0 && hi >= 0.0, "sweep bounds must straddle zero");
    let stride = stride.max(1);
    [hi, lo]
        .into_iter()
        .filter(|&bound| bound != 0.0)
        .filter_map(|bound| {
            let top = bound.abs().to_bits();
            let span = top.checked_sub(MIN_NORMAL_BITS)?;
            let values = u64::from(span).div_ceil(u64::from(stride));
            let sign = if bound < 0.0 { SIGN_BIT } else { 0 };
            Some(HalfSweep {
                start: MIN_NORMAL_BITS | sign,
                stride,
                groups: values / LANE_COUNT as u64,
            })
        })
        .collect()
}

fn extraordinary() -> F32x4 {
    F32x4::new(0.0, -0.0, f32::INFINITY, f32::NEG_INFINITY)
}

/// Relative error of `fast` against `reference` over `domain`.
pub fn precision_unary(
    fast: UnaryKernel,
    reference: UnaryKernel,
    domain: Domain,
    stride: u32,
) -> PrecisionStats {
    let mut stats = half_sweeps(domain.lo, domain.hi, stride)
        .iter()
        .map(|sweep| {
            sweep.par_stats(|x, stats| stats.record(fast(x), reference(x), x, x))
        })
        .fold(PrecisionStats::default(), PrecisionStats::merge);

    if domain.extraordinary {
        let x = extraordinary();
        stats.record(fast(x), reference(x), x, x);
    }
    stats
}

/// Wall time of `kernel` over `domain` on the calling thread.
pub fn time_unary(kernel: UnaryKernel, domain: Domain, stride: u32) -> Duration {
    let start = Instant::now();
    let mut accum = F32x4::zero();
    for sweep in half_sweeps(domain.lo, domain.hi, stride) {
        for g in 0..sweep.groups {
            accum += kernel(black_box(sweep.group(g)));
        }
    }
    if domain.extraordinary {
        accum += kernel(extraordinary());
    }
    black_box(accum);
    start.elapsed()
}

/// Fixed `(y, x)` pairs on the axes, and with `extraordinary` the pairs
/// mixing signed zeros and infinities.
fn axis_pairs(extraordinary: bool) -> Vec<(F32x4, F32x4)> {
    let a = F32x4::new(0.0, 0.0, 1.0, -1.0);
    let b = F32x4::new(1.0, -1.0, -0.0, -0.0);
    let mut pairs = vec![(b, a), (a, b)];
    if extraordinary {
        let inf = f32::INFINITY;
        let a = F32x4::new(0.0, 0.0, inf, -inf);
        let b = F32x4::new(inf, -inf, -0.0, -0.0);
        pairs.extend([(b, a), (a, b)]);
    }
    pairs
}

#[inline]
fn circle_y(x: F32x4) -> F32x4 {
    (F32x4::splat(1.0) - x * x).sqrt()
}

/// Relative error of `fast` against `reference` for `(y, x)` on the unit
/// circle, both signs of `y`, plus the axis pairs.
pub fn precision_atan2(
    fast: BinaryKernel,
    reference: BinaryKernel,
    extraordinary: bool,
    stride: u32,
) -> PrecisionStats {
    let mut stats = half_sweeps(-1.0, 1.0, stride)
        .iter()
        .map(|sweep| {
            sweep.par_stats(|x, stats| {
                let y = circle_y(x);
                stats.record(fast(y, x), reference(y, x), x, y);
                stats.record(fast(-y, x), reference(-y, x), x, -y);
            })
        })
        .fold(PrecisionStats::default(), PrecisionStats::merge);

    for (y, x) in axis_pairs(extraordinary) {
        stats.record(fast(y, x), reference(y, x), x, y);
    }
    stats
}

/// Wall time of `kernel` on the unit circle sweep.
pub fn time_atan2(kernel: BinaryKernel, extraordinary: bool, stride: u32) -> Duration {
    let start = Instant::now();
    let mut accum = F32x4::zero();
    for sweep in half_sweeps(-1.0, 1.0, stride) {
        for g in 0..sweep.groups {
            let x = black_box(sweep.group(g));
            let y = circle_y(x);
            accum += kernel(y, x);
            accum += kernel(-y, x);
        }
    }
    for (y, x) in axis_pairs(extraordinary) {
        accum += kernel(y, x);
    }
    black_box(accum);
    start.elapsed()
}

/// The audited kernels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kernel {
    Abs,
    Exp,
    Sin,
    Cos,
    Atan,
    Atan2,
}

impl Kernel {
    pub const ALL: [Kernel; 6] = [
        Kernel::Abs,
        Kernel::Exp,
        Kernel::Sin,
        Kernel::Cos,
        Kernel::Atan,
        Kernel::Atan2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Abs => "abs",
            Kernel::Exp => "exp",
            Kernel::Sin => "sin",
            Kernel::Cos => "cos",
            Kernel::Atan => "atan",
            Kernel::Atan2 => "atan2",
        }
    }

    /// Sweep domain of a one-argument kernel; `None` for atan2, which is
    /// swept on the unit circle.
    pub fn domain(self) -> Option<Domain> {
        let inf = f32::INFINITY;
        match self {
            Kernel::Abs => Some(Domain::new(-inf, inf, true)),
            Kernel::Exp => Some(Domain::new(-80.0, 80.0, true)),
            Kernel::Sin | Kernel::Cos => Some(Domain::new(-100.0, 100.0, false)),
            Kernel::Atan => Some(Domain::new(-inf, inf, true)),
            Kernel::Atan2 => None,
        }
    }

    /// `(fast, reference)` of a one-argument kernel.
    fn unary(self) -> Option<(UnaryKernel, UnaryKernel)> {
        fn pair(fast: UnaryKernel, reference: UnaryKernel) -> Option<(UnaryKernel, UnaryKernel)> {
            Some((fast, reference))
        }

        match self {
            Kernel::Abs => pair(math::abs, math::abs_ref),
            Kernel::Exp => pair(math::exp, math::exp_ref),
            Kernel::Sin => pair(math::sin, math::sin_ref),
            Kernel::Cos => pair(math::cos, math::cos_ref),
            Kernel::Atan => pair(math::atan, math::atan_ref),
            Kernel::Atan2 => None,
        }
    }

    /// Times the reference and the fast kernel, then measures precision.
    pub fn audit(self, stride: u32) -> KernelReport {
        match (self.unary(), self.domain()) {
            (Some((fast, reference)), Some(domain)) => KernelReport {
                kernel: self,
                reference_time: time_unary(reference, domain, stride),
                fast_time: time_unary(fast, domain, stride),
                stats: precision_unary(fast, reference, domain, stride),
            },
            _ => KernelReport {
                kernel: self,
                reference_time: time_atan2(math::atan2_ref, true, stride),
                fast_time: time_atan2(math::atan2, true, stride),
                stats: precision_atan2(math::atan2, math::atan2_ref, true, stride),
            },
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown kernel '{s}'"))
    }
}

/// Timing and precision of one kernel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KernelReport {
    pub kernel: Kernel,
    pub reference_time: Duration,
    pub fast_time: Duration,
    pub stats: PrecisionStats,
}

impl KernelReport {
    pub fn speedup(&self) -> f64 {
        self.reference_time.as_secs_f64() / self.fast_time.as_secs_f64().max(f64::MIN_POSITIVE)
    }
}

impl fmt::Display for KernelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain = match self.kernel.domain() {
            Some(d) => format!("({}, {})", d.lo, d.hi),
            None => "unit circle".to_string(),
        };
        writeln!(f, "{} on {}", self.kernel, domain)?;
        writeln!(
            f,
            "  reference: {:.6} s, fast: {:.6} s ({:.2}x)",
            self.reference_time.as_secs_f64(),
            self.fast_time.as_secs_f64(),
            self.speedup()
        )?;
        let s = &self.stats;
        write!(f, "  max rel err: {:.6e} at x = {:e}", s.max_rel_err, s.worst_x)?;
        if self.kernel == Kernel::Atan2 {
            write!(f, ", y = {:e}", s.worst_y)?;
        }
        writeln!(f)?;
        write!(
            f,
            "  avg rel err: {:.6e} over {} values",
            s.avg_rel_err(),
            s.tested
        )?;
        if s.nan_count != 0 {
            write!(f, ", {} NaN", s.nan_count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_err_rules() {
        assert_eq!(rel_err(0.0, 0.0), 0.0);
        assert_eq!(rel_err(-0.0, 0.0), 0.0);
        assert_eq!(abs_diff(f32::INFINITY, f32::INFINITY), 0.0);
        assert_eq!(abs_diff(f32::NEG_INFINITY, f32::NEG_INFINITY), 0.0);
        assert!(abs_diff(f32::INFINITY, f32::NEG_INFINITY).is_infinite());
        assert!((rel_err(1.01, 1.0) - 0.01).abs() < 1e-6);
        assert!(rel_err(1.0, 0.0).is_infinite());
    }

    #[test]
    fn test_half_sweeps_cover_normals() {
        let sweeps = half_sweeps(-1.0, 1.0, 1);
        assert_eq!(sweeps.len(), 2);
        let span = 1.0f32.to_bits() - MIN_NORMAL_BITS;
        assert_eq!(sweeps[0].groups, u64::from(span) / 4);
        assert_eq!(sweeps[0].group(0).lane(0), f32::MIN_POSITIVE);
        assert_eq!(sweeps[1].group(0).lane(0), -f32::MIN_POSITIVE);

        let last = sweeps[0].group(sweeps[0].groups - 1).lane(3);
        assert!(last < 1.0 && last > 0.99);
    }

    #[test]
    fn test_empty_side_skipped() {
        assert_eq!(half_sweeps(0.0, 10.0, 1).len(), 1);
        assert!(half_sweeps(0.0, 0.0, 1).is_empty());
    }

    #[test]
    fn test_abs_is_exact() {
        let stats = precision_unary(
            math::abs,
            math::abs_ref,
            Domain::new(f32::NEG_INFINITY, f32::INFINITY, true),
            1 << 16,
        );
        assert_eq!(stats.max_rel_err, 0.0);
        assert_eq!(stats.nan_count, 0);
        assert!(stats.tested > 60_000);
    }

    #[test]
    fn test_stats_merge_keeps_worst() {
        let mut a = PrecisionStats::default();
        a.record(F32x4::splat(1.1), F32x4::splat(1.0), F32x4::splat(5.0), F32x4::zero());
        let mut b = PrecisionStats::default();
        b.record(F32x4::splat(1.5), F32x4::splat(1.0), F32x4::splat(7.0), F32x4::zero());
        let merged = a.merge(b);
        assert_eq!(merged.tested, 8);
        assert_eq!(merged.worst_x, 7.0);
        assert!((merged.max_rel_err - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_names() {
        for kernel in Kernel::ALL {
            assert_eq!(kernel.name().parse::<Kernel>(), Ok(kernel));
        }
        assert!("tan".parse::<Kernel>().is_err());
        assert!(Kernel::Atan2.domain().is_none());
    }

    #[test]
    fn test_audit_report_display() {
        let report = Kernel::Atan2.audit(1 << 18);
        let text = report.to_string();
        assert!(text.starts_with("atan2 on unit circle"));
        assert!(text.contains("y ="));
        assert!(report.stats.max_rel_err < 1e-5);
    }
}
