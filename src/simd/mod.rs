//! Portable 4-wide lane groups and the vector math kernels built on them.
//!
//! The build script selects one backend per target and exposes it as a cfg
//! flag:
//!
//! | cfg | Backend | Targets |
//! |---|---|---|
//! | `sse` | SSE2 intrinsics | x86, x86_64 |
//! | `neon` | NEON intrinsics | aarch64 |
//! | `fallback` | per-lane loops over `[f32; 4]` | everything else, or `SIMDLOC_FORCE_FALLBACK=1` |
//!
//! All three expose the same operation set with the same numeric semantics,
//! so [`F32x4`], [`I32x4`] and [`Mask4`] behave identically on every target.

#[cfg(sse)]
mod sse;
#[cfg(sse)]
use sse as backend;

#[cfg(neon)]
mod neon;
#[cfg(neon)]
use neon as backend;

#[cfg(fallback)]
mod fallback;
#[cfg(fallback)]
use fallback as backend;

pub mod env;
mod f32x4;
mod i32x4;
mod mask;
pub mod math;
pub mod traits;

pub use f32x4::F32x4;
pub use i32x4::I32x4;
pub use mask::Mask4;
pub use traits::{Lane, LaneMask};

pub const LANE_COUNT: usize = 4;

/// Encodes a lane permutation for [`F32x4::shuffle`] and [`I32x4::shuffle`]:
/// output lane `k` takes input lane `ik`.
pub const fn shuffle_mask(i0: u32, i1: u32, i2: u32, i3: u32) -> i32 {
    ((i3 << 6) | (i2 << 4) | (i1 << 2) | i0) as i32
}

/// Name of the backend compiled into this build.
pub const fn backend_name() -> &'static str {
    if cfg!(sse) {
        "sse2"
    } else if cfg!(neon) {
        "neon"
    } else {
        "fallback"
    }
}
