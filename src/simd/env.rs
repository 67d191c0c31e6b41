//! Numeric environment checks.
//!
//! The kernels' error bounds assume float to int conversion rounds to nearest
//! with ties to even. On x86 that mode lives in the process-wide MXCSR
//! register; nothing in this crate changes it, but foreign code linked into
//! the process could. [`verify`] checks the behaviour once at startup rather
//! than reading the register, so the same check works on every backend.

use tracing::debug;

use super::{backend_name, F32x4};
use crate::error::{LocalizationError, Result};

/// Checks the lane group conversions and fails if they do not round to
/// nearest even.
pub fn verify() -> Result<()> {
    let rounded = F32x4::new(2.5, 3.5, -2.5, -0.5).round_to_i32().to_array();
    if rounded != [2, 4, -2, 0] {
        return Err(LocalizationError::NumericEnvironment(format!(
            "float to int conversion does not round to nearest even: \
             [2.5, 3.5, -2.5, -0.5] -> {rounded:?}"
        )));
    }

    let one = F32x4::splat(1.0) + F32x4::splat(f32::EPSILON / 2.0);
    if one.lane(0) != 1.0 {
        return Err(LocalizationError::NumericEnvironment(
            "float addition does not round to nearest".to_string(),
        ));
    }

    debug!(backend = backend_name(), "numeric environment verified");
    Ok(())
}
