//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use cf_core::numeric::ensure_finite;

/// Absolute floor for a meaningful pressure difference (Pa).
pub const EPSILON_PRESSURE: f64 = 1e-3;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(())
}

/// Critical-flow factor `(2/(k+1))^((k+1)/(2(k-1)))`.
pub fn choke_factor(gamma: f64) -> f64 {
    (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (2.0 * (gamma - 1.0)))
}
