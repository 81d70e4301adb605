//! Isentropic exhaust velocity of the chamber gas.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use cf_core::units::{Pressure, Velocity, mps};
use cf_thermo::ThermoState;

/// Ideal velocity after isentropic expansion from the chamber state to `p_exit`:
///
/// `v = sqrt(2k/(k-1) · R · T · (1 - (p_exit/p)^((k-1)/k)))`
///
/// Equal pressures give zero. A chamber below the exit pressure has no real
/// solution and yields `UndefinedExpansion`.
pub fn exhaust_velocity(chamber: &ThermoState, p_exit: Pressure) -> ComponentResult<Velocity> {
    let p = chamber.pressure().value;
    let p_exit = p_exit.value;
    check_finite(p_exit, "exit pressure")?;
    if p < p_exit {
        return Err(ComponentError::UndefinedExpansion {
            p_chamber_pa: p,
            p_exit_pa: p_exit,
        });
    }

    let k = chamber.gamma();
    let expansion = 1.0 - (p_exit / p).powf((k - 1.0) / k);
    let v2 = 2.0 * k / (k - 1.0)
        * chamber.specific_gas_constant()
        * chamber.temperature().value
        * expansion.max(0.0);
    let v = v2.sqrt();
    check_finite(v, "exhaust velocity")?;
    Ok(mps(v))
}
