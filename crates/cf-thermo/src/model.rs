//! Thermochemical provider trait and validation helpers.

use crate::error::{ThermoError, ThermoResult};
use crate::species::SpeciesArray;
use crate::state::{SpecEnthalpy, StateInput, ThermoState};
use cf_core::units::{Density, Pressure, Temperature};

/// Thermochemical state provider.
///
/// The simulator only talks to chemistry through this trait: it derives
/// intensive states from (T, P, composition) or from the extensive inventory of
/// a rigid control volume, reads enthalpies, and asks for net species source
/// terms. Implementations must be thread-safe (Send + Sync).
pub trait ThermoProvider: Send + Sync {
    /// Get the provider name (for debugging/logging).
    fn name(&self) -> &str;

    /// Create a thermodynamic state from an input specification.
    fn state(&self, input: StateInput<'_>) -> ThermoResult<ThermoState>;

    /// Specific enthalpy [J/kg] at the given state, formation enthalpy included.
    fn specific_enthalpy(&self, state: &ThermoState) -> SpecEnthalpy {
        state.h()
    }

    /// Net mass production rate [kg/s] of each species in a volume [m³] of
    /// gas at the given state.
    fn kinetics_source(&self, state: &ThermoState, volume_m3: f64) -> ThermoResult<SpeciesArray>;
}

/// Validation helpers for thermodynamic properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> ThermoResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> ThermoResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> ThermoResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure a specific heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> ThermoResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "heat capacity must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite (can be negative).
    pub fn validate_enthalpy(h: f64) -> ThermoResult<()> {
        if !h.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }

    /// Ensure a control volume is positive and finite.
    pub fn validate_volume(volume_m3: f64) -> ThermoResult<()> {
        if !volume_m3.is_finite() || volume_m3 <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "volume must be positive and finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use cf_core::units::Density;
    use cf_core::units::{k, pa};

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(pa(101325.0)).is_ok());
        assert!(validate_pressure(pa(-100.0)).is_err());
        assert!(validate_pressure(pa(0.0)).is_err());
        assert!(validate_pressure(pa(f64::NAN)).is_err());
    }

    #[test]
    fn validate_positive_temperature() {
        assert!(validate_temperature(k(300.0)).is_ok());
        assert!(validate_temperature(k(-10.0)).is_err());
        assert!(validate_temperature(k(0.0)).is_err());
    }

    #[test]
    fn validate_density_positive() {
        use uom::si::mass_density::kilogram_per_cubic_meter;
        assert!(validate_density(Density::new::<kilogram_per_cubic_meter>(12.0)).is_ok());
        assert!(validate_density(Density::new::<kilogram_per_cubic_meter>(0.0)).is_err());
    }

    #[test]
    fn validate_enthalpy_allows_negative() {
        assert!(validate_enthalpy(-2.4e6).is_ok());
        assert!(validate_enthalpy(f64::INFINITY).is_err());
    }

    #[test]
    fn validate_volume_positive() {
        assert!(validate_volume(5e-4).is_ok());
        assert!(validate_volume(0.0).is_err());
        assert!(validate_volume(f64::NAN).is_err());
    }
}
