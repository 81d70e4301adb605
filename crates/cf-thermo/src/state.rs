//! Thermodynamic state definitions.

use crate::composition::Composition;
use crate::error::ThermoResult;
use crate::model::validation;
use crate::species::SpeciesArray;
use cf_core::units::constants::R_UNIVERSAL;
use cf_core::units::{Density, Pressure, Temperature};

/// Specific enthalpy [J/kg], including formation enthalpy.
pub type SpecEnthalpy = f64;

/// Specific internal energy [J/kg], including formation enthalpy.
pub type SpecEnergy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Input specification for creating a thermodynamic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput<'a> {
    /// Temperature, pressure and composition.
    TP {
        t: Temperature,
        p: Pressure,
        comp: &'a Composition,
    },
    /// Total internal energy, volume and species mass inventory of a closed
    /// control volume. `t_hint_k` seeds the temperature iteration.
    UV {
        internal_energy_j: f64,
        volume_m3: f64,
        species_masses_kg: &'a SpeciesArray,
        t_hint_k: Option<f64>,
    },
}

/// Thermodynamic state of an ideal-gas mixture.
///
/// Immutable value produced by a [`crate::ThermoProvider`]; the derived
/// properties are evaluated once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    p: Pressure,
    t: Temperature,
    comp: Composition,
    rho: Density,
    molar_mass: f64,
    cp: SpecHeatCapacity,
    cv: SpecHeatCapacity,
    h: SpecEnthalpy,
}

/// Mixture properties evaluated at one temperature.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MixtureProperties {
    pub cp: SpecHeatCapacity,
    pub h: SpecEnthalpy,
}

impl ThermoState {
    pub(crate) fn from_parts(
        p: Pressure,
        t: Temperature,
        comp: Composition,
        props: MixtureProperties,
    ) -> ThermoResult<Self> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        validation::validate_cp(props.cp)?;
        validation::validate_enthalpy(props.h)?;

        let molar_mass = comp.molar_mass();
        let r_specific = R_UNIVERSAL / molar_mass;
        let cv = props.cp - r_specific;
        validation::validate_cp(cv)?;

        let rho = Density::new::<uom::si::mass_density::kilogram_per_cubic_meter>(
            p.value / (r_specific * t.value),
        );
        validation::validate_density(rho)?;

        Ok(Self {
            p,
            t,
            comp,
            rho,
            molar_mass,
            cp: props.cp,
            cv,
            h: props.h,
        })
    }

    /// Get pressure.
    pub fn pressure(&self) -> Pressure {
        self.p
    }

    /// Get temperature.
    pub fn temperature(&self) -> Temperature {
        self.t
    }

    /// Get composition.
    pub fn composition(&self) -> &Composition {
        &self.comp
    }

    pub fn density(&self) -> Density {
        self.rho
    }

    /// Mean molar mass [kg/kmol].
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    /// Specific gas constant R_u / M [J/(kg·K)].
    pub fn specific_gas_constant(&self) -> f64 {
        R_UNIVERSAL / self.molar_mass
    }

    pub fn cp(&self) -> SpecHeatCapacity {
        self.cp
    }

    pub fn cv(&self) -> SpecHeatCapacity {
        self.cv
    }

    /// Heat capacity ratio k = cp/cv.
    pub fn gamma(&self) -> f64 {
        self.cp / self.cv
    }

    pub fn h(&self) -> SpecEnthalpy {
        self.h
    }

    /// Specific internal energy u = h - p/ρ.
    pub fn u(&self) -> SpecEnergy {
        self.h - self.p.value / self.rho.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use cf_core::units::{k, pa};

    fn props() -> MixtureProperties {
        MixtureProperties {
            cp: 1040.0,
            h: 0.0,
        }
    }

    #[test]
    fn derived_properties_follow_ideal_gas_law() {
        let comp = Composition::pure(Species::N2);
        let state = ThermoState::from_parts(pa(101_325.0), k(300.0), comp, props()).unwrap();

        let r = R_UNIVERSAL / Species::N2.molar_mass();
        assert!((state.specific_gas_constant() - r).abs() < 1e-12);
        assert!((state.density().value - 101_325.0 / (r * 300.0)).abs() < 1e-12);
        assert!((state.cv() - (1040.0 - r)).abs() < 1e-12);
        assert!((state.u() - (-r * 300.0)).abs() < 1e-9);
        assert!(state.gamma() > 1.0);
    }

    #[test]
    fn reject_non_physical_inputs() {
        let comp = Composition::pure(Species::N2);
        assert!(ThermoState::from_parts(pa(-100.0), k(300.0), comp.clone(), props()).is_err());
        assert!(ThermoState::from_parts(pa(101_325.0), k(0.0), comp.clone(), props()).is_err());
        assert!(ThermoState::from_parts(pa(f64::NAN), k(300.0), comp.clone(), props()).is_err());

        // cp below R gives a negative cv.
        let bad = MixtureProperties { cp: 100.0, h: 0.0 };
        assert!(ThermoState::from_parts(pa(101_325.0), k(300.0), comp, bad).is_err());
    }
}
