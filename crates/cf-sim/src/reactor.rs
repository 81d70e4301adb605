//! Fixed-volume reacting control volume.

use crate::error::{SimError, SimResult};
use cf_core::units::Volume;
use cf_thermo::{Species, SpeciesArray, StateInput, ThermoProvider, ThermoResult, ThermoState};

/// Extensive state of the reactor: total internal energy and the mass of
/// every species. Total mass is the sum of the species masses.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactorState {
    /// Total internal energy [J]
    pub internal_energy_j: f64,
    /// Species inventory [kg]
    pub species_masses_kg: SpeciesArray,
}

impl ReactorState {
    pub fn mass_kg(&self) -> f64 {
        self.species_masses_kg.iter().sum()
    }

    /// Read from a flat slice laid out as `[U, m_0 .. m_n]`.
    pub fn from_slice(x: &[f64]) -> SimResult<Self> {
        if x.len() < ReactorState::LEN {
            return Err(SimError::InvalidArg {
                what: "reactor state slice too short",
            });
        }
        let mut species_masses_kg = [0.0; Species::COUNT];
        species_masses_kg.copy_from_slice(&x[1..ReactorState::LEN]);
        Ok(Self {
            internal_energy_j: x[0],
            species_masses_kg,
        })
    }

    /// Number of scalars in the flat layout.
    pub const LEN: usize = 1 + Species::COUNT;

    /// Write into the first [`ReactorState::LEN`] entries of `out`.
    pub fn write_to(&self, out: &mut [f64]) {
        out[0] = self.internal_energy_j;
        out[1..ReactorState::LEN].copy_from_slice(&self.species_masses_kg);
    }
}

/// A stream entering the reactor with fixed properties.
#[derive(Clone, Copy, Debug)]
pub struct Inflow<'a> {
    pub mdot_kg_s: f64,
    /// Specific enthalpy of the stream [J/kg]
    pub enthalpy_j_kg: f64,
    pub mass_fractions: &'a SpeciesArray,
}

/// Time derivatives of a [`ReactorState`].
#[derive(Clone, Debug, PartialEq)]
pub struct ReactorRates {
    pub du_dt: f64,
    pub dm_dt: SpeciesArray,
}

impl ReactorRates {
    pub fn mass_rate(&self) -> f64 {
        self.dm_dt.iter().sum()
    }
}

/// Accepted reactor state kept for error reports.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactorSnapshot {
    pub t_s: f64,
    pub state: ThermoState,
    pub mass_kg: f64,
    pub internal_energy_j: f64,
}

/// Ideal-gas reactor with rigid walls and no heat loss.
///
/// The reactor itself is stateless between calls; its extensive state lives
/// in the integrator's state vector and every intensive property is derived
/// from it through the provider.
#[derive(Clone, Debug)]
pub struct Reactor {
    name: String,
    volume: Volume,
    initial: ThermoState,
}

impl Reactor {
    pub fn new(name: impl Into<String>, volume: Volume, initial: ThermoState) -> SimResult<Self> {
        if !(volume.value > 0.0 && volume.value.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "reactor volume must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            volume,
            initial,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Gas filling the reactor at t = 0.
    pub fn initial(&self) -> &ThermoState {
        &self.initial
    }

    /// Extensive state of the reactor filled with `state`.
    pub fn fill(&self, state: &ThermoState) -> ReactorState {
        let mass = state.density().value * self.volume.value;
        let y = state.composition().mass_fractions();
        let mut species_masses_kg = [0.0; Species::COUNT];
        for (m, yi) in species_masses_kg.iter_mut().zip(y.iter()) {
            *m = mass * yi;
        }
        ReactorState {
            internal_energy_j: mass * state.u(),
            species_masses_kg,
        }
    }

    /// Derive the intensive state from the extensive one.
    pub fn thermo_state(
        &self,
        provider: &dyn ThermoProvider,
        state: &ReactorState,
        t_hint_k: Option<f64>,
    ) -> ThermoResult<ThermoState> {
        provider.state(StateInput::UV {
            internal_energy_j: state.internal_energy_j,
            volume_m3: self.volume.value,
            species_masses_kg: &state.species_masses_kg,
            t_hint_k,
        })
    }

    /// Conservation laws for the current gas `chamber`.
    ///
    /// ```text
    /// dU/dt   = Σ mdot_in·h_in − mdot_out·h
    /// dm_i/dt = Σ mdot_in·Y_i,in − mdot_out·Y_i + V·ω_i
    /// ```
    ///
    /// Outflow leaves with the reactor's own composition and enthalpy.
    pub fn rates(
        &self,
        provider: &dyn ThermoProvider,
        chamber: &ThermoState,
        inflows: &[Inflow<'_>],
        outflow_kg_s: f64,
    ) -> ThermoResult<ReactorRates> {
        let mut du_dt = 0.0;
        let mut dm_dt = provider.kinetics_source(chamber, self.volume.value)?;

        for inflow in inflows {
            du_dt += inflow.mdot_kg_s * inflow.enthalpy_j_kg;
            for (dm, y) in dm_dt.iter_mut().zip(inflow.mass_fractions.iter()) {
                *dm += inflow.mdot_kg_s * y;
            }
        }

        if outflow_kg_s != 0.0 {
            du_dt -= outflow_kg_s * provider.specific_enthalpy(chamber);
            let y = chamber.composition().mass_fractions();
            for (dm, yi) in dm_dt.iter_mut().zip(y.iter()) {
                *dm -= outflow_kg_s * yi;
            }
        }

        Ok(ReactorRates { du_dt, dm_dt })
    }
}
