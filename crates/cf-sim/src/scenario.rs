//! Chamber start-up scenario configuration.

use crate::error::{SimError, SimResult};
use crate::network::{ChamberNetwork, NetworkOptions, Node, SingularPolicy};
use crate::reactor::Reactor;
use crate::sim::SimOptions;
use cf_components::{ChokedValve, PulseShape, PulsedMassFlowController, Reservoir};
use cf_core::units::{atm, k, m2, m3};
use cf_thermo::{Composition, StateInput, ThermoProvider};
use serde::{Deserialize, Serialize};

pub const FUEL_VALVE: &str = "fuel valve";
pub const OXIDIZER_VALVE: &str = "oxidizer valve";
pub const OUTLET_VALVE: &str = "outlet valve";
pub const IGNITER: &str = "igniter";

/// Gas held at a fixed state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasSpec {
    pub temperature_k: f64,
    pub pressure_atm: f64,
    /// Mole fractions, e.g. `"C2H6:1.0"` or `"O2:2, N2:7.52"`.
    pub composition: String,
}

impl GasSpec {
    pub fn new(temperature_k: f64, pressure_atm: f64, composition: &str) -> Self {
        Self {
            temperature_k,
            pressure_atm,
            composition: composition.to_string(),
        }
    }

    fn reservoir(&self, name: &str, provider: &dyn ThermoProvider) -> SimResult<Reservoir> {
        let comp = self.parse_composition()?;
        Ok(Reservoir::new(
            name,
            provider,
            k(self.temperature_k),
            atm(self.pressure_atm),
            &comp,
        )?)
    }

    fn parse_composition(&self) -> SimResult<Composition> {
        Ok(Composition::parse_mole_fractions(&self.composition)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChamberSpec {
    pub volume_m3: f64,
    /// Initial fill.
    pub fill: GasSpec,
}

/// Reference areas of the three choked valves [m²].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValveAreas {
    pub fuel_m2: f64,
    pub oxidizer_m2: f64,
    pub outlet_m2: f64,
}

/// Gaussian igniter pulse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseSpec {
    pub amplitude_kg_s: f64,
    pub t_peak_s: f64,
    pub fwhm_s: f64,
}

/// Everything needed to build and run one chamber start-up.
///
/// `Default` is the reference case: C2H6 and O2 at 750 K and 30 atm feeding a
/// 0.5 L chamber filled with O2 at 300 K and 1.1 atm, H-radical ignition
/// pulse peaking at 50 ms, exhaust to 1 atm, 100 ms horizon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberScenario {
    pub fuel: GasSpec,
    pub oxidizer: GasSpec,
    pub igniter: GasSpec,
    /// Sink behind the outlet valve; its pressure is also the expansion
    /// pressure of the exhaust velocity.
    pub exhaust: GasSpec,
    pub chamber: ChamberSpec,
    pub valves: ValveAreas,
    /// `None` runs without ignition source.
    pub pulse: Option<PulseSpec>,
    pub singular_policy: SingularPolicy,
    pub horizon_s: f64,
}

impl Default for ChamberScenario {
    fn default() -> Self {
        Self {
            fuel: GasSpec::new(750.0, 30.0, "C2H6:1.0"),
            oxidizer: GasSpec::new(750.0, 30.0, "O2:1.0"),
            igniter: GasSpec::new(300.0, 1.0, "H:1.0"),
            exhaust: GasSpec::new(300.0, 1.0, "O2:1.0"),
            chamber: ChamberSpec {
                volume_m3: 5e-4,
                fill: GasSpec::new(300.0, 1.1, "O2:1.0"),
            },
            valves: ValveAreas {
                fuel_m2: 4e-4,
                oxidizer_m2: 4e-4,
                outlet_m2: 1e-3,
            },
            pulse: Some(PulseSpec {
                amplitude_kg_s: 0.01,
                t_peak_s: 0.05,
                fwhm_s: 0.008,
            }),
            singular_policy: SingularPolicy::CloseValve,
            horizon_s: 0.1,
        }
    }
}

impl ChamberScenario {
    /// Integration options for this scenario's horizon.
    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            t_end: self.horizon_s,
            ..SimOptions::default()
        }
    }

    /// Build the network.
    ///
    /// Devices are attached in the order fuel valve, oxidizer valve, outlet
    /// valve, igniter (when a pulse is configured). Every reservoir gets its
    /// own state from the provider.
    pub fn build(&self, provider: Box<dyn ThermoProvider>) -> SimResult<ChamberNetwork> {
        if !(self.horizon_s >= 0.0 && self.horizon_s.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "horizon must be non-negative",
            });
        }

        let fill_comp = self.chamber.fill.parse_composition()?;
        let fill = provider.state(StateInput::TP {
            t: k(self.chamber.fill.temperature_k),
            p: atm(self.chamber.fill.pressure_atm),
            comp: &fill_comp,
        })?;
        let reactor = Reactor::new("chamber", m3(self.chamber.volume_m3), fill)?;

        let fuel = self.fuel.reservoir("fuel", provider.as_ref())?;
        let oxidizer = self.oxidizer.reservoir("oxidizer", provider.as_ref())?;
        let exhaust = self.exhaust.reservoir("exhaust", provider.as_ref())?;
        let igniter = match &self.pulse {
            Some(_) => Some(self.igniter.reservoir("igniter", provider.as_ref())?),
            None => None,
        };

        let options = NetworkOptions {
            p_exit: exhaust.pressure(),
            singular_policy: self.singular_policy,
        };
        let mut net = ChamberNetwork::new(provider, reactor).with_options(options);

        let fuel = net.add_reservoir(fuel);
        let oxidizer = net.add_reservoir(oxidizer);
        let exhaust = net.add_reservoir(exhaust);

        net.connect(
            ChokedValve::new(FUEL_VALVE, m2(self.valves.fuel_m2))?,
            Node::Reservoir(fuel),
            Node::Chamber,
        )?;
        net.connect(
            ChokedValve::new(OXIDIZER_VALVE, m2(self.valves.oxidizer_m2))?,
            Node::Reservoir(oxidizer),
            Node::Chamber,
        )?;
        net.connect(
            ChokedValve::new(OUTLET_VALVE, m2(self.valves.outlet_m2))?,
            Node::Chamber,
            Node::Reservoir(exhaust),
        )?;

        if let (Some(pulse), Some(igniter)) = (&self.pulse, igniter) {
            let shape = PulseShape::new(pulse.amplitude_kg_s, pulse.t_peak_s, pulse.fwhm_s)?;
            let igniter = net.add_reservoir(igniter);
            net.connect(
                PulsedMassFlowController::new(IGNITER, shape),
                Node::Reservoir(igniter),
                Node::Chamber,
            )?;
        }

        Ok(net)
    }
}
