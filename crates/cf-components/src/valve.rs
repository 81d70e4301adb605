//! Choked (critical-flow) valve.

use crate::common::{EPSILON_PRESSURE, check_finite, check_non_negative, choke_factor};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FlowDevice, FlowLaw, PortStates};
use cf_core::units::{Area, MassRate, Pressure, kgps};
use cf_thermo::ThermoState;

/// Choked mass flow [kg/s] through `area_m2` from an upstream gas at
/// (`p_up_pa`, `t_up_k`) with heat capacity ratio `gamma` and specific gas
/// constant `r_specific` [J/(kg·K)].
pub fn choked_mass_flow_rate(
    area_m2: f64,
    p_up_pa: f64,
    t_up_k: f64,
    gamma: f64,
    r_specific: f64,
) -> f64 {
    area_m2 * p_up_pa * (gamma / (r_specific * t_up_k)).sqrt() * choke_factor(gamma)
}

/// Linear flow coefficient [kg/(s·Pa)] valid for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conductance {
    coeff: f64,
}

impl Conductance {
    pub const ZERO: Conductance = Conductance { coeff: 0.0 };

    pub fn new(coeff: f64) -> ComponentResult<Self> {
        check_non_negative(coeff, "conductance")?;
        Ok(Self { coeff })
    }

    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// One-directional flow `C · max(p_up - p_down, 0)`.
    #[inline]
    pub fn flow(&self, p_up_pa: f64, p_down_pa: f64) -> f64 {
        self.coeff * (p_up_pa - p_down_pa).max(0.0)
    }
}

/// Smallest pressure differential for which a conductance is defined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingularityGuard {
    /// Fraction of upstream pressure.
    pub rel: f64,
    /// Absolute floor [Pa].
    pub abs_pa: f64,
}

impl Default for SingularityGuard {
    fn default() -> Self {
        Self {
            rel: 1e-3,
            abs_pa: EPSILON_PRESSURE,
        }
    }
}

impl SingularityGuard {
    pub fn min_dp(&self, p_up_pa: f64) -> f64 {
        (self.rel * p_up_pa).max(self.abs_pa)
    }
}

/// Valve that always passes the choked mass flow of its upstream state.
///
/// The flow is expressed as a conductance `C = mdot_choked / (P1 - P2)` so the
/// integrator can apply it to the evolving pressure difference inside a step.
/// The coefficient is recomputed from fresh states every step and never stored.
#[derive(Debug, Clone)]
pub struct ChokedValve {
    name: String,
    area: Area,
    guard: SingularityGuard,
}

impl ChokedValve {
    pub fn new(name: impl Into<String>, area: Area) -> ComponentResult<Self> {
        check_non_negative(area.value, "valve area")?;
        Ok(Self {
            name: name.into(),
            area,
            guard: SingularityGuard::default(),
        })
    }

    pub fn with_guard(mut self, guard: SingularityGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn guard(&self) -> SingularityGuard {
        self.guard
    }

    /// A zero-area valve never passes flow.
    pub fn is_closed(&self) -> bool {
        self.area.value == 0.0
    }

    /// Choked mass flow from the upstream state, independent of downstream.
    pub fn choked_mass_flow(&self, upstream: &ThermoState) -> ComponentResult<MassRate> {
        let gamma = upstream.gamma();
        check_finite(gamma, "gamma")?;
        if gamma <= 1.0 {
            return Err(ComponentError::NonPhysical {
                what: "heat capacity ratio must exceed 1",
            });
        }
        let mdot = choked_mass_flow_rate(
            self.area.value,
            upstream.pressure().value,
            upstream.temperature().value,
            gamma,
            upstream.specific_gas_constant(),
        );
        check_finite(mdot, "choked mass flow")?;
        Ok(kgps(mdot))
    }

    /// Conductance for the current step.
    ///
    /// Fails with `SingularConductance` when `P1 - P2` is below the guard.
    pub fn conductance(
        &self,
        upstream: &ThermoState,
        p_down: Pressure,
    ) -> ComponentResult<Conductance> {
        if self.is_closed() {
            return Ok(Conductance::ZERO);
        }
        let p_up = upstream.pressure().value;
        let p_down = p_down.value;
        check_finite(p_down, "downstream pressure")?;

        let dp = p_up - p_down;
        if dp <= self.guard.min_dp(p_up) {
            return Err(ComponentError::SingularConductance {
                device: self.name.clone(),
                p_up_pa: p_up,
                p_down_pa: p_down,
            });
        }

        let mdot = self.choked_mass_flow(upstream)?.value;
        Conductance::new(mdot / dp)
    }

    /// Mass flow reported through the conductance, `C · (P1 - P2)`.
    pub fn conductance_flow(
        &self,
        upstream: &ThermoState,
        p_down: Pressure,
    ) -> ComponentResult<MassRate> {
        let c = self.conductance(upstream, p_down)?;
        Ok(kgps(c.flow(upstream.pressure().value, p_down.value)))
    }
}

impl FlowDevice for ChokedValve {
    fn name(&self) -> &str {
        &self.name
    }

    fn freeze(&self, _t_s: f64, ports: PortStates<'_>) -> ComponentResult<FlowLaw> {
        if self.is_closed() {
            return Ok(FlowLaw::Closed);
        }
        let c = self.conductance(ports.upstream, ports.downstream.pressure())?;
        Ok(FlowLaw::Conductance(c))
    }
}
