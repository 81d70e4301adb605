//! Flow-device interface used by the reactor network.

use crate::controller::PulseShape;
use crate::error::ComponentResult;
use crate::valve::Conductance;
use cf_thermo::ThermoState;

/// States on either side of a flow device at the start of a step.
#[derive(Clone, Copy, Debug)]
pub struct PortStates<'a> {
    pub upstream: &'a ThermoState,
    pub downstream: &'a ThermoState,
}

/// Flow law of a device, frozen for the duration of one integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowLaw {
    /// No flow.
    Closed,
    /// `mdot = C · max(p_up - p_down, 0)` with C fixed at step start.
    Conductance(Conductance),
    /// Prescribed pulse, a pure function of time.
    Pulse(PulseShape),
}

impl FlowLaw {
    /// Mass flow [kg/s] at time `t_s` for the instantaneous port pressures.
    pub fn mass_flow(&self, t_s: f64, p_up_pa: f64, p_down_pa: f64) -> f64 {
        match self {
            FlowLaw::Closed => 0.0,
            FlowLaw::Conductance(c) => c.flow(p_up_pa, p_down_pa),
            FlowLaw::Pulse(shape) => shape.rate(t_s),
        }
    }

    /// Frozen conductance, if this law is pressure driven.
    pub fn conductance(&self) -> Option<Conductance> {
        match self {
            FlowLaw::Conductance(c) => Some(*c),
            _ => None,
        }
    }
}

/// Device that moves mass from an upstream node to a downstream node.
///
/// Implementations are immutable once built; everything that depends on the
/// current state is returned in the frozen [`FlowLaw`].
pub trait FlowDevice: Send + Sync + std::fmt::Debug {
    /// Device name (for logging and error reports).
    fn name(&self) -> &str;

    /// Freeze the flow law from the states at the start of a step.
    fn freeze(&self, t_s: f64, ports: PortStates<'_>) -> ComponentResult<FlowLaw>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_law_has_no_flow() {
        assert_eq!(FlowLaw::Closed.mass_flow(0.1, 2e6, 1e5), 0.0);
        assert!(FlowLaw::Closed.conductance().is_none());
    }

    #[test]
    fn conductance_law_never_reverses() {
        let law = FlowLaw::Conductance(Conductance::new(1e-6).unwrap());
        assert!((law.mass_flow(0.0, 2e6, 1e6) - 1.0).abs() < 1e-12);
        assert_eq!(law.mass_flow(0.0, 1e6, 2e6), 0.0);
    }
}
