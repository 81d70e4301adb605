//! Pulsed mass-flow controller (igniter).

use crate::common::{check_finite, check_non_negative};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FlowDevice, FlowLaw, PortStates};
use cf_core::units::{Mass, MassRate, Time, kg, kgps};
use std::f64::consts::{LN_2, PI};

/// Gaussian pulse `amplitude · exp(-(t - t0)² · 4 ln2 / fwhm²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseShape {
    pub amplitude_kg_s: f64,
    pub t_peak_s: f64,
    pub fwhm_s: f64,
}

impl PulseShape {
    pub fn new(amplitude_kg_s: f64, t_peak_s: f64, fwhm_s: f64) -> ComponentResult<Self> {
        check_non_negative(amplitude_kg_s, "pulse amplitude")?;
        check_finite(t_peak_s, "pulse peak time")?;
        check_finite(fwhm_s, "pulse width")?;
        if fwhm_s <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "pulse width must be positive",
            });
        }
        Ok(Self {
            amplitude_kg_s,
            t_peak_s,
            fwhm_s,
        })
    }

    /// Mass flow [kg/s] at time `t_s`.
    #[inline]
    pub fn rate(&self, t_s: f64) -> f64 {
        let dt = t_s - self.t_peak_s;
        self.amplitude_kg_s * (-dt * dt * 4.0 * LN_2 / (self.fwhm_s * self.fwhm_s)).exp()
    }

    /// Integral of the pulse over all time [kg].
    pub fn total_mass_kg(&self) -> f64 {
        self.amplitude_kg_s * self.fwhm_s * (PI / (4.0 * LN_2)).sqrt()
    }
}

/// Prescribed time-varying mass flow from a reservoir into the chamber.
///
/// Stateless: the same time always gives the same flow.
#[derive(Debug, Clone)]
pub struct PulsedMassFlowController {
    name: String,
    shape: PulseShape,
}

impl PulsedMassFlowController {
    pub fn new(name: impl Into<String>, shape: PulseShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn shape(&self) -> PulseShape {
        self.shape
    }

    pub fn mass_flow(&self, t: Time) -> MassRate {
        kgps(self.shape.rate(t.value))
    }

    pub fn total_mass(&self) -> Mass {
        kg(self.shape.total_mass_kg())
    }
}

impl FlowDevice for PulsedMassFlowController {
    fn name(&self) -> &str {
        &self.name
    }

    fn freeze(&self, _t_s: f64, _ports: PortStates<'_>) -> ComponentResult<FlowLaw> {
        Ok(FlowLaw::Pulse(self.shape))
    }
}
