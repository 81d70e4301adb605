//! Infinite-capacity reservoir.

use crate::error::ComponentResult;
use cf_core::units::{Pressure, Temperature};
use cf_thermo::{Composition, StateInput, ThermoProvider, ThermoState};

/// Fixed-state source or sink.
///
/// Each reservoir derives its own state from the provider at construction;
/// nothing mutable is shared between reservoirs.
#[derive(Debug, Clone)]
pub struct Reservoir {
    name: String,
    state: ThermoState,
}

impl Reservoir {
    pub fn new(
        name: impl Into<String>,
        provider: &dyn ThermoProvider,
        t: Temperature,
        p: Pressure,
        comp: &Composition,
    ) -> ComponentResult<Self> {
        let state = provider.state(StateInput::TP { t, p, comp })?;
        Ok(Self::from_state(name, state))
    }

    pub fn from_state(name: impl Into<String>, state: ThermoState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &ThermoState {
        &self.state
    }

    pub fn pressure(&self) -> Pressure {
        self.state.pressure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComponentError;
    use cf_core::units::{atm, k};
    use cf_thermo::{IdealGasMixture, Species};

    #[test]
    fn reservoirs_are_independent() {
        let provider = IdealGasMixture::default();
        let fuel = Reservoir::new(
            "fuel",
            &provider,
            k(750.0),
            atm(30.0),
            &Composition::pure(Species::C2H6),
        )
        .unwrap();
        let ox = Reservoir::new(
            "oxidizer",
            &provider,
            k(750.0),
            atm(30.0),
            &Composition::pure(Species::O2),
        )
        .unwrap();

        assert_eq!(fuel.state().composition().is_pure(), Some(Species::C2H6));
        assert_eq!(ox.state().composition().is_pure(), Some(Species::O2));
        assert_eq!(fuel.pressure(), ox.pressure());
        assert!(fuel.state().molar_mass() < ox.state().molar_mass());
    }

    #[test]
    fn invalid_state_is_reported() {
        let provider = IdealGasMixture::default();
        let err = Reservoir::new(
            "bad",
            &provider,
            k(-1.0),
            atm(1.0),
            &Composition::pure(Species::O2),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentError::Thermo(_)));
    }
}
