//! Global reaction mechanism.
//!
//! Irreversible mass-action rates with empirical reaction orders, evaluated in
//! SI molar units (mol, m³, s). Concentrations are clamped at zero before the
//! orders are applied so round-off negatives never produce NaN.

use crate::error::{ThermoError, ThermoResult};
use crate::species::{Species, SpeciesArray};

/// Modified Arrhenius rate constant `k = A · T^b · exp(-Ta / T)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrhenius {
    pub a: f64,
    pub b: f64,
    /// Activation temperature Ea/R [K].
    pub ta: f64,
}

impl Arrhenius {
    pub fn rate_constant(&self, t: f64) -> f64 {
        let mut k = self.a * (-self.ta / t).exp();
        if self.b != 0.0 {
            k *= t.powf(self.b);
        }
        k
    }
}

/// One irreversible global reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub equation: &'static str,
    /// Net stoichiometric coefficients, negative for reactants.
    pub stoich: Vec<(Species, f64)>,
    /// Concentration exponents of the rate law.
    pub orders: Vec<(Species, f64)>,
    pub rate: Arrhenius,
    /// Multiply the rate by the total concentration (collision partner M).
    pub third_body: bool,
}

impl Reaction {
    /// Rate of progress [mol/(m³·s)] for concentrations in mol/m³.
    pub fn rate_of_progress(&self, t: f64, conc: &SpeciesArray) -> f64 {
        let mut q = self.rate.rate_constant(t);
        for &(s, order) in &self.orders {
            let c = conc[s.index()].max(0.0);
            q *= if order == 1.0 { c } else { c.powf(order) };
        }
        if self.third_body {
            q *= conc.iter().map(|c| c.max(0.0)).sum::<f64>();
        }
        q
    }

    /// Element imbalance `[C, H, O, N]` of the stoichiometry.
    fn element_imbalance(&self) -> [f64; 4] {
        let mut net = [0.0; 4];
        for &(s, nu) in &self.stoich {
            for (acc, n) in net.iter_mut().zip(s.atoms().as_array()) {
                *acc += nu * n;
            }
        }
        net
    }
}

/// Set of global reactions acting on the bundled species.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mechanism {
    reactions: Vec<Reaction>,
}

impl Mechanism {
    /// Build a mechanism, checking that every reaction conserves elements and
    /// has finite, non-negative rate parameters.
    pub fn new(reactions: Vec<Reaction>) -> ThermoResult<Self> {
        for r in &reactions {
            if r.element_imbalance().iter().any(|v| v.abs() > 1e-12) {
                return Err(ThermoError::InvalidArg {
                    what: "reaction does not conserve elements",
                });
            }
            if !(r.rate.a.is_finite() && r.rate.a >= 0.0 && r.rate.ta.is_finite()) {
                return Err(ThermoError::InvalidArg {
                    what: "rate parameters must be finite and non-negative",
                });
            }
            if r.orders.iter().any(|(_, o)| !o.is_finite() || *o < 0.0) {
                return Err(ThermoError::InvalidArg {
                    what: "reaction orders must be finite and non-negative",
                });
            }
        }
        Ok(Self { reactions })
    }

    /// No reactions: pure mixing.
    pub fn inert() -> Self {
        Self::default()
    }

    /// Global ethane/oxygen mechanism with a hydrogen-radical ignition path.
    ///
    /// - Westbrook–Dryer single-step fuel oxidation to CO and H2O
    /// - fuel oxidation assisted by H radicals (low activation temperature)
    /// - H + H + M recombination
    /// - CO burnout (H2O assisted) and H2 burnout
    pub fn ethane_global() -> Self {
        use Species::*;
        Self {
            reactions: vec![
                Reaction {
                    equation: "C2H6 + 2.5 O2 => 2 CO + 3 H2O",
                    stoich: vec![(C2H6, -1.0), (O2, -2.5), (CO, 2.0), (H2O, 3.0)],
                    orders: vec![(C2H6, 0.1), (O2, 1.65)],
                    rate: Arrhenius {
                        a: 1.957e5,
                        b: 0.0,
                        ta: 15_098.0,
                    },
                    third_body: false,
                },
                Reaction {
                    equation: "C2H6 + 2.5 O2 + H => 2 CO + 3 H2O + H",
                    stoich: vec![(C2H6, -1.0), (O2, -2.5), (CO, 2.0), (H2O, 3.0)],
                    orders: vec![(C2H6, 1.0), (O2, 1.0), (H, 1.0)],
                    rate: Arrhenius {
                        a: 5.0e3,
                        b: 0.0,
                        ta: 6_000.0,
                    },
                    third_body: false,
                },
                Reaction {
                    equation: "H + H + M => H2 + M",
                    stoich: vec![(H, -2.0), (H2, 1.0)],
                    orders: vec![(H, 2.0)],
                    rate: Arrhenius {
                        a: 1.0e6,
                        b: -1.0,
                        ta: 0.0,
                    },
                    third_body: true,
                },
                Reaction {
                    equation: "CO + 0.5 O2 => CO2",
                    stoich: vec![(CO, -1.0), (O2, -0.5), (CO2, 1.0)],
                    orders: vec![(CO, 1.0), (H2O, 0.5), (O2, 0.25)],
                    rate: Arrhenius {
                        a: 1.259e10,
                        b: 0.0,
                        ta: 20_130.0,
                    },
                    third_body: false,
                },
                Reaction {
                    equation: "H2 + 0.5 O2 => H2O",
                    stoich: vec![(H2, -1.0), (O2, -0.5), (H2O, 1.0)],
                    orders: vec![(H2, 1.0), (O2, 0.5)],
                    rate: Arrhenius {
                        a: 1.8e10,
                        b: 0.0,
                        ta: 17_614.0,
                    },
                    third_body: false,
                },
            ],
        }
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Net molar production rates [mol/(m³·s)] per species.
    pub fn production_rates(&self, t: f64, conc: &SpeciesArray) -> SpeciesArray {
        let mut wdot = [0.0; Species::COUNT];
        for r in &self.reactions {
            let q = r.rate_of_progress(t, conc);
            if q == 0.0 {
                continue;
            }
            for &(s, nu) in &r.stoich {
                wdot[s.index()] += nu * q;
            }
        }
        wdot
    }
}
