//! Ideal-gas mixture provider backed by NASA-7 fits and a global mechanism.

use crate::composition::Composition;
use crate::error::{ThermoError, ThermoResult};
use crate::kinetics::Mechanism;
use crate::model::{ThermoProvider, validation};
use crate::species::{Species, SpeciesArray};
use crate::state::{MixtureProperties, SpecEnergy, StateInput, ThermoState};
use cf_core::units::constants::R_UNIVERSAL;
use cf_core::units::{k, pa};

const MAX_NEWTON_ITERS: usize = 60;
const T_REL_TOL: f64 = 1e-12;

/// Ideal-gas mixture with temperature-dependent heat capacities.
#[derive(Debug, Clone)]
pub struct IdealGasMixture {
    mechanism: Mechanism,
    t_min_k: f64,
    t_max_k: f64,
}

impl Default for IdealGasMixture {
    fn default() -> Self {
        Self::new(Mechanism::ethane_global())
    }
}

impl IdealGasMixture {
    /// Lowest temperature accepted when inverting internal energy [K].
    pub const T_MIN_K: f64 = 150.0;
    /// Highest temperature accepted when inverting internal energy [K].
    pub const T_MAX_K: f64 = 6000.0;

    pub fn new(mechanism: Mechanism) -> Self {
        Self {
            mechanism,
            t_min_k: Self::T_MIN_K,
            t_max_k: Self::T_MAX_K,
        }
    }

    /// Mixture without chemistry.
    pub fn inert() -> Self {
        Self::new(Mechanism::inert())
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    /// Mass-specific cp and h of a mixture at temperature `t`.
    fn mixture_properties(comp: &Composition, t: f64) -> MixtureProperties {
        let mut cp = 0.0;
        let mut h = 0.0;
        for (s, y) in comp.iter() {
            let fit = s.nasa7();
            let r_s = R_UNIVERSAL / s.molar_mass();
            cp += y * fit.cp_r(t) * r_s;
            h += y * fit.h_rt(t) * r_s * t;
        }
        MixtureProperties { cp, h }
    }

    /// Specific internal energy and cv at temperature `t`.
    fn energy_and_cv(comp: &Composition, t: f64) -> (SpecEnergy, f64) {
        let props = Self::mixture_properties(comp, t);
        let r_mix = R_UNIVERSAL / comp.molar_mass();
        (props.h - r_mix * t, props.cp - r_mix)
    }

    /// Invert u(T) for a fixed composition.
    ///
    /// Newton iteration from the hint, kept inside a shrinking bracket so a
    /// poor step falls back to bisection. u(T) is monotonic for an ideal gas.
    fn solve_temperature(
        &self,
        comp: &Composition,
        u_target: SpecEnergy,
        t_hint: Option<f64>,
    ) -> ThermoResult<f64> {
        let (u_lo, _) = Self::energy_and_cv(comp, self.t_min_k);
        let (u_hi, _) = Self::energy_and_cv(comp, self.t_max_k);
        if u_target < u_lo || u_target > u_hi {
            return Err(ThermoError::ConvergenceFailed {
                what: "temperature from internal energy",
                detail: format!(
                    "u = {u_target:.6e} J/kg outside [{u_lo:.6e}, {u_hi:.6e}] for T in [{}, {}] K",
                    self.t_min_k, self.t_max_k
                ),
            });
        }

        let mut lo = self.t_min_k;
        let mut hi = self.t_max_k;
        let mut t = t_hint
            .filter(|t| t.is_finite())
            .unwrap_or(300.0)
            .clamp(lo, hi);

        for _ in 0..MAX_NEWTON_ITERS {
            let (u, cv) = Self::energy_and_cv(comp, t);
            let residual = u - u_target;
            if residual > 0.0 {
                hi = t;
            } else {
                lo = t;
            }

            let mut t_next = t - residual / cv;
            if !(t_next > lo && t_next < hi) {
                t_next = 0.5 * (lo + hi);
            }
            if (t_next - t).abs() <= T_REL_TOL * t_next {
                return Ok(t_next);
            }
            t = t_next;
        }

        Err(ThermoError::ConvergenceFailed {
            what: "temperature from internal energy",
            detail: format!(
                "no convergence after {MAX_NEWTON_ITERS} iterations (u = {u_target:.6e} J/kg, last T = {t:.3} K)"
            ),
        })
    }

    fn state_from_tp(&self, t: f64, p: f64, comp: &Composition) -> ThermoResult<ThermoState> {
        let props = Self::mixture_properties(comp, t);
        ThermoState::from_parts(pa(p), k(t), comp.clone(), props)
    }

    fn state_from_uv(
        &self,
        internal_energy_j: f64,
        volume_m3: f64,
        masses: &SpeciesArray,
        t_hint: Option<f64>,
    ) -> ThermoResult<ThermoState> {
        validation::validate_volume(volume_m3)?;
        if !internal_energy_j.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "internal energy must be finite",
            });
        }
        let mass: f64 = masses.iter().sum();
        if !mass.is_finite() || mass <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "total mass must be positive and finite",
            });
        }

        let comp = Composition::from_species_masses(masses)?;
        let t = self.solve_temperature(&comp, internal_energy_j / mass, t_hint)?;
        let rho = mass / volume_m3;
        let p = rho * R_UNIVERSAL / comp.molar_mass() * t;
        self.state_from_tp(t, p, &comp)
    }
}

impl ThermoProvider for IdealGasMixture {
    fn name(&self) -> &str {
        "ideal-gas NASA-7"
    }

    fn state(&self, input: StateInput<'_>) -> ThermoResult<ThermoState> {
        match input {
            StateInput::TP { t, p, comp } => {
                validation::validate_temperature(t)?;
                validation::validate_pressure(p)?;
                self.state_from_tp(t.value, p.value, comp)
            }
            StateInput::UV {
                internal_energy_j,
                volume_m3,
                species_masses_kg,
                t_hint_k,
            } => self.state_from_uv(internal_energy_j, volume_m3, species_masses_kg, t_hint_k),
        }
    }

    fn kinetics_source(&self, state: &ThermoState, volume_m3: f64) -> ThermoResult<SpeciesArray> {
        validation::validate_volume(volume_m3)?;
        let mut source = [0.0; Species::COUNT];
        if self.mechanism.is_empty() {
            return Ok(source);
        }

        let rho = state.density().value;
        let y = state.composition().mass_fractions();
        let mut conc = [0.0; Species::COUNT];
        for s in Species::ALL {
            // kg/kmol -> kg/mol
            conc[s.index()] = rho * y[s.index()] / (s.molar_mass() * 1e-3);
        }

        let wdot = self.mechanism.production_rates(state.temperature().value, &conc);
        for s in Species::ALL {
            let v = volume_m3 * wdot[s.index()] * s.molar_mass() * 1e-3;
            if !v.is_finite() {
                return Err(ThermoError::NonPhysical {
                    what: "non-finite species source term",
                });
            }
            source[s.index()] = v;
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{atm, k};

    fn tp(provider: &IdealGasMixture, t: f64, p: f64, comp: &Composition) -> ThermoState {
        provider
            .state(StateInput::TP {
                t: k(t),
                p: pa(p),
                comp,
            })
            .unwrap()
    }

    #[test]
    fn oxygen_at_room_temperature() {
        let provider = IdealGasMixture::default();
        let comp = Composition::pure(Species::O2);
        let state = provider
            .state(StateInput::TP {
                t: k(300.0),
                p: atm(1.0),
                comp: &comp,
            })
            .unwrap();
        assert!((state.gamma() - 1.394).abs() < 2e-3);
        assert!((state.density().value - 1.2999).abs() < 1e-3);
        assert!(state.h().abs() < 2e3);
    }

    #[test]
    fn uv_inverts_tp() {
        let provider = IdealGasMixture::default();
        let comp =
            Composition::new_mole_fractions(vec![(Species::C2H6, 1.0), (Species::O2, 1.0)])
                .unwrap();
        let volume = 5e-4;
        for t in [300.0, 750.0, 1800.0, 3200.0] {
            let reference = tp(&provider, t, 2.4e6, &comp);
            let mass = reference.density().value * volume;
            let mut masses = [0.0; Species::COUNT];
            for (s, y) in comp.iter() {
                masses[s.index()] = y * mass;
            }
            let state = provider
                .state(StateInput::UV {
                    internal_energy_j: reference.u() * mass,
                    volume_m3: volume,
                    species_masses_kg: &masses,
                    t_hint_k: Some(1000.0),
                })
                .unwrap();
            assert!((state.temperature().value - t).abs() < 1e-7 * t);
            assert!((state.pressure().value - 2.4e6).abs() < 1e-6 * 2.4e6);
        }
    }

    #[test]
    fn energy_outside_table_fails_to_converge() {
        let provider = IdealGasMixture::default();
        let mut masses = [0.0; Species::COUNT];
        masses[Species::O2.index()] = 1e-3;
        let err = provider
            .state(StateInput::UV {
                internal_energy_j: -1e6,
                volume_m3: 5e-4,
                species_masses_kg: &masses,
                t_hint_k: None,
            })
            .unwrap_err();
        assert!(matches!(err, ThermoError::ConvergenceFailed { .. }));
    }

    #[test]
    fn empty_inventory_is_non_physical() {
        let provider = IdealGasMixture::default();
        let err = provider
            .state(StateInput::UV {
                internal_energy_j: 0.0,
                volume_m3: 5e-4,
                species_masses_kg: &[0.0; Species::COUNT],
                t_hint_k: None,
            })
            .unwrap_err();
        assert!(matches!(err, ThermoError::NonPhysical { .. }));
    }

    #[test]
    fn inert_provider_has_no_source() {
        let provider = IdealGasMixture::inert();
        let comp =
            Composition::new_mole_fractions(vec![(Species::C2H6, 1.0), (Species::O2, 3.5)])
                .unwrap();
        let state = tp(&provider, 2500.0, 3e6, &comp);
        let source = provider.kinetics_source(&state, 5e-4).unwrap();
        assert!(source.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn hot_mixture_consumes_fuel_and_conserves_mass() {
        let provider = IdealGasMixture::default();
        let comp =
            Composition::new_mole_fractions(vec![(Species::C2H6, 1.0), (Species::O2, 3.5)])
                .unwrap();
        let state = tp(&provider, 1800.0, 2.5e6, &comp);
        let source = provider.kinetics_source(&state, 5e-4).unwrap();
        assert!(source[Species::C2H6.index()] < 0.0);
        assert!(source[Species::H2O.index()] > 0.0);
        let net: f64 = source.iter().sum();
        let scale: f64 = source.iter().map(|v| v.abs()).sum();
        assert!(net.abs() <= 1e-12 * scale);
    }
}
