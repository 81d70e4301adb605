//! Provider-level checks across modules.

use cf_core::units::{atm, k};
use cf_thermo::{
    Composition, IdealGasMixture, Species, SpeciesArray, StateInput, ThermoProvider, ThermoState,
};

const VOLUME: f64 = 5e-4;

fn inventory(state: &ThermoState) -> (f64, SpeciesArray) {
    let mass = state.density().value * VOLUME;
    let mut masses = [0.0; Species::COUNT];
    for (s, y) in state.composition().iter() {
        masses[s.index()] = y * mass;
    }
    (mass, masses)
}

#[test]
fn constant_volume_combustion_releases_heat() {
    let provider = IdealGasMixture::default();
    let reactants = Composition::parse_mole_fractions("C2H6:1, O2:3.5, N2:20").unwrap();
    let initial = provider
        .state(StateInput::TP {
            t: k(750.0),
            p: atm(20.0),
            comp: &reactants,
        })
        .unwrap();
    let (mass, before) = inventory(&initial);
    let energy = initial.u() * mass;

    // Complete conversion: C2H6 + 3.5 O2 -> 2 CO2 + 3 H2O, same mass and U.
    let mol = |s: Species| before[s.index()] / s.molar_mass();
    let fuel = mol(Species::C2H6);
    let mut after = [0.0; Species::COUNT];
    after[Species::CO2.index()] = 2.0 * fuel * Species::CO2.molar_mass();
    after[Species::H2O.index()] = 3.0 * fuel * Species::H2O.molar_mass();
    after[Species::N2.index()] = before[Species::N2.index()];
    let total_after: f64 = after.iter().sum();
    assert!((total_after - mass).abs() < 1e-12 * mass);

    let burnt = provider
        .state(StateInput::UV {
            internal_energy_j: energy,
            volume_m3: VOLUME,
            species_masses_kg: &after,
            t_hint_k: Some(initial.temperature().value),
        })
        .unwrap();

    let t = burnt.temperature().value;
    assert!(t > 2000.0 && t < 3500.0, "T_burnt = {t}");
    assert!(burnt.pressure().value > 2.5 * initial.pressure().value);
    assert!(burnt.gamma() < initial.gamma());
}

#[test]
fn heat_capacity_ratio_of_feed_gases() {
    let provider = IdealGasMixture::default();
    for (species, k_expected) in [(Species::C2H6, 1.087), (Species::O2, 1.331)] {
        let comp = Composition::pure(species);
        let state = provider
            .state(StateInput::TP {
                t: k(750.0),
                p: atm(30.0),
                comp: &comp,
            })
            .unwrap();
        assert!(
            (state.gamma() - k_expected).abs() < 5e-3,
            "{species}: k = {}",
            state.gamma()
        );
    }
}

#[test]
fn specific_enthalpy_matches_state() {
    let provider = IdealGasMixture::default();
    let comp = Composition::pure(Species::H);
    let state = provider
        .state(StateInput::TP {
            t: k(300.0),
            p: atm(1.0),
            comp: &comp,
        })
        .unwrap();
    // About 218 kJ/mol of formation enthalpy on a 1 g/mol radical.
    let h = provider.specific_enthalpy(&state);
    assert_eq!(h, state.h());
    assert!((h - 2.163e8).abs() < 1e6);
}
