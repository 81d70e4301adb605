//! Integration tests for cf-components with the bundled ideal-gas provider.

use cf_components::{
    ChokedValve, ComponentError, FlowDevice, FlowLaw, PortStates, PulseShape,
    PulsedMassFlowController, Reservoir, exhaust_velocity,
};
use cf_core::units::{atm, k, m2};
use cf_thermo::{Composition, IdealGasMixture, Species, StateInput, ThermoProvider};

fn reservoir(name: &str, species: Species, t: f64, p_atm: f64) -> Reservoir {
    let provider = IdealGasMixture::default();
    Reservoir::new(name, &provider, k(t), atm(p_atm), &Composition::pure(species)).unwrap()
}

#[test]
fn feed_valves_at_reference_conditions() {
    let fuel = reservoir("fuel", Species::C2H6, 750.0, 30.0);
    let ox = reservoir("oxidizer", Species::O2, 750.0, 30.0);
    let chamber = reservoir("chamber", Species::O2, 300.0, 1.1);

    let fuel_valve = ChokedValve::new("fuel valve", m2(4e-4)).unwrap();
    let ox_valve = ChokedValve::new("oxidizer valve", m2(4e-4)).unwrap();

    let m_fuel = fuel_valve
        .conductance_flow(fuel.state(), chamber.pressure())
        .unwrap()
        .value;
    let m_ox = ox_valve
        .conductance_flow(ox.state(), chamber.pressure())
        .unwrap()
        .value;

    // Ethane's low k passes less mass than oxygen at the same area.
    assert!((m_fuel - 1.670).abs() < 0.02, "fuel mdot = {m_fuel}");
    assert!((m_ox - 1.854).abs() < 0.02, "oxidizer mdot = {m_ox}");
    assert!(m_fuel < m_ox);
}

#[test]
fn frozen_law_applies_conductance_to_later_pressures() {
    let ox = reservoir("oxidizer", Species::O2, 750.0, 30.0);
    let chamber = reservoir("chamber", Species::O2, 750.0, 20.0);
    let valve = ChokedValve::new("oxidizer valve", m2(4e-4)).unwrap();

    let law = valve
        .freeze(
            0.0,
            PortStates {
                upstream: ox.state(),
                downstream: chamber.state(),
            },
        )
        .unwrap();
    let choked = valve.choked_mass_flow(ox.state()).unwrap().value;

    let p_up = ox.pressure().value;
    let p_start = chamber.pressure().value;
    assert!((law.mass_flow(0.0, p_up, p_start) - choked).abs() < 1e-12 * choked);

    // Chamber pressure halfway to the reservoir halves the flow.
    let p_mid = 0.5 * (p_up + p_start);
    assert!((law.mass_flow(1e-4, p_up, p_mid) - 0.5 * choked).abs() < 1e-9 * choked);
    assert_eq!(law.mass_flow(1e-4, p_up, p_up * 1.01), 0.0);
}

#[test]
fn singular_valve_reports_device() {
    let ox = reservoir("oxidizer", Species::O2, 750.0, 30.0);
    let valve = ChokedValve::new("oxidizer valve", m2(4e-4)).unwrap();
    let ports = PortStates {
        upstream: ox.state(),
        downstream: ox.state(),
    };
    match valve.freeze(0.0, ports) {
        Err(ComponentError::SingularConductance { device, .. }) => {
            assert_eq!(device, "oxidizer valve");
        }
        other => panic!("expected singular conductance, got {other:?}"),
    }
}

#[test]
fn igniter_law_ignores_pressures() {
    let h = reservoir("igniter", Species::H, 300.0, 1.0);
    let chamber = reservoir("chamber", Species::O2, 750.0, 24.0);
    let igniter =
        PulsedMassFlowController::new("igniter", PulseShape::new(0.01, 0.05, 0.008).unwrap());
    let law = igniter
        .freeze(
            0.049,
            PortStates {
                upstream: h.state(),
                downstream: chamber.state(),
            },
        )
        .unwrap();
    assert!(matches!(law, FlowLaw::Pulse(_)));
    // Reservoir below chamber pressure still injects.
    assert_eq!(law.mass_flow(0.05, 1e5, 2.4e6), 0.01);
}

#[test]
fn exhaust_velocity_of_hot_products() {
    let provider = IdealGasMixture::default();
    let products = Composition::parse_mole_fractions("CO2:2, H2O:3, CO:0.5").unwrap();
    let chamber = provider
        .state(StateInput::TP {
            t: k(2700.0),
            p: atm(30.0),
            comp: &products,
        })
        .unwrap();
    let v = exhaust_velocity(&chamber, atm(1.0)).unwrap().value;
    assert!(v > 1500.0 && v < 3500.0, "v = {v}");

    let cold = reservoir("ambient", Species::N2, 300.0, 0.9);
    let err = exhaust_velocity(cold.state(), atm(1.0)).unwrap_err();
    assert!(matches!(err, ComponentError::UndefinedExpansion { .. }));
}
