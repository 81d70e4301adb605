//! A chamber with every device closed must not move.

use cf_sim::{ChamberScenario, ValveAreas};
use cf_thermo::{IdealGasMixture, Species};

fn sealed_scenario() -> ChamberScenario {
    ChamberScenario {
        valves: ValveAreas {
            fuel_m2: 0.0,
            oxidizer_m2: 0.0,
            outlet_m2: 0.0,
        },
        pulse: None,
        horizon_s: 0.01,
        ..ChamberScenario::default()
    }
}

#[test]
fn sealed_chamber_keeps_its_state() {
    let scenario = sealed_scenario();
    let net = scenario
        .build(Box::new(IdealGasMixture::default()))
        .expect("scenario should build");
    let traj = net.run(&scenario.sim_options()).expect("run should succeed");

    let initial = &traj.initial;
    let p0 = initial.state.pressure().value;
    let t0 = initial.state.temperature().value;
    let m0 = initial.mass_kg;

    assert!(!traj.is_empty());
    assert_eq!(traj.last().t_s, 0.01);

    for sample in &traj.samples {
        let p = sample.state.pressure().value;
        let t = sample.state.temperature().value;
        assert!((p - p0).abs() <= 1e-9 * p0, "P drifted to {p} at {}", sample.t_s);
        assert!((t - t0).abs() <= 1e-9 * t0, "T drifted to {t} at {}", sample.t_s);
        assert!((sample.mass_kg - m0).abs() <= 1e-15, "mass drifted at {}", sample.t_s);
        assert!((sample.mass_fraction(Species::O2) - 1.0).abs() < 1e-12);

        assert_eq!(sample.devices.len(), 3);
        for device in &sample.devices {
            assert_eq!(device.conductance, None, "{} has a conductance", device.name);
            assert!(!device.blocked);
            assert_eq!(device.mdot_start_kg_s, 0.0);
            assert_eq!(device.delivered_kg, 0.0);
        }
    }
}

#[test]
fn sealed_chamber_keeps_exhaust_velocity() {
    let scenario = sealed_scenario();
    let net = scenario
        .build(Box::new(IdealGasMixture::default()))
        .expect("scenario should build");
    let traj = net.run(&scenario.sim_options()).expect("run should succeed");

    let v0 = traj
        .initial
        .exhaust_velocity_m_s
        .expect("1.1 atm chamber expands to 1 atm");
    for sample in &traj.samples {
        let v = sample.exhaust_velocity_m_s.expect("velocity defined");
        assert!((v - v0).abs() <= 1e-6 * v0);
    }
}

#[test]
fn chamber_below_exit_pressure_has_no_velocity() {
    let mut scenario = sealed_scenario();
    scenario.chamber.fill.pressure_atm = 0.8;
    let net = scenario
        .build(Box::new(IdealGasMixture::default()))
        .expect("scenario should build");
    let traj = net.run(&scenario.sim_options()).expect("run should continue");

    assert!(traj.iter().all(|s| s.exhaust_velocity_m_s.is_none()));
    assert!(traj.last().monitor_line().ends_with("n/a"));
}
