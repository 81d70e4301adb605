//! The igniter delivers the closed-form integral of its Gaussian pulse.

use cf_components::PulseShape;
use cf_sim::scenario::IGNITER;
use cf_sim::{ChamberScenario, GasSpec, SimOptions, ValveAreas};
use cf_thermo::IdealGasMixture;

fn pulse_only() -> ChamberScenario {
    let mut scenario = ChamberScenario {
        valves: ValveAreas {
            fuel_m2: 0.0,
            oxidizer_m2: 0.0,
            outlet_m2: 0.0,
        },
        igniter: GasSpec::new(300.0, 1.0, "N2:1.0"),
        ..ChamberScenario::default()
    };
    scenario.chamber.fill.composition = "N2:1.0".into();
    scenario
}

#[test]
fn delivered_mass_matches_pulse_integral() {
    let scenario = pulse_only();
    let pulse = scenario.pulse.clone().expect("reference pulse");
    let shape = PulseShape::new(pulse.amplitude_kg_s, pulse.t_peak_s, pulse.fwhm_s).unwrap();

    let net = scenario
        .build(Box::new(IdealGasMixture::default()))
        .expect("scenario should build");
    let opts = SimOptions {
        rtol: 1e-6,
        ..scenario.sim_options()
    };
    let traj = net.run(&opts).expect("run should succeed");

    let last = traj.last();
    let delivered = last.device(IGNITER).expect("igniter record").delivered_kg;
    let expected = shape.total_mass_kg();
    assert!(
        (delivered - expected).abs() <= 1e-4 * expected,
        "delivered {delivered} vs {expected}"
    );

    let gained = last.mass_kg - traj.initial.mass_kg;
    assert!((gained - delivered).abs() <= 1e-9 * last.mass_kg);
}

#[test]
fn igniter_flow_is_sampled_at_step_start() {
    let scenario = ChamberScenario {
        horizon_s: 0.06,
        ..pulse_only()
    };
    let pulse = scenario.pulse.clone().expect("reference pulse");
    let shape = PulseShape::new(pulse.amplitude_kg_s, pulse.t_peak_s, pulse.fwhm_s).unwrap();

    let net = scenario
        .build(Box::new(IdealGasMixture::default()))
        .expect("scenario should build");
    let traj = net.run(&scenario.sim_options()).expect("run should succeed");

    let all: Vec<_> = traj.iter().collect();
    for pair in all.windows(2) {
        let record = pair[1].device(IGNITER).expect("igniter record");
        assert_eq!(record.conductance, None);
        assert_eq!(record.mdot_start_kg_s, shape.rate(pair[0].t_s));
    }
}
