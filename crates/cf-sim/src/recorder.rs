//! Trajectory samples and their accumulation.

use cf_core::DeviceId;
use cf_core::units::constants::ZERO_CELSIUS_K;
use cf_thermo::{Species, ThermoState};

/// What one flow device did during the step that ended at a sample.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub name: String,
    /// Conductance [kg/(s·Pa)] frozen for the step, `None` for devices that
    /// are not pressure driven.
    pub conductance: Option<f64>,
    /// Set when the valve was closed for the step because its conductance was
    /// singular.
    pub blocked: bool,
    /// Mass flow at the start of the step [kg/s].
    pub mdot_start_kg_s: f64,
    /// Mass delivered since t = 0 [kg].
    pub delivered_kg: f64,
}

/// Chamber state after one accepted integrator step.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    pub t_s: f64,
    pub state: ThermoState,
    pub mass_kg: f64,
    /// Isentropic exhaust velocity [m/s]; `None` while the chamber pressure is
    /// below the exit pressure.
    pub exhaust_velocity_m_s: Option<f64>,
    /// Per-device records in attachment order (empty for the initial sample).
    pub devices: Vec<DeviceRecord>,
}

impl TrajectorySample {
    /// Progress line: time [s], pressure [MPa], temperature [°C], mass [g],
    /// exhaust velocity [m/s] (`n/a` when undefined).
    pub fn monitor_line(&self) -> String {
        let velocity = match self.exhaust_velocity_m_s {
            Some(v) => format!("{v:.3}"),
            None => "n/a".to_string(),
        };
        format!(
            "{:.5} {:.3} {:.3} {:.3} {}",
            self.t_s,
            self.state.pressure().value / 1e6,
            self.state.temperature().value - ZERO_CELSIUS_K,
            self.mass_kg * 1e3,
            velocity
        )
    }

    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.state.composition().mass_fraction(species)
    }

    pub fn device(&self, name: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|d| d.name == name)
    }
}

/// Ordered, non-uniformly spaced samples of one run.
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub initial: TrajectorySample,
    pub samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// Initial sample followed by one sample per accepted step.
    pub fn iter(&self) -> impl Iterator<Item = &TrajectorySample> {
        std::iter::once(&self.initial).chain(self.samples.iter())
    }

    pub fn last(&self) -> &TrajectorySample {
        self.samples.last().unwrap_or(&self.initial)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.iter().map(|s| s.t_s).collect()
    }

    pub fn peak_pressure_pa(&self) -> f64 {
        self.iter()
            .map(|s| s.state.pressure().value)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn peak_temperature_k(&self) -> f64 {
        self.iter()
            .map(|s| s.state.temperature().value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Accumulates samples while a run progresses.
#[derive(Clone, Debug)]
pub struct TrajectoryRecorder {
    initial: TrajectorySample,
    samples: Vec<TrajectorySample>,
}

impl TrajectoryRecorder {
    pub fn new(initial: TrajectorySample) -> Self {
        Self {
            initial,
            samples: Vec::new(),
        }
    }

    pub fn record(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    /// Most recent sample (the initial one before the first step).
    pub fn latest(&self) -> &TrajectorySample {
        self.samples.last().unwrap_or(&self.initial)
    }

    pub fn finish(self) -> Trajectory {
        Trajectory {
            initial: self.initial,
            samples: self.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{atm, k};
    use cf_thermo::{Composition, IdealGasMixture, StateInput, ThermoProvider};

    fn sample(t_s: f64, t_k: f64, velocity: Option<f64>) -> TrajectorySample {
        let state = IdealGasMixture::default()
            .state(StateInput::TP {
                t: k(t_k),
                p: atm(10.0),
                comp: &Composition::pure(Species::N2),
            })
            .unwrap();
        TrajectorySample {
            t_s,
            state,
            mass_kg: 2.5e-3,
            exhaust_velocity_m_s: velocity,
            devices: Vec::new(),
        }
    }

    #[test]
    fn monitor_line_format() {
        let line = sample(0.0123456, 500.0, Some(812.34567)).monitor_line();
        assert_eq!(line, "0.01235 1.013 226.850 2.500 812.346");
    }

    #[test]
    fn monitor_line_without_velocity() {
        let line = sample(0.0, 300.0, None).monitor_line();
        assert!(line.ends_with(" n/a"), "{line}");
    }

    #[test]
    fn recorder_keeps_order_and_initial() {
        let mut recorder = TrajectoryRecorder::new(sample(0.0, 300.0, None));
        assert_eq!(recorder.latest().t_s, 0.0);
        recorder.record(sample(1e-3, 900.0, Some(100.0)));
        recorder.record(sample(2e-3, 600.0, Some(90.0)));
        assert_eq!(recorder.latest().t_s, 2e-3);

        let traj = recorder.finish();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.times(), vec![0.0, 1e-3, 2e-3]);
        assert_eq!(traj.last().t_s, 2e-3);
        assert!((traj.peak_temperature_k() - 900.0).abs() < 1e-9);
    }
}
