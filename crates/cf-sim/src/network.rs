//! Reactor network: reservoirs and flow devices around one chamber.
//!
//! The network owns the thermochemical provider, the reactor and every
//! device. [`ChamberNetwork::advance`] integrates the chamber with this loop:
//!
//! 1. freeze each device's [`FlowLaw`] from the states at step start
//! 2. integrate the reactor (plus the mass each device has delivered) over
//!    one adaptive step
//! 3. derive the exhaust velocity from the post-step state
//! 4. record a [`TrajectorySample`]
//!
//! until the horizon is reached.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use crate::reactor::{Inflow, Reactor, ReactorSnapshot, ReactorState};
use crate::recorder::{DeviceRecord, Trajectory, TrajectoryRecorder, TrajectorySample};
use crate::sim::{SimOptions, run_sim_stats};
use cf_components::{
    ComponentError, FlowDevice, FlowLaw, PortStates, Reservoir, exhaust_velocity,
};
use cf_core::DeviceId;
use cf_core::units::{Pressure, atm};
use cf_thermo::{Species, ThermoError, ThermoProvider, ThermoState};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Absolute tolerance on species and delivered masses [kg].
const MASS_ATOL_KG: f64 = 1e-12;

/// Absolute tolerance on the reactor's internal energy [J].
const ENERGY_ATOL_J: f64 = 1e-3;

/// What to do when a valve's pressure differential is too small for a
/// conductance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularPolicy {
    /// Close the valve for the step and keep integrating.
    #[default]
    CloseValve,
    /// Stop with [`SimError::SingularConductance`].
    Abort,
}

#[derive(Clone, Copy, Debug)]
pub struct NetworkOptions {
    /// Pressure the exhaust gas expands to.
    pub p_exit: Pressure,
    pub singular_policy: SingularPolicy,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            p_exit: atm(1.0),
            singular_policy: SingularPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReservoirId(usize);

/// End point of a flow device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Chamber,
    Reservoir(ReservoirId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    IntoChamber,
    OutOfChamber,
}

#[derive(Debug)]
struct Connection {
    id: DeviceId,
    device: Box<dyn FlowDevice>,
    reservoir: ReservoirId,
    direction: Direction,
}

/// One reactor fed from and drained into reservoirs.
pub struct ChamberNetwork {
    provider: Box<dyn ThermoProvider>,
    reactor: Reactor,
    reservoirs: Vec<Reservoir>,
    connections: Vec<Connection>,
    options: NetworkOptions,
}

impl ChamberNetwork {
    pub fn new(provider: Box<dyn ThermoProvider>, reactor: Reactor) -> Self {
        Self {
            provider,
            reactor,
            reservoirs: Vec::new(),
            connections: Vec::new(),
            options: NetworkOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NetworkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }

    pub fn provider(&self) -> &dyn ThermoProvider {
        self.provider.as_ref()
    }

    pub fn reactor(&self) -> &Reactor {
        &self.reactor
    }

    pub fn add_reservoir(&mut self, reservoir: Reservoir) -> ReservoirId {
        self.reservoirs.push(reservoir);
        ReservoirId(self.reservoirs.len() - 1)
    }

    pub fn reservoir(&self, id: ReservoirId) -> Option<&Reservoir> {
        self.reservoirs.get(id.0)
    }

    /// Attach a device between the chamber and a reservoir.
    pub fn connect(
        &mut self,
        device: impl FlowDevice + 'static,
        from: Node,
        to: Node,
    ) -> SimResult<DeviceId> {
        let (reservoir, direction) = match (from, to) {
            (Node::Reservoir(r), Node::Chamber) => (r, Direction::IntoChamber),
            (Node::Chamber, Node::Reservoir(r)) => (r, Direction::OutOfChamber),
            _ => {
                return Err(SimError::InvalidArg {
                    what: "a device must connect the chamber with a reservoir",
                });
            }
        };
        if reservoir.0 >= self.reservoirs.len() {
            return Err(SimError::InvalidArg {
                what: "unknown reservoir",
            });
        }
        if self.connections.iter().any(|c| c.device.name() == device.name()) {
            return Err(SimError::InvalidArg {
                what: "device names must be unique",
            });
        }

        let id = u32::try_from(self.connections.len())
            .ok()
            .and_then(DeviceId::from_index)
            .ok_or(SimError::InvalidArg {
                what: "too many devices",
            })?;
        self.connections.push(Connection {
            id,
            device: Box::new(device),
            reservoir,
            direction,
        });
        Ok(id)
    }

    pub fn device_count(&self) -> usize {
        self.connections.len()
    }

    pub fn device_id(&self, name: &str) -> Option<DeviceId> {
        self.connections
            .iter()
            .find(|c| c.device.name() == name)
            .map(|c| c.id)
    }

    pub fn device_name(&self, id: DeviceId) -> Option<&str> {
        self.connections.get(id.index()).map(|c| c.device.name())
    }

    /// Integrate from the initial fill to `opts.t_end`, calling `monitor`
    /// with every sample as it is recorded.
    ///
    /// Fatal errors (failed steps, step-size underflow, the step limit and
    /// singular valves under [`SingularPolicy::Abort`]) carry the last
    /// accepted reactor state.
    pub fn advance<F>(&self, opts: &SimOptions, monitor: F) -> SimResult<Trajectory>
    where
        F: FnMut(&TrajectorySample),
    {
        let mut model = NetworkModel::new(self, monitor)?;

        info!(
            reactor = self.reactor.name(),
            provider = self.provider.name(),
            fill = %self.reactor.initial().composition(),
            devices = self.connections.len(),
            horizon_s = opts.t_end,
            "advancing chamber network"
        );

        match run_sim_stats(&mut model, opts) {
            Ok(stats) => {
                let trajectory = model.recorder.finish();
                let last = trajectory.last();
                info!(
                    steps = stats.steps,
                    retries = stats.retries,
                    p_final_pa = last.state.pressure().value,
                    t_final_k = last.state.temperature().value,
                    "chamber network reached horizon"
                );
                Ok(trajectory)
            }
            Err(e) => Err(e.with_last_valid(model.snapshot())),
        }
    }

    /// [`ChamberNetwork::advance`] without a monitor.
    pub fn run(&self, opts: &SimOptions) -> SimResult<Trajectory> {
        self.advance(opts, |_| {})
    }

    fn abs_tolerances(&self) -> DVector<f64> {
        let n = ReactorState::LEN + self.connections.len();
        let mut atol = DVector::from_element(n, MASS_ATOL_KG);
        atol[0] = ENERGY_ATOL_J;
        atol
    }

    fn exhaust_velocity(&self, t_s: f64, state: &ThermoState) -> SimResult<Option<f64>> {
        match exhaust_velocity(state, self.options.p_exit) {
            Ok(v) => Ok(Some(v.value)),
            Err(ComponentError::UndefinedExpansion {
                p_chamber_pa,
                p_exit_pa,
            }) => {
                debug!(t_s, p_chamber_pa, p_exit_pa, "exhaust velocity undefined");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Port states of a device for a given chamber state.
    fn ports<'a>(&'a self, conn: &Connection, chamber: &'a ThermoState) -> PortStates<'a> {
        let reservoir = self.reservoirs[conn.reservoir.0].state();
        match conn.direction {
            Direction::IntoChamber => PortStates {
                upstream: reservoir,
                downstream: chamber,
            },
            Direction::OutOfChamber => PortStates {
                upstream: chamber,
                downstream: reservoir,
            },
        }
    }
}

fn retryable(e: ThermoError) -> SimError {
    SimError::Retryable { fault: e.into() }
}

/// Integration view of a network for one run.
struct NetworkModel<'n, F> {
    net: &'n ChamberNetwork,
    monitor: F,
    recorder: TrajectoryRecorder,
    /// Chamber state at the last accepted step.
    accepted: ThermoState,
    /// Chamber state of the latest candidate that passed `check_state`.
    trial: Option<(f64, ThermoState)>,
    laws: Vec<FlowLaw>,
    records: Vec<DeviceRecord>,
    blocked: Vec<bool>,
    atol: DVector<f64>,
}

impl<'n, F> NetworkModel<'n, F>
where
    F: FnMut(&TrajectorySample),
{
    fn new(net: &'n ChamberNetwork, mut monitor: F) -> SimResult<Self> {
        let initial = net.reactor.initial().clone();
        let mass_kg = net.reactor.fill(&initial).mass_kg();
        let sample = TrajectorySample {
            t_s: 0.0,
            exhaust_velocity_m_s: net.exhaust_velocity(0.0, &initial)?,
            state: initial.clone(),
            mass_kg,
            devices: Vec::new(),
        };
        monitor(&sample);

        let n = net.connections.len();
        Ok(Self {
            net,
            monitor,
            recorder: TrajectoryRecorder::new(sample),
            accepted: initial,
            trial: None,
            laws: vec![FlowLaw::Closed; n],
            records: Vec::with_capacity(n),
            blocked: vec![false; n],
            atol: net.abs_tolerances(),
        })
    }

    fn snapshot(&self) -> ReactorSnapshot {
        let latest = self.recorder.latest();
        ReactorSnapshot {
            t_s: latest.t_s,
            state: latest.state.clone(),
            mass_kg: latest.mass_kg,
            internal_energy_j: latest.state.u() * latest.mass_kg,
        }
    }

    fn t_hint(&self) -> Option<f64> {
        Some(self.accepted.temperature().value)
    }

    fn freeze(&mut self, t: f64, k: usize) -> SimResult<FlowLaw> {
        let net = self.net;
        let conn = &net.connections[k];
        let ports = net.ports(conn, &self.accepted);

        match conn.device.freeze(t, ports) {
            Ok(law) => {
                if self.blocked[k] {
                    debug!(device = conn.device.name(), t, "valve reopened");
                    self.blocked[k] = false;
                }
                Ok(law)
            }
            Err(ComponentError::SingularConductance {
                device,
                p_up_pa,
                p_down_pa,
            }) => match net.options.singular_policy {
                SingularPolicy::Abort => Err(SimError::SingularConductance {
                    device,
                    t_s: t,
                    p_up_pa,
                    p_down_pa,
                    last_valid: Box::new(self.snapshot()),
                }),
                SingularPolicy::CloseValve => {
                    if !self.blocked[k] {
                        warn!(
                            device = %device,
                            t,
                            p_up_pa,
                            p_down_pa,
                            "singular conductance, closing valve"
                        );
                        self.blocked[k] = true;
                    }
                    Ok(FlowLaw::Closed)
                }
            },
            Err(e) => Err(e.into()),
        }
    }
}

impl<F> TransientModel for NetworkModel<'_, F>
where
    F: FnMut(&TrajectorySample),
{
    fn initial_state(&self) -> DVector<f64> {
        let mut x = DVector::zeros(ReactorState::LEN + self.net.connections.len());
        self.net
            .reactor
            .fill(self.net.reactor.initial())
            .write_to(x.as_mut_slice());
        x
    }

    fn abs_tolerances(&self) -> DVector<f64> {
        self.atol.clone()
    }

    fn begin_step(&mut self, t: f64, _x: &DVector<f64>) -> SimResult<()> {
        self.records.clear();
        let p_chamber = self.accepted.pressure().value;

        for k in 0..self.net.connections.len() {
            let law = self.freeze(t, k)?;
            let conn = &self.net.connections[k];
            let p_res = self.net.reservoirs[conn.reservoir.0].pressure().value;
            let (p_up, p_down) = match conn.direction {
                Direction::IntoChamber => (p_res, p_chamber),
                Direction::OutOfChamber => (p_chamber, p_res),
            };

            self.records.push(DeviceRecord {
                id: conn.id,
                name: conn.device.name().to_string(),
                conductance: law.conductance().map(|c| c.coeff()),
                blocked: self.blocked[k],
                mdot_start_kg_s: law.mass_flow(t, p_up, p_down),
                delivered_kg: 0.0,
            });
            self.laws[k] = law;
        }
        Ok(())
    }

    fn rhs(&mut self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        let net = self.net;
        let provider = net.provider();
        let reactor_state = ReactorState::from_slice(x.as_slice())?;
        let chamber = net
            .reactor
            .thermo_state(provider, &reactor_state, self.t_hint())
            .map_err(retryable)?;
        let p_chamber = chamber.pressure().value;

        let mut dx = DVector::zeros(x.len());
        let mut inflows = Vec::with_capacity(net.connections.len());
        let mut outflow = 0.0;

        for (k, (conn, law)) in net.connections.iter().zip(&self.laws).enumerate() {
            let reservoir = &net.reservoirs[conn.reservoir.0];
            let p_res = reservoir.pressure().value;
            let mdot = match conn.direction {
                Direction::IntoChamber => {
                    let mdot = law.mass_flow(t, p_res, p_chamber);
                    inflows.push(Inflow {
                        mdot_kg_s: mdot,
                        enthalpy_j_kg: provider.specific_enthalpy(reservoir.state()),
                        mass_fractions: reservoir.state().composition().mass_fractions(),
                    });
                    mdot
                }
                Direction::OutOfChamber => {
                    let mdot = law.mass_flow(t, p_chamber, p_res);
                    outflow += mdot;
                    mdot
                }
            };
            dx[ReactorState::LEN + k] = mdot;
        }

        let rates = net
            .reactor
            .rates(provider, &chamber, &inflows, outflow)
            .map_err(retryable)?;
        dx[0] = rates.du_dt;
        for (i, r) in rates.dm_dt.iter().enumerate() {
            dx[1 + i] = *r;
        }
        Ok(dx)
    }

    fn check_state(&mut self, t: f64, x: &DVector<f64>) -> SimResult<()> {
        let reactor_state = ReactorState::from_slice(x.as_slice())?;
        if !reactor_state.internal_energy_j.is_finite() {
            return Err(SimError::non_physical("non-finite internal energy"));
        }
        for s in Species::ALL {
            let m = reactor_state.species_masses_kg[s.index()];
            if m < -self.atol[1 + s.index()] {
                return Err(SimError::non_physical(format!(
                    "negative {s} mass ({m:.3e} kg)"
                )));
            }
        }
        if reactor_state.mass_kg() <= 0.0 {
            return Err(SimError::non_physical("reactor is empty"));
        }

        let state = self
            .net
            .reactor
            .thermo_state(self.net.provider(), &reactor_state, self.t_hint())
            .map_err(retryable)?;
        self.trial = Some((t, state));
        Ok(())
    }

    fn accept_step(&mut self, t: f64, x: &DVector<f64>) -> SimResult<()> {
        let reactor_state = ReactorState::from_slice(x.as_slice())?;
        let state = match self.trial.take() {
            Some((t_trial, state)) if t_trial == t => state,
            _ => self.net.reactor.thermo_state(
                self.net.provider(),
                &reactor_state,
                self.t_hint(),
            )?,
        };

        let devices = self
            .records
            .iter()
            .enumerate()
            .map(|(k, r)| DeviceRecord {
                delivered_kg: x[ReactorState::LEN + k],
                ..r.clone()
            })
            .collect();

        let sample = TrajectorySample {
            t_s: t,
            exhaust_velocity_m_s: self.net.exhaust_velocity(t, &state)?,
            state: state.clone(),
            mass_kg: reactor_state.mass_kg(),
            devices,
        };
        debug!("{}", sample.monitor_line());
        (self.monitor)(&sample);
        self.recorder.record(sample);
        self.accepted = state;
        Ok(())
    }
}
