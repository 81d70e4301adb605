//! Transient simulation of a combustion chamber start-up.
//!
//! Provides:
//! - `Reactor`: rigid, adiabatic, reacting control volume
//! - `TransientModel` trait and `run_sim` driver with cutback retry
//! - Adaptive two-stage Rosenbrock integrator (finite-difference Jacobian)
//!   and fixed-step Forward Euler
//! - `ChamberNetwork`: reservoirs, valves and pulse controllers around one
//!   reactor, advanced to a horizon into a `Trajectory`
//! - `ChamberScenario`: serde configuration of the reference start-up
//!
//! # Example
//!
//! ```no_run
//! use cf_sim::ChamberScenario;
//! use cf_thermo::IdealGasMixture;
//!
//! let scenario = ChamberScenario::default();
//! let network = scenario.build(Box::new(IdealGasMixture::default())).unwrap();
//! let trajectory = network
//!     .advance(&scenario.sim_options(), |s| println!("{}", s.monitor_line()))
//!     .unwrap();
//! println!("peak pressure {:.3} MPa", trajectory.peak_pressure_pa() / 1e6);
//! ```

pub mod error;
pub mod integrator;
pub mod jacobian;
pub mod model;
pub mod network;
pub mod reactor;
pub mod recorder;
pub mod scenario;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult, StepFault};
pub use integrator::{ForwardEuler, Integrator, Rosenbrock2, StepOutcome};
pub use model::TransientModel;
pub use network::{ChamberNetwork, NetworkOptions, Node, ReservoirId, SingularPolicy};
pub use reactor::{Inflow, Reactor, ReactorRates, ReactorSnapshot, ReactorState};
pub use recorder::{DeviceRecord, Trajectory, TrajectoryRecorder, TrajectorySample};
pub use scenario::{ChamberScenario, ChamberSpec, GasSpec, PulseSpec, ValveAreas};
pub use sim::{IntegratorType, SimOptions, SimRecord, SimStats, run_sim, run_sim_stats};
