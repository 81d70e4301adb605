//! cf-components: flow devices around a combustion chamber.
//!
//! Provides:
//! - `Reservoir`: infinite-capacity source/sink with a frozen state
//! - `ChokedValve`: critical-flow valve with a per-step conductance
//! - `PulsedMassFlowController`: Gaussian mass-flow pulse (igniter)
//! - `exhaust_velocity`: isentropic expansion of the chamber gas
//!
//! Valves and controllers implement [`FlowDevice`]: at the start of every
//! integration step the device is frozen into a [`FlowLaw`] that the
//! integrator evaluates at its stage times.
//!
//! # Example
//!
//! ```
//! use cf_components::{ChokedValve, Reservoir};
//! use cf_core::units::{atm, k, m2};
//! use cf_thermo::{Composition, IdealGasMixture, Species};
//!
//! let provider = IdealGasMixture::default();
//! let fuel = Reservoir::new(
//!     "fuel",
//!     &provider,
//!     k(750.0),
//!     atm(30.0),
//!     &Composition::pure(Species::C2H6),
//! )
//! .unwrap();
//!
//! let valve = ChokedValve::new("fuel valve", m2(4e-4)).unwrap();
//! let mdot = valve.conductance_flow(fuel.state(), atm(20.0)).unwrap();
//! assert!((mdot.value - 1.67).abs() < 0.02);
//! ```

pub mod common;
pub mod controller;
pub mod error;
pub mod nozzle;
pub mod reservoir;
pub mod traits;
pub mod valve;

// Re-exports
pub use controller::{PulseShape, PulsedMassFlowController};
pub use error::{ComponentError, ComponentResult};
pub use nozzle::exhaust_velocity;
pub use reservoir::Reservoir;
pub use traits::{FlowDevice, FlowLaw, PortStates};
pub use valve::{ChokedValve, Conductance, SingularityGuard, choked_mass_flow_rate};
