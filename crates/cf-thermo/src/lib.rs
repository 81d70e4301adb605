//! cf-thermo: thermochemical state provider for chamberflow.
//!
//! Provides:
//! - Species known to the bundled mechanism (C2H6, O2, H, H2, H2O, CO, CO2, N2)
//! - Composition handling (mass fractions, mole fractions, Cantera-style strings)
//! - Thermodynamic state representation
//! - `ThermoProvider` trait isolating the simulator from the chemistry backend
//! - `IdealGasMixture`: NASA-7 thermodynamics plus a global ethane mechanism
//!
//! # Example
//!
//! ```
//! use cf_core::units::{atm, k};
//! use cf_thermo::{Composition, IdealGasMixture, Species, StateInput, ThermoProvider};
//!
//! let provider = IdealGasMixture::default();
//! let comp = Composition::pure(Species::O2);
//! let state = provider
//!     .state(StateInput::TP { t: k(300.0), p: atm(1.0), comp: &comp })
//!     .unwrap();
//! assert!((state.gamma() - 1.4).abs() < 0.01);
//! ```

pub mod composition;
pub mod error;
pub mod ideal_gas;
pub mod kinetics;
pub mod model;
pub mod nasa7;
pub mod species;
pub mod state;

// Re-exports for ergonomics
pub use composition::Composition;
pub use error::{ThermoError, ThermoResult};
pub use ideal_gas::IdealGasMixture;
pub use kinetics::{Arrhenius, Mechanism, Reaction};
pub use model::ThermoProvider;
pub use nasa7::Nasa7;
pub use species::{Atoms, Species, SpeciesArray};
pub use state::{SpecEnergy, SpecEnthalpy, SpecHeatCapacity, StateInput, ThermoState};
