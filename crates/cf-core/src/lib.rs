//! cf-core: shared foundation for chamberflow.
//!
//! Contains:
//! - units (uom SI types, constructors and physical constants)
//! - numeric (Real, tolerances, error norms)
//! - ids (compact IDs for flow devices)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CfError, CfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
