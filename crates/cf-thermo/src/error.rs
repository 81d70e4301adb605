//! Thermochemistry errors.

use cf_core::CfError;
use thiserror::Error;

/// Result type for thermochemistry operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors raised by the thermochemical state provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative density, pressure, mass, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the provider's valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Species name not known to the bundled thermochemistry.
    #[error("Unknown species '{name}'")]
    UnknownSpecies { name: String },

    /// Malformed composition string.
    #[error("Invalid composition '{input}': {reason}")]
    InvalidComposition { input: String, reason: &'static str },

    /// Convergence failure (e.g., solving for T given U, V and species masses).
    #[error("Convergence failed for {what}: {detail}")]
    ConvergenceFailed { what: &'static str, detail: String },
}

impl From<CfError> for ThermoError {
    fn from(err: CfError) -> Self {
        match err {
            CfError::NonFinite { what, .. } => ThermoError::NonPhysical { what },
            CfError::InvalidArg { what } | CfError::LengthMismatch { what, .. } => {
                ThermoError::InvalidArg { what }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = ThermoError::ConvergenceFailed {
            what: "temperature from internal energy",
            detail: "u below table range".into(),
        };
        assert!(err.to_string().contains("internal energy"));
        assert!(err.to_string().contains("below table range"));
    }

    #[test]
    fn core_error_maps_to_non_physical() {
        let err: ThermoError = CfError::NonFinite {
            what: "density",
            value: f64::NAN,
        }
        .into();
        assert_eq!(err, ThermoError::NonPhysical { what: "density" });
    }
}
