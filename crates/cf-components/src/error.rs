//! Error types for component operations.

use cf_core::error::CfError;
use cf_thermo::ThermoError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Pressure differential too small (or reversed) to define a conductance.
    #[error(
        "Singular conductance in '{device}': upstream {p_up_pa:.1} Pa, downstream {p_down_pa:.1} Pa"
    )]
    SingularConductance {
        device: String,
        p_up_pa: f64,
        p_down_pa: f64,
    },

    /// Chamber pressure below exit pressure; no isentropic expansion exists.
    #[error("Undefined expansion: chamber {p_chamber_pa:.1} Pa below exit {p_exit_pa:.1} Pa")]
    UndefinedExpansion { p_chamber_pa: f64, p_exit_pa: f64 },

    #[error("Thermochemistry error: {0}")]
    Thermo(#[from] ThermoError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<CfError> for ComponentError {
    fn from(e: CfError) -> Self {
        match e {
            CfError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            CfError::InvalidArg { what } | CfError::LengthMismatch { what, .. } => {
                ComponentError::InvalidArg { what }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::SingularConductance {
            device: "fuel valve".into(),
            p_up_pa: 3.0e6,
            p_down_pa: 3.0e6,
        };
        let msg = err.to_string();
        assert!(msg.contains("fuel valve"));
        assert!(msg.contains("Singular"));
    }

    #[test]
    fn thermo_error_is_wrapped() {
        let err: ComponentError = ThermoError::OutOfRange { what: "temperature" }.into();
        assert!(matches!(err, ComponentError::Thermo(_)));
        assert!(err.to_string().contains("temperature"));
    }
}
