//! Error types for simulation operations.

use crate::reactor::ReactorSnapshot;
use cf_components::ComponentError;
use cf_core::CfError;
use cf_thermo::ThermoError;
use std::fmt;
use thiserror::Error;

/// Why a trial step could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum StepFault {
    /// The trial state is outside the physical domain (negative inventory,
    /// non-finite energy, empty reactor).
    NonPhysical { what: String },
    /// The thermochemical provider could not derive an intensive state.
    ProviderConvergence { detail: String },
}

impl fmt::Display for StepFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepFault::NonPhysical { what } => write!(f, "non-physical state: {what}"),
            StepFault::ProviderConvergence { detail } => {
                write!(f, "provider did not converge: {detail}")
            }
        }
    }
}

impl From<ThermoError> for StepFault {
    fn from(e: ThermoError) -> Self {
        match e {
            ThermoError::ConvergenceFailed { what, detail } => StepFault::ProviderConvergence {
                detail: format!("{what}: {detail}"),
            },
            other => StepFault::NonPhysical {
                what: other.to_string(),
            },
        }
    }
}

/// Errors encountered during transient simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Trial step failed; the driver cuts the step back and retries.
    #[error("Retryable step failure: {fault}")]
    Retryable { fault: StepFault },

    /// Cutback retries exhausted on a trial step.
    #[error("Step from t = {t_s:.6e} s failed after cutback to dt = {dt_s:.3e} s: {fault}")]
    StepFailed {
        t_s: f64,
        dt_s: f64,
        fault: StepFault,
    },

    /// `last_valid` is filled in by models that keep a reactor state.
    #[error("Step size underflow at t = {t_s:.6e} s (dt = {dt_s:.3e} s)")]
    StepSizeUnderflow {
        t_s: f64,
        dt_s: f64,
        last_valid: Option<Box<ReactorSnapshot>>,
    },

    #[error("Step limit of {max_steps} reached at t = {t_s:.6e} s")]
    StepLimit {
        max_steps: usize,
        t_s: f64,
        last_valid: Option<Box<ReactorSnapshot>>,
    },

    #[error("Non-physical reactor state at t = {t_s:.6e} s: {what}")]
    NonPhysicalState {
        t_s: f64,
        what: String,
        last_valid: Box<ReactorSnapshot>,
    },

    #[error("Thermochemical provider failed at t = {t_s:.6e} s: {detail}")]
    ProviderConvergence {
        t_s: f64,
        detail: String,
        last_valid: Box<ReactorSnapshot>,
    },

    #[error(
        "Singular conductance in '{device}' at t = {t_s:.6e} s: upstream {p_up_pa:.1} Pa, downstream {p_down_pa:.1} Pa"
    )]
    SingularConductance {
        device: String,
        t_s: f64,
        p_up_pa: f64,
        p_down_pa: f64,
        last_valid: Box<ReactorSnapshot>,
    },

    #[error("Thermochemistry error: {0}")]
    Thermo(#[from] ThermoError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] CfError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Shorthand for a retryable non-physical trial state.
    pub fn non_physical(what: impl Into<String>) -> Self {
        SimError::Retryable {
            fault: StepFault::NonPhysical { what: what.into() },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SimError::Retryable { .. })
    }

    /// Attach the last accepted reactor state to a fatal driver error.
    ///
    /// `StepFailed` becomes `NonPhysicalState` or `ProviderConvergence`;
    /// underflow and step-limit errors get their `last_valid` filled in.
    /// Other errors are returned unchanged.
    pub fn with_last_valid(self, snapshot: ReactorSnapshot) -> Self {
        let last_valid = Box::new(snapshot);
        match self {
            SimError::StepFailed { t_s, fault, .. } => match fault {
                StepFault::NonPhysical { what } => SimError::NonPhysicalState {
                    t_s,
                    what,
                    last_valid,
                },
                StepFault::ProviderConvergence { detail } => SimError::ProviderConvergence {
                    t_s,
                    detail,
                    last_valid,
                },
            },
            SimError::StepSizeUnderflow { t_s, dt_s, .. } => SimError::StepSizeUnderflow {
                t_s,
                dt_s,
                last_valid: Some(last_valid),
            },
            SimError::StepLimit { max_steps, t_s, .. } => SimError::StepLimit {
                max_steps,
                t_s,
                last_valid: Some(last_valid),
            },
            other => other,
        }
    }

    /// Last accepted reactor state carried by a fatal error, if any.
    pub fn last_valid(&self) -> Option<&ReactorSnapshot> {
        match self {
            SimError::NonPhysicalState { last_valid, .. }
            | SimError::ProviderConvergence { last_valid, .. }
            | SimError::SingularConductance { last_valid, .. } => Some(&**last_valid),
            SimError::StepSizeUnderflow { last_valid, .. }
            | SimError::StepLimit { last_valid, .. } => last_valid.as_deref(),
            _ => None,
        }
    }
}
