//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use nalgebra::DVector;

/// Trait for transient (dynamic) system models.
///
/// The state is a flat vector so implicit integrators can build Jacobians and
/// solve linear systems on it. Hooks are called by [`crate::run_sim`] in this
/// order for every step:
///
/// 1. `begin_step` once, with the last accepted state
/// 2. `rhs` as many times as the integrator needs (stages, Jacobian columns,
///    retries after a cutback)
/// 3. `check_state` on each candidate end-of-step state
/// 4. `accept_step` once the candidate passed error control
///
/// Failures that a smaller step may cure must be reported as
/// [`crate::SimError::Retryable`]; anything else aborts the run.
pub trait TransientModel {
    /// Return the initial state at t=0.
    fn initial_state(&self) -> DVector<f64>;

    /// Absolute tolerance per state component (same length as the state).
    fn abs_tolerances(&self) -> DVector<f64>;

    /// Freeze whatever the model keeps constant over one step.
    fn begin_step(&mut self, _t: f64, _x: &DVector<f64>) -> SimResult<()> {
        Ok(())
    }

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&mut self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;

    /// Validate a candidate end-of-step state before it is accepted.
    fn check_state(&mut self, _t: f64, _x: &DVector<f64>) -> SimResult<()> {
        Ok(())
    }

    /// Called with every accepted state.
    fn accept_step(&mut self, _t: f64, _x: &DVector<f64>) -> SimResult<()> {
        Ok(())
    }
}
