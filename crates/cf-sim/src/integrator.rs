//! Single-step time integrators.

use crate::error::{SimError, SimResult};
use crate::jacobian::finite_difference_jacobian;
use crate::model::TransientModel;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::FRAC_1_SQRT_2;

/// Result of one trial step.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// Candidate state at `t + dt`.
    pub x_new: DVector<f64>,
    /// Local error estimate, if the method carries an embedded one.
    pub error: Option<DVector<f64>>,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Attempt one step of size `dt` from `(t, x)`.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepOutcome>;
}

/// Two-stage linearly implicit Rosenbrock method (ROS2), L-stable.
///
/// With `γ = 1 + 1/√2` and `W = I - γ·dt·J`:
///
/// ```text
/// W k1 = f(t, x)
/// W k2 = f(t + dt, x + dt·k1) - 2·k1
/// x_new = x + 1.5·dt·k1 + 0.5·dt·k2
/// ```
///
/// The embedded first-order solution is `x + dt·k1`, so the local error
/// estimate is `0.5·dt·(k1 + k2)`. The method keeps second order for any
/// approximation of J, which makes a finite-difference Jacobian sufficient.
#[derive(Clone, Debug)]
pub struct Rosenbrock2 {
    jacobian_scale: DVector<f64>,
}

impl Rosenbrock2 {
    pub const GAMMA: f64 = 1.0 + FRAC_1_SQRT_2;

    /// `jacobian_scale[j]` is the smallest magnitude state component `j` is
    /// resolved to (its absolute tolerance), used to size finite-difference
    /// perturbations of components near zero.
    pub fn new(jacobian_scale: DVector<f64>) -> Self {
        Self { jacobian_scale }
    }
}

impl Integrator for Rosenbrock2 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepOutcome> {
        let n = x.len();
        if self.jacobian_scale.len() != n {
            return Err(SimError::InvalidArg {
                what: "jacobian scale length must match state",
            });
        }

        let f0 = model.rhs(t, x)?;
        let jac = finite_difference_jacobian(
            x,
            &f0,
            &self.jacobian_scale,
            f64::EPSILON.sqrt(),
            |y| model.rhs(t, y),
        )?;

        let w = DMatrix::identity(n, n) - jac * (Self::GAMMA * dt);
        let lu = w.lu();

        let k1 = lu
            .solve(&f0)
            .ok_or_else(|| SimError::non_physical("singular Rosenbrock matrix"))?;

        let x1 = x + &k1 * dt;
        let f1 = model.rhs(t + dt, &x1)?;
        let k2 = lu
            .solve(&(f1 - &k1 * 2.0))
            .ok_or_else(|| SimError::non_physical("singular Rosenbrock matrix"))?;

        let x_new = x + &k1 * (1.5 * dt) + &k2 * (0.5 * dt);
        let error = (k1 + k2) * (0.5 * dt);

        Ok(StepOutcome {
            x_new,
            error: Some(error),
        })
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
/// Calls rhs() once per step and carries no error estimate.
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepOutcome> {
        let xdot = model.rhs(t, x)?;
        Ok(StepOutcome {
            x_new: x + xdot * dt,
            error: None,
        })
    }
}
