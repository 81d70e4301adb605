//! Simulation runner with adaptive step control and cutback retry.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, Rosenbrock2, StepOutcome};
use crate::model::TransientModel;
use cf_core::numeric::weighted_rms_norm;
use nalgebra::DVector;
use tracing::{info, warn};

/// Smallest factor a rejected step is shrunk by in one go.
const MIN_SHRINK: f64 = 0.2;

/// A step within this relative distance of the horizon is stretched onto it.
const HORIZON_SNAP: f64 = 1e-9;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive two-stage Rosenbrock (default, stiff-capable, error controlled).
    #[default]
    Rosenbrock2,
    /// Forward Euler with fixed `dt` (1st-order, no error control).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Initial step for adaptive integrators, fixed step for Forward Euler (s)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Smallest step the driver may cut back to (s)
    pub min_dt: f64,
    /// Largest step the controller may grow to (s)
    pub max_dt: f64,
    /// Relative tolerance of the local error test
    pub rtol: f64,
    /// Safety factor applied to the optimal step estimate
    pub safety: f64,
    /// Maximum step growth per accepted step
    pub grow_factor: f64,
    /// Step reduction after a retryable failure
    pub cutback_factor: f64,
    /// Retries allowed within one step
    pub max_retries: usize,
    /// Maximum number of accepted steps (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: Rosenbrock2)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-7,
            t_end: 0.1,
            min_dt: 1e-12,
            max_dt: 1e-4,
            rtol: 1e-4,
            safety: 0.9,
            grow_factor: 5.0,
            cutback_factor: 0.5,
            max_retries: 12,
            max_steps: 500_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        // Forward Euler runs at the fixed `dt` and never consults `max_dt`.
        let max_dt_ok = match self.integrator {
            IntegratorType::Rosenbrock2 => self.max_dt >= self.min_dt,
            IntegratorType::ForwardEuler => true,
        };
        let checks: [(bool, &'static str); 9] = [
            (self.dt > 0.0 && self.dt.is_finite(), "dt must be positive"),
            (
                self.t_end >= 0.0 && self.t_end.is_finite(),
                "t_end must be non-negative",
            ),
            (self.min_dt > 0.0, "min_dt must be positive"),
            (max_dt_ok, "max_dt must not be below min_dt"),
            (self.rtol > 0.0, "rtol must be positive"),
            (
                self.safety > 0.0 && self.safety <= 1.0,
                "safety must lie in (0, 1]",
            ),
            (self.grow_factor > 1.0, "grow_factor must exceed 1"),
            (
                self.cutback_factor > 0.0 && self.cutback_factor < 1.0,
                "cutback_factor must lie in (0, 1)",
            ),
            (self.max_steps > 0, "max_steps must be positive"),
        ];
        for (ok, what) in checks {
            if !ok {
                return Err(SimError::InvalidArg { what });
            }
        }
        Ok(())
    }

    /// Step-size factor after a trial with error norm `norm`.
    fn step_factor(&self, norm: f64) -> f64 {
        if norm <= 0.0 {
            return self.grow_factor;
        }
        (self.safety / norm.sqrt()).min(self.grow_factor)
    }
}

/// Counters collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Accepted steps.
    pub steps: usize,
    /// Trial steps rejected by error control.
    pub rejected: usize,
    /// Trial steps cut back after a retryable failure.
    pub retries: usize,
}

/// Record of simulation results: every accepted state, t = 0 included.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<DVector<f64>>,
    pub stats: SimStats,
}

impl SimRecord {
    fn push(&mut self, t: f64, x: &DVector<f64>) {
        self.t.push(t);
        self.x.push(x.clone());
    }
}

fn attempt<M: TransientModel>(
    integrator: &Rosenbrock2,
    kind: IntegratorType,
    model: &mut M,
    t: f64,
    x: &DVector<f64>,
    dt: f64,
    t_new: f64,
) -> SimResult<StepOutcome> {
    let outcome = match kind {
        IntegratorType::Rosenbrock2 => integrator.step(model, t, x, dt)?,
        IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt)?,
    };
    if outcome.x_new.iter().any(|v| !v.is_finite()) {
        return Err(SimError::non_physical("non-finite state"));
    }
    model.check_state(t_new, &outcome.x_new)?;
    Ok(outcome)
}

/// Run a transient simulation from t = 0 to `opts.t_end`, keeping every
/// accepted state in the returned [`SimRecord`].
///
/// Every step is attempted with the current step size; a
/// [`SimError::Retryable`] failure cuts the step back by `cutback_factor`
/// until it succeeds or `max_retries`/`min_dt` is exhausted
/// ([`SimError::StepFailed`]). With the adaptive integrator the local error is
/// measured in the weighted RMS norm and steps with norm above 1 are repeated
/// with a smaller size. The final step is shortened to land on `t_end`.
pub fn run_sim<M: TransientModel>(model: &mut M, opts: &SimOptions) -> SimResult<SimRecord> {
    let mut record = SimRecord::default();
    let stats = drive(model, opts, |t, x| record.push(t, x))?;
    record.stats = stats;
    Ok(record)
}

/// [`run_sim`] without a state history, for models that record their own
/// results in [`TransientModel::accept_step`].
pub fn run_sim_stats<M: TransientModel>(model: &mut M, opts: &SimOptions) -> SimResult<SimStats> {
    drive(model, opts, |_, _| {})
}

fn drive<M, F>(model: &mut M, opts: &SimOptions, mut on_accept: F) -> SimResult<SimStats>
where
    M: TransientModel,
    F: FnMut(f64, &DVector<f64>),
{
    opts.validate()?;

    let mut x = model.initial_state();
    let atol = model.abs_tolerances();
    if atol.len() != x.len() {
        return Err(SimError::InvalidArg {
            what: "abs_tolerances length must match state",
        });
    }
    if atol.iter().any(|a| !(*a > 0.0)) {
        return Err(SimError::InvalidArg {
            what: "abs_tolerances must be positive",
        });
    }
    let rosenbrock = Rosenbrock2::new(atol.clone());

    let mut t = 0.0;
    let mut h = match opts.integrator {
        IntegratorType::Rosenbrock2 => opts.dt.min(opts.max_dt),
        IntegratorType::ForwardEuler => opts.dt,
    };

    let mut stats = SimStats::default();
    on_accept(t, &x);

    info!(
        integrator = ?opts.integrator,
        t_end = opts.t_end,
        states = x.len(),
        "starting transient run"
    );

    while t < opts.t_end {
        if stats.steps >= opts.max_steps {
            return Err(SimError::StepLimit {
                max_steps: opts.max_steps,
                t_s: t,
                last_valid: None,
            });
        }

        model.begin_step(t, &x)?;
        let mut retries = 0;

        loop {
            let remaining = opts.t_end - t;
            let last = h * (1.0 + HORIZON_SNAP) >= remaining;
            let dt = if last { remaining } else { h };
            let t_new = if last { opts.t_end } else { t + dt };

            let outcome = match attempt(&rosenbrock, opts.integrator, model, t, &x, dt, t_new) {
                Ok(outcome) => outcome,
                Err(SimError::Retryable { fault }) => {
                    retries += 1;
                    stats.retries += 1;
                    let next = dt * opts.cutback_factor;
                    if retries > opts.max_retries || next < opts.min_dt {
                        return Err(SimError::StepFailed {
                            t_s: t,
                            dt_s: dt,
                            fault,
                        });
                    }
                    warn!(t, dt, next_dt = next, %fault, "cutting back step");
                    h = next;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match &outcome.error {
                Some(err) => {
                    let norm = weighted_rms_norm(
                        err.as_slice(),
                        x.as_slice(),
                        outcome.x_new.as_slice(),
                        atol.as_slice(),
                        opts.rtol,
                    )?;
                    if norm > 1.0 {
                        stats.rejected += 1;
                        let next = dt * opts.step_factor(norm).max(MIN_SHRINK);
                        if next < opts.min_dt {
                            return Err(SimError::StepSizeUnderflow {
                                t_s: t,
                                dt_s: next,
                                last_valid: None,
                            });
                        }
                        h = next;
                        continue;
                    }
                    h = (dt * opts.step_factor(norm)).min(opts.max_dt);
                }
                None => {
                    h = (dt * opts.grow_factor).min(opts.dt);
                }
            }

            t = t_new;
            x = outcome.x_new;
            model.accept_step(t, &x)?;
            stats.steps += 1;
            on_accept(t, &x);
            break;
        }
    }

    info!(
        steps = stats.steps,
        rejected = stats.rejected,
        retries = stats.retries,
        "transient run complete"
    );

    Ok(stats)
}
