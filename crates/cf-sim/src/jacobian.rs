//! Finite difference Jacobian computation.

use crate::error::SimResult;
use nalgebra::{DMatrix, DVector};

/// Compute Jacobian using forward finite differences.
///
/// `f_x` is `f(x)`, already evaluated by the caller. Column `j` perturbs
/// `x[j]` by `epsilon * max(|x[j]|, scale[j])`, so components that sit at zero
/// are still perturbed on their natural scale.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    scale: &DVector<f64>,
    epsilon: f64,
    mut f: F,
) -> SimResult<DMatrix<f64>>
where
    F: FnMut(&DVector<f64>) -> SimResult<DVector<f64>>,
{
    let n = x.len();
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(scale[j]);
        x_perturbed[j] = x[j] + dx;
        // Use the representable step, not the requested one.
        let dx = x_perturbed[j] - x[j];

        let f_perturbed = f(&x_perturbed)?;
        let df = (f_perturbed - f_x) / dx;
        jac.set_column(j, &df);

        x_perturbed[j] = x[j];
    }

    Ok(jac)
}
