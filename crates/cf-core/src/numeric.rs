use crate::CfError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Weighted root-mean-square norm of a local error estimate.
///
/// Component `i` is scaled by `atol[i] + rtol * max(|y0[i]|, |y1[i]|)`, so a
/// value `<= 1` means the error is within tolerance.
pub fn weighted_rms_norm(
    err: &[Real],
    y0: &[Real],
    y1: &[Real],
    atol: &[Real],
    rtol: Real,
) -> Result<Real, CfError> {
    let n = err.len();
    for (what, len) in [("y0", y0.len()), ("y1", y1.len()), ("atol", atol.len())] {
        if len != n {
            return Err(CfError::LengthMismatch {
                what,
                expected: n,
                actual: len,
            });
        }
    }
    if n == 0 {
        return Ok(0.0);
    }

    let mut acc = 0.0;
    for i in 0..n {
        let scale = atol[i] + rtol * y0[i].abs().max(y1[i].abs());
        let r = err[i] / scale;
        acc += r * r;
    }
    ensure_finite((acc / n as Real).sqrt(), "error norm")
}
