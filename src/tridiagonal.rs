//! Direct solution of tridiagonal linear systems (Thomas algorithm).
//!
//! Solves `lower[i]*x[i-1] + diag[i]*x[i] + upper[i]*x[i+1] = rhs[i]` for
//! rows `il..=iu` by forward elimination followed by back substitution,
//! overwriting `rhs` with the solution. The spline fit uses this for the
//! second-derivative systems of the natural cubic splines.

use thiserror::Error;

/// Pivots smaller than this are treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// Error type for the tridiagonal solver.
#[derive(Debug, Error)]
pub enum TridiagonalError {
    /// A diagonal pivot vanished during elimination; the system is
    /// singular (or numerically indistinguishable from singular).
    #[error("zero pivot at row {row} during tridiagonal elimination")]
    ZeroPivot { row: usize },
}

/// Solve the tridiagonal system over rows `il..=iu` in place.
///
/// `rhs` holds the right-hand side on entry and the solution on return.
/// `diag` is consumed as scratch by the elimination. Rows outside
/// `il..=iu` are left untouched, so callers can keep boundary rows (e.g.
/// the free-end conditions of a natural spline) at known values.
///
/// Fails with [`TridiagonalError::ZeroPivot`] instead of propagating
/// inf/NaN through a degenerate division.
pub fn solve(
    lower: &[f64],
    diag: &mut [f64],
    upper: &[f64],
    rhs: &mut [f64],
    il: usize,
    iu: usize,
) -> Result<(), TridiagonalError> {
    assert!(iu < rhs.len(), "upper row out of range");
    assert!(il <= iu, "empty row range");

    // Forward elimination: reduce to an upper bidiagonal system.
    for i in il + 1..=iu {
        let pivot = diag[i - 1];
        if pivot.abs() < PIVOT_EPS {
            return Err(TridiagonalError::ZeroPivot { row: i - 1 });
        }
        let r = lower[i] / pivot;
        diag[i] -= r * upper[i - 1];
        rhs[i] -= r * rhs[i - 1];
    }

    // Back substitution.
    if diag[iu].abs() < PIVOT_EPS {
        return Err(TridiagonalError::ZeroPivot { row: iu });
    }
    rhs[iu] /= diag[iu];
    for i in (il..iu).rev() {
        if diag[i].abs() < PIVOT_EPS {
            return Err(TridiagonalError::ZeroPivot { row: i });
        }
        rhs[i] = (rhs[i] - upper[i] * rhs[i + 1]) / diag[i];
    }

    Ok(())
}
