//! Natural cubic spline fit of the airfoil profile.
//!
//! The closed profile is parametrized by cumulative Euclidean arclength
//! `u`; two independent spline systems give `x(u)` and `y(u)` with free
//! (zero curvature) end conditions, solved by the tridiagonal solver. The
//! fitted spline is consumed once, by resampling the configured number of
//! surface nodes with a clustered or uniform parameter distribution.

use thiserror::Error;

use crate::config::{AirfoilProfile, SpacingKind, SMALL};
use crate::geometry::NodeCurve;
use crate::spacing;
use crate::tridiagonal::{self, TridiagonalError};

/// Error type for the spline fit.
#[derive(Debug, Error)]
pub enum SplineError {
    /// Two adjacent profile points coincide; the arclength parametrization
    /// has a zero-length segment there.
    #[error("degenerate profile segment after point {index}")]
    DegenerateSegment { index: usize },

    /// The second-derivative system could not be solved.
    #[error("spline system: {0}")]
    Solver(#[from] TridiagonalError),
}

/// Natural cubic spline through the profile points, parametrized by
/// cumulative arclength.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    /// Arclength knots, strictly increasing, `u[0] = 0`.
    u: Vec<f64>,
    /// Control point coordinates.
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots (zero at both ends).
    d2x: Vec<f64>,
    d2y: Vec<f64>,
}

impl CubicSpline {
    /// Fit the spline through the profile points.
    pub fn fit(profile: &AirfoilProfile) -> Result<Self, SplineError> {
        let n = profile.len();
        assert!(n >= 3, "need at least three profile points");

        // Cumulative arclength parametrization.
        let mut u = vec![0.0; n];
        for i in 1..n {
            let dx = profile.x[i] - profile.x[i - 1];
            let dy = profile.y[i] - profile.y[i - 1];
            let du = (dx * dx + dy * dy).sqrt();
            if du < SMALL {
                return Err(SplineError::DegenerateSegment { index: i - 1 });
            }
            u[i] = u[i - 1] + du;
        }

        // Interior rows of the two second-derivative systems; rows 0 and
        // n-1 stay zero (free end conditions).
        let mut lower = vec![0.0; n];
        let mut upper = vec![0.0; n];
        let mut diag_x = vec![0.0; n];
        let mut rhs_x = vec![0.0; n];
        let mut rhs_y = vec![0.0; n];
        for i in 1..n - 1 {
            lower[i] = u[i] - u[i - 1];
            diag_x[i] = 2.0 * (u[i + 1] - u[i - 1]);
            upper[i] = u[i + 1] - u[i];

            rhs_x[i] = 6.0
                * ((profile.x[i + 1] - profile.x[i]) / (u[i + 1] - u[i])
                    - (profile.x[i] - profile.x[i - 1]) / (u[i] - u[i - 1]));
            rhs_y[i] = 6.0
                * ((profile.y[i + 1] - profile.y[i]) / (u[i + 1] - u[i])
                    - (profile.y[i] - profile.y[i - 1]) / (u[i] - u[i - 1]));
        }
        let mut diag_y = diag_x.clone();

        tridiagonal::solve(&lower, &mut diag_x, &upper, &mut rhs_x, 1, n - 2)?;
        tridiagonal::solve(&lower, &mut diag_y, &upper, &mut rhs_y, 1, n - 2)?;

        Ok(Self {
            u,
            x: profile.x.clone(),
            y: profile.y.clone(),
            d2x: rhs_x,
            d2y: rhs_y,
        })
    }

    /// Total arclength of the profile (the parameter range is `[0, u_max]`).
    pub fn u_max(&self) -> f64 {
        self.u[self.u.len() - 1]
    }

    /// Evaluate the spline at parameter `v`, clamped to `[0, u_max]`.
    ///
    /// Clamping means a target at (or marginally past) the last knot
    /// evaluates on the final segment instead of reading out of bounds.
    pub fn eval(&self, v: f64) -> (f64, f64) {
        let n = self.u.len();
        let v = v.clamp(0.0, self.u_max());

        // Locate the bracketing segment by linear scan; the resampling
        // targets arrive in increasing order, so the scan stays cheap.
        let mut j = 0;
        while j < n - 2 && v - self.u[j + 1] > SMALL {
            j += 1;
        }

        let h = self.u[j + 1] - self.u[j];
        let a = (self.u[j + 1] - v) / h;
        let b = 1.0 - a;
        let c = (a * a * a - a) / 6.0 * h * h;
        let d = (b * b * b - b) / 6.0 * h * h;

        let x = a * self.x[j] + b * self.x[j + 1] + c * self.d2x[j] + d * self.d2x[j + 1];
        let y = a * self.y[j] + b * self.y[j + 1] + c * self.d2y[j] + d * self.d2y[j + 1];
        (x, y)
    }

    /// Resample `n` surface nodes along the full parameter range.
    ///
    /// Uses the double-clustered distribution (dense at the leading and
    /// trailing edges) unless the configuration asks for uniform spacing.
    pub fn resample(&self, n: usize, spacing: SpacingKind) -> NodeCurve {
        let targets = match spacing {
            SpacingKind::Uniform => spacing::uniform(n, self.u_max()),
            SpacingKind::Clustered => spacing::double_clustered(n, self.u_max()),
        };

        let mut curve = NodeCurve {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        };
        for v in targets {
            let (x, y) = self.eval(v);
            curve.x.push(x);
            curve.y.push(y);
        }
        curve
    }
}
