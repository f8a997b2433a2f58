//! Elliptic grid smoothing.
//!
//! Relaxes the interior coordinates toward a solution of the inverted
//! Laplace grid equations, starting from the algebraic (transfinite)
//! seed. Two variants:
//! - [`EllipticKind::Laplace`] — plain smoothing, no source terms
//! - [`EllipticKind::Middlecoff`] — boundary-orthogonality forcing via
//!   the control functions `phi` and `psi`
//!
//! The solve is a state machine `Initializing -> Iterating ->
//! {Converged, Diverged}`. Each sweep rebuilds the local derivatives
//! directly from neighboring coordinates (unit logical spacing, 9-point
//! stencil), forms the coefficients
//! `alpha = x_eta^2 + y_eta^2`, `beta = x_ksi*x_eta + y_ksi*y_eta`,
//! `gamma = x_ksi^2 + y_ksi^2`, and under-relaxes each node by
//! `omega * res / (2 * (alpha + gamma))`. Boundary rows and columns are
//! never touched.
//!
//! Divergence (a sweep whose maximum residual fails to shrink) aborts
//! the solve with an error for both variants. On leaving the iteration,
//! whichever way, the metrics are recomputed from the final coordinates.

mod control;

use log::{debug, info, warn};
use thiserror::Error;

use crate::grid::{GridMetrics, MetricsError, StructuredGrid};
use control::ControlFunctions;

/// Convergence threshold on the maximum absolute residual.
pub const RESIDUAL_EPS: f64 = 1e-6;

/// Elliptic solver variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EllipticKind {
    /// Unforced smoothing.
    Laplace,
    /// Boundary-orthogonality forcing via control functions.
    Middlecoff,
}

/// Solver state. Terminal states are [`SolveState::Converged`] and
/// [`SolveState::Diverged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveState {
    Initializing,
    Iterating,
    Converged,
    Diverged,
}

/// Error type for the elliptic stage.
#[derive(Debug, Error)]
pub enum EllipticError {
    /// The maximum residual stopped decreasing.
    #[error("elliptic solve diverged after {iterations} iterations (residual {residual:.3e})")]
    Diverged { iterations: usize, residual: f64 },

    /// A boundary node has no usable tangential direction for the
    /// control-function normalization.
    #[error("zero tangent vector at boundary node (j={j}, i={i})")]
    ZeroTangent { j: usize, i: usize },

    /// Refreshing the metrics from the smoothed coordinates failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Outcome of a converged solve.
#[derive(Clone, Copy, Debug)]
pub struct SolveReport {
    /// Number of full interior sweeps.
    pub iterations: usize,
    /// Maximum absolute residual of the last sweep.
    pub residual: f64,
}

/// Elliptic smoother over a structured grid.
#[derive(Clone, Debug)]
pub struct EllipticSmoother {
    kind: EllipticKind,
    omega: f64,
}

impl EllipticSmoother {
    /// Create a smoother with the given variant and relaxation factor.
    pub fn new(kind: EllipticKind, omega: f64) -> Self {
        Self { kind, omega }
    }

    /// Relax the interior until convergence, refreshing `metrics` from
    /// the final coordinates.
    ///
    /// The incoming metrics must describe the current coordinates (the
    /// Middlecoff initialization reads its boundary derivatives from
    /// them). On divergence the coordinates hold the last sweep's state
    /// and the error carries the iteration count.
    pub fn solve(
        &self,
        grid: &mut StructuredGrid,
        metrics: &mut GridMetrics,
    ) -> Result<SolveReport, EllipticError> {
        // Initializing: only the Middlecoff variant has work to do here.
        let control = match self.kind {
            EllipticKind::Laplace => None,
            EllipticKind::Middlecoff => Some(ControlFunctions::compute(grid, metrics)?),
        };

        let mut state = SolveState::Iterating;
        // Seed at the threshold so the loop always runs its first sweep.
        let mut res_max = RESIDUAL_EPS;
        let mut iterations = 0;

        while state == SolveState::Iterating {
            iterations += 1;
            let res_old = res_max;
            res_max = self.sweep(grid, control.as_ref());

            if res_max < RESIDUAL_EPS {
                state = SolveState::Converged;
            } else if !res_max.is_finite() || (iterations > 1 && res_max >= res_old) {
                state = SolveState::Diverged;
            }

            debug!(
                "{:?} sweep {}: max residual {:.3e}",
                self.kind, iterations, res_max
            );
        }

        // Refresh all derived fields from the final coordinates before
        // reporting the outcome.
        match GridMetrics::compute(grid) {
            Ok(m) => *metrics = m,
            Err(e) => {
                if state == SolveState::Converged {
                    return Err(e.into());
                }
            }
        }

        if state == SolveState::Diverged {
            warn!(
                "{:?} diverged after {} iterations, residual {:.3e}",
                self.kind, iterations, res_max
            );
            return Err(EllipticError::Diverged {
                iterations,
                residual: res_max,
            });
        }

        info!(
            "{:?} converged after {} iterations, residual {:.3e}",
            self.kind, iterations, res_max
        );
        Ok(SolveReport {
            iterations,
            residual: res_max,
        })
    }

    /// One Gauss-Seidel sweep over the interior; returns the maximum
    /// absolute residual encountered.
    fn sweep(&self, grid: &mut StructuredGrid, control: Option<&ControlFunctions>) -> f64 {
        let im = grid.im;
        let jm = grid.jm;
        let mut res_max: f64 = 0.0;

        for j in 1..jm - 1 {
            for i in 1..im - 1 {
                let loc = grid.at(j, i);
                let e = grid.at(j, i + 1);
                let w = grid.at(j, i - 1);
                let n = grid.at(j + 1, i);
                let s = grid.at(j - 1, i);
                let ne = grid.at(j + 1, i + 1);
                let se = grid.at(j - 1, i + 1);
                let nw = grid.at(j + 1, i - 1);
                let sw = grid.at(j - 1, i - 1);

                let x0 = grid.x[loc];
                let y0 = grid.y[loc];

                // Local derivatives at unit logical spacing.
                let x_ksi = (grid.x[e] - grid.x[w]) / 2.0;
                let x_eta = (grid.x[n] - grid.x[s]) / 2.0;
                let x_ksi_ksi = grid.x[e] - 2.0 * x0 + grid.x[w];
                let x_ksi_eta = (grid.x[ne] - grid.x[se] - grid.x[nw] + grid.x[sw]) / 4.0;
                let x_eta_eta = grid.x[n] - 2.0 * x0 + grid.x[s];

                let y_ksi = (grid.y[e] - grid.y[w]) / 2.0;
                let y_eta = (grid.y[n] - grid.y[s]) / 2.0;
                let y_ksi_ksi = grid.y[e] - 2.0 * y0 + grid.y[w];
                let y_ksi_eta = (grid.y[ne] - grid.y[se] - grid.y[nw] + grid.y[sw]) / 4.0;
                let y_eta_eta = grid.y[n] - 2.0 * y0 + grid.y[s];

                let alpha = x_eta * x_eta + y_eta * y_eta;
                let beta = x_ksi * x_eta + y_ksi * y_eta;
                let gamma = x_ksi * x_ksi + y_ksi * y_ksi;

                let (res_x, res_y) = match control {
                    None => (
                        alpha * x_ksi_ksi - 2.0 * beta * x_ksi_eta + gamma * x_eta_eta,
                        alpha * y_ksi_ksi - 2.0 * beta * y_ksi_eta + gamma * y_eta_eta,
                    ),
                    Some(c) => {
                        let phi = c.phi(loc);
                        let psi = c.psi(loc);
                        (
                            alpha * (x_ksi_ksi + phi * x_ksi) - 2.0 * beta * x_ksi_eta
                                + gamma * (x_eta_eta + psi * x_eta),
                            alpha * (y_ksi_ksi + phi * y_ksi) - 2.0 * beta * y_ksi_eta
                                + gamma * (y_eta_eta + psi * y_eta),
                        )
                    }
                };

                res_max = res_max.max(res_x.abs()).max(res_y.abs());

                let damp = self.omega / (2.0 * (alpha + gamma));
                grid.x[loc] = x0 + damp * res_x;
                grid.y[loc] = y0 + damp * res_y;
            }
        }

        res_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle_grid(im: usize, jm: usize) -> StructuredGrid {
        let mut grid = StructuredGrid::new(im, jm);
        for j in 0..jm {
            for i in 0..im {
                let loc = grid.at(j, i);
                grid.x[loc] = i as f64 / (im - 1) as f64;
                grid.y[loc] = j as f64 / (jm - 1) as f64;
            }
        }
        grid
    }

    fn perturbed_rectangle(im: usize, jm: usize) -> StructuredGrid {
        let mut grid = rectangle_grid(im, jm);
        let loc = grid.at(jm / 2, im / 2);
        grid.x[loc] += 0.02;
        grid.y[loc] -= 0.015;
        grid
    }

    #[test]
    fn test_laplace_smooth_seed_converges_immediately() {
        // A uniform rectangle already satisfies the grid equations: the
        // first sweep must report a vanishing residual.
        let mut grid = rectangle_grid(8, 6);
        let mut metrics = GridMetrics::compute(&grid).unwrap();

        let report = EllipticSmoother::new(EllipticKind::Laplace, 1.0)
            .solve(&mut grid, &mut metrics)
            .unwrap();

        assert_eq!(report.iterations, 1);
        assert!(report.residual < RESIDUAL_EPS);
    }

    #[test]
    fn test_laplace_pulls_perturbed_node_back() {
        let mut grid = perturbed_rectangle(8, 6);
        let mut metrics = GridMetrics::compute(&grid).unwrap();

        let report = EllipticSmoother::new(EllipticKind::Laplace, 1.0)
            .solve(&mut grid, &mut metrics)
            .unwrap();

        assert!(report.iterations > 1);
        let loc = grid.at(3, 4);
        let expected_x = 4.0 / 7.0;
        let expected_y = 3.0 / 5.0;
        assert!(
            (grid.x[loc] - expected_x).abs() < 1e-4,
            "smoothed x {} should return to {}",
            grid.x[loc],
            expected_x
        );
        assert!((grid.y[loc] - expected_y).abs() < 1e-4);
    }

    #[test]
    fn test_middlecoff_matches_laplace_on_uniform_rectangle() {
        // With straight uniform boundaries the control functions vanish
        // and Middlecoff degenerates to Laplace.
        let mut grid_l = perturbed_rectangle(8, 6);
        let mut grid_m = perturbed_rectangle(8, 6);
        let mut metrics_l = GridMetrics::compute(&grid_l).unwrap();
        let mut metrics_m = GridMetrics::compute(&grid_m).unwrap();

        EllipticSmoother::new(EllipticKind::Laplace, 1.0)
            .solve(&mut grid_l, &mut metrics_l)
            .unwrap();
        EllipticSmoother::new(EllipticKind::Middlecoff, 1.0)
            .solve(&mut grid_m, &mut metrics_m)
            .unwrap();

        for loc in 0..grid_l.node_count() {
            assert!((grid_l.x[loc] - grid_m.x[loc]).abs() < 1e-12);
            assert!((grid_l.y[loc] - grid_m.y[loc]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_overrelaxation_diverges_for_both_variants() {
        for kind in [EllipticKind::Laplace, EllipticKind::Middlecoff] {
            let mut grid = perturbed_rectangle(8, 6);
            let mut metrics = GridMetrics::compute(&grid).unwrap();

            let err = EllipticSmoother::new(kind, 5.0)
                .solve(&mut grid, &mut metrics)
                .unwrap_err();
            assert!(
                matches!(err, EllipticError::Diverged { .. }),
                "{:?} with omega=5 must diverge, got {:?}",
                kind,
                err
            );
        }
    }

    #[test]
    fn test_metrics_are_refreshed_after_convergence() {
        let mut grid = perturbed_rectangle(8, 6);
        let mut metrics = GridMetrics::compute(&grid).unwrap();
        let jac_before = metrics.jacobian.clone();

        EllipticSmoother::new(EllipticKind::Laplace, 1.0)
            .solve(&mut grid, &mut metrics)
            .unwrap();

        // The displaced node skews the Jacobian of its neighbors (the
        // central stencil skips the node itself); smoothing restores it.
        let h = 1.0 / 7.0 * (1.0 / 5.0);
        let neighbor = grid.at(3, 3);
        assert!((jac_before[neighbor] - h).abs() > 1e-3);
        assert!((metrics.jacobian[neighbor] - h).abs() < 1e-4);
    }
}
