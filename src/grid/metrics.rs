//! Differential metrics of the coordinate transformation.
//!
//! For every node: first and second derivatives of `(x, y)` with respect
//! to `(ksi, eta)`, the Jacobian `J = x_ksi * y_eta - y_ksi * x_eta` and
//! the inverse-metric terms. Central differencing in the interior,
//! one-sided at the index-grid edges; second derivatives are zero on the
//! edges (a one-sided stencil cannot form them) and the 4-point cross
//! stencil is zero on any edge row or column.
//!
//! The whole bundle is derived data: it is recomputed from scratch
//! whenever the coordinate field changes.

use thiserror::Error;

use crate::grid::StructuredGrid;

/// Jacobians below this magnitude count as degenerate cells.
const JACOBIAN_EPS: f64 = 1e-12;

/// Error type for the metrics computation.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The transformation is degenerate (collapsed or inverted cell).
    #[error("degenerate Jacobian {jacobian:.3e} at node (j={j}, i={i})")]
    DegenerateJacobian { j: usize, i: usize, jacobian: f64 },
}

/// Per-node derivative bundle of the grid transformation.
#[derive(Clone, Debug)]
pub struct GridMetrics {
    /// dx/dksi per node.
    pub x_ksi: Vec<f64>,
    /// dx/deta per node.
    pub x_eta: Vec<f64>,
    /// dy/dksi per node.
    pub y_ksi: Vec<f64>,
    /// dy/deta per node.
    pub y_eta: Vec<f64>,

    /// d2x/dksi2 per node (zero on ksi edges).
    pub x_ksi_ksi: Vec<f64>,
    /// d2x/deta2 per node (zero on eta edges).
    pub x_eta_eta: Vec<f64>,
    /// d2x/dksi deta per node (zero on any edge).
    pub x_ksi_eta: Vec<f64>,
    /// d2y/dksi2 per node.
    pub y_ksi_ksi: Vec<f64>,
    /// d2y/deta2 per node.
    pub y_eta_eta: Vec<f64>,
    /// d2y/dksi deta per node.
    pub y_ksi_eta: Vec<f64>,

    /// dksi/dx per node (`y_eta / J`).
    pub ksi_x: Vec<f64>,
    /// dksi/dy per node (`-x_eta / J`).
    pub ksi_y: Vec<f64>,
    /// deta/dx per node (`-y_ksi / J`).
    pub eta_x: Vec<f64>,
    /// deta/dy per node (`x_ksi / J`).
    pub eta_y: Vec<f64>,

    /// Jacobian determinant per node; non-zero everywhere by contract.
    pub jacobian: Vec<f64>,
}

impl GridMetrics {
    /// Compute the full metrics bundle from the current coordinates.
    ///
    /// Fails with [`MetricsError::DegenerateJacobian`] at the first node
    /// whose Jacobian vanishes; a degenerate cell must never propagate
    /// silently into the inverse metrics.
    pub fn compute(grid: &StructuredGrid) -> Result<Self, MetricsError> {
        let im = grid.im;
        let jm = grid.jm;
        let size = grid.node_count();
        let dksi = grid.ksi_delta;
        let deta = grid.eta_delta;

        let mut m = Self {
            x_ksi: vec![0.0; size],
            x_eta: vec![0.0; size],
            y_ksi: vec![0.0; size],
            y_eta: vec![0.0; size],
            x_ksi_ksi: vec![0.0; size],
            x_eta_eta: vec![0.0; size],
            x_ksi_eta: vec![0.0; size],
            y_ksi_ksi: vec![0.0; size],
            y_eta_eta: vec![0.0; size],
            y_ksi_eta: vec![0.0; size],
            ksi_x: vec![0.0; size],
            ksi_y: vec![0.0; size],
            eta_x: vec![0.0; size],
            eta_y: vec![0.0; size],
            jacobian: vec![0.0; size],
        };

        for j in 0..jm {
            for i in 0..im {
                let loc = grid.at(j, i);

                let (x_ksi, y_ksi, x_ksi_ksi, y_ksi_ksi) = if i == 0 {
                    // Forward differencing on the ksi edge.
                    let up = grid.at(j, i + 1);
                    (
                        (grid.x[up] - grid.x[loc]) / dksi,
                        (grid.y[up] - grid.y[loc]) / dksi,
                        0.0,
                        0.0,
                    )
                } else if i == im - 1 {
                    // Backward differencing.
                    let down = grid.at(j, i - 1);
                    (
                        (grid.x[loc] - grid.x[down]) / dksi,
                        (grid.y[loc] - grid.y[down]) / dksi,
                        0.0,
                        0.0,
                    )
                } else {
                    let up = grid.at(j, i + 1);
                    let down = grid.at(j, i - 1);
                    (
                        (grid.x[up] - grid.x[down]) / (2.0 * dksi),
                        (grid.y[up] - grid.y[down]) / (2.0 * dksi),
                        (grid.x[up] - 2.0 * grid.x[loc] + grid.x[down]) / (dksi * dksi),
                        (grid.y[up] - 2.0 * grid.y[loc] + grid.y[down]) / (dksi * dksi),
                    )
                };

                let (x_eta, y_eta, x_eta_eta, y_eta_eta) = if j == 0 {
                    let up = grid.at(j + 1, i);
                    (
                        (grid.x[up] - grid.x[loc]) / deta,
                        (grid.y[up] - grid.y[loc]) / deta,
                        0.0,
                        0.0,
                    )
                } else if j == jm - 1 {
                    let down = grid.at(j - 1, i);
                    (
                        (grid.x[loc] - grid.x[down]) / deta,
                        (grid.y[loc] - grid.y[down]) / deta,
                        0.0,
                        0.0,
                    )
                } else {
                    let up = grid.at(j + 1, i);
                    let down = grid.at(j - 1, i);
                    (
                        (grid.x[up] - grid.x[down]) / (2.0 * deta),
                        (grid.y[up] - grid.y[down]) / (2.0 * deta),
                        (grid.x[up] - 2.0 * grid.x[loc] + grid.x[down]) / (deta * deta),
                        (grid.y[up] - 2.0 * grid.y[loc] + grid.y[down]) / (deta * deta),
                    )
                };

                let (x_ksi_eta, y_ksi_eta) = if i > 0 && i < im - 1 && j > 0 && j < jm - 1 {
                    let pp = grid.at(j + 1, i + 1);
                    let mm = grid.at(j - 1, i - 1);
                    let mp = grid.at(j + 1, i - 1);
                    let pm = grid.at(j - 1, i + 1);
                    (
                        (grid.x[pp] + grid.x[mm] - grid.x[mp] - grid.x[pm]) / (4.0 * dksi * deta),
                        (grid.y[pp] + grid.y[mm] - grid.y[mp] - grid.y[pm]) / (4.0 * dksi * deta),
                    )
                } else {
                    (0.0, 0.0)
                };

                let jac = x_ksi * y_eta - y_ksi * x_eta;
                if jac.abs() < JACOBIAN_EPS {
                    return Err(MetricsError::DegenerateJacobian { j, i, jacobian: jac });
                }

                m.x_ksi[loc] = x_ksi;
                m.x_eta[loc] = x_eta;
                m.y_ksi[loc] = y_ksi;
                m.y_eta[loc] = y_eta;
                m.x_ksi_ksi[loc] = x_ksi_ksi;
                m.x_eta_eta[loc] = x_eta_eta;
                m.x_ksi_eta[loc] = x_ksi_eta;
                m.y_ksi_ksi[loc] = y_ksi_ksi;
                m.y_eta_eta[loc] = y_eta_eta;
                m.y_ksi_eta[loc] = y_ksi_eta;
                m.ksi_x[loc] = y_eta / jac;
                m.ksi_y[loc] = -x_eta / jac;
                m.eta_x[loc] = -y_ksi / jac;
                m.eta_y[loc] = x_ksi / jac;
                m.jacobian[loc] = jac;
            }
        }

        Ok(m)
    }
}
