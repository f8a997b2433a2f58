//! Laplacian smoothing of interior mesh nodes.
//!
//! Runs after triangulation in the unstructured pipeline: every interior
//! node relaxes toward the average of its connected neighbors, with the
//! stencil matching the element kind (the SE-NW diagonal split gives
//! interior nodes six neighbors; quadrangle meshes keep the plain
//! 4-point star). Same convergence discipline as the elliptic solver:
//! sweep while the maximum residual is at or above the threshold, abort
//! when it stops shrinking.

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::SMALL;
use crate::elliptic::RESIDUAL_EPS;
use crate::grid::StructuredGrid;
use crate::mesh::elements::Elements;

/// Error type for the mesh smoother.
#[derive(Debug, Error)]
pub enum SmoothError {
    /// The smoothing relaxation factor is unset (zero).
    #[error("smoothing relaxation factor is not set")]
    RelaxationNotSet,

    /// The maximum residual stopped decreasing.
    #[error("mesh smoothing diverged after {iterations} iterations (residual {residual:.3e})")]
    Diverged { iterations: usize, residual: f64 },
}

/// Outcome of a converged smoothing pass.
#[derive(Clone, Copy, Debug)]
pub struct SmoothReport {
    /// Number of full interior sweeps.
    pub iterations: usize,
    /// Maximum absolute residual of the last sweep.
    pub residual: f64,
}

/// Relax all interior nodes toward their neighbor average.
pub fn smooth(
    grid: &mut StructuredGrid,
    elements: &Elements,
    omega: f64,
) -> Result<SmoothReport, SmoothError> {
    if omega < SMALL {
        return Err(SmoothError::RelaxationNotSet);
    }

    let mut res_max = RESIDUAL_EPS;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let res_old = res_max;
        res_max = match elements {
            Elements::Triangles(_) => sweep_triangle(grid, omega),
            Elements::Quadrangles(_) => sweep_quadrangle(grid, omega),
        };
        debug!("smoothing sweep {}: max residual {:.3e}", iterations, res_max);

        if res_max < RESIDUAL_EPS {
            break;
        }
        if !res_max.is_finite() || (iterations > 1 && res_max >= res_old) {
            warn!(
                "mesh smoothing diverged after {} iterations, residual {:.3e}",
                iterations, res_max
            );
            return Err(SmoothError::Diverged {
                iterations,
                residual: res_max,
            });
        }
    }

    info!(
        "mesh smoothing converged after {} iterations, residual {:.3e}",
        iterations, res_max
    );
    Ok(SmoothReport {
        iterations,
        residual: res_max,
    })
}

/// 6-neighbor sweep for the triangle connectivity (S, W, NW, N, E, SE).
fn sweep_triangle(grid: &mut StructuredGrid, omega: f64) -> f64 {
    let mut res_max: f64 = 0.0;
    for j in 1..grid.jm - 1 {
        for i in 1..grid.im - 1 {
            let node = grid.at(j, i);
            let neighbors = [
                grid.at(j - 1, i),
                grid.at(j, i - 1),
                grid.at(j + 1, i - 1),
                grid.at(j + 1, i),
                grid.at(j, i + 1),
                grid.at(j - 1, i + 1),
            ];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for &n in &neighbors {
                sum_x += grid.x[n];
                sum_y += grid.y[n];
            }
            let res_x = (sum_x - 6.0 * grid.x[node]) / 6.0;
            let res_y = (sum_y - 6.0 * grid.y[node]) / 6.0;

            res_max = res_max.max(res_x.abs()).max(res_y.abs());
            grid.x[node] += omega * res_x;
            grid.y[node] += omega * res_y;
        }
    }
    res_max
}

/// 4-neighbor sweep for the quadrangle connectivity (S, W, N, E).
fn sweep_quadrangle(grid: &mut StructuredGrid, omega: f64) -> f64 {
    let mut res_max: f64 = 0.0;
    for j in 1..grid.jm - 1 {
        for i in 1..grid.im - 1 {
            let node = grid.at(j, i);
            let neighbors = [
                grid.at(j - 1, i),
                grid.at(j, i - 1),
                grid.at(j + 1, i),
                grid.at(j, i + 1),
            ];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for &n in &neighbors {
                sum_x += grid.x[n];
                sum_y += grid.y[n];
            }
            let res_x = (sum_x - 4.0 * grid.x[node]) / 4.0;
            let res_y = (sum_y - 4.0 * grid.y[node]) / 4.0;

            res_max = res_max.max(res_x.abs()).max(res_y.abs());
            grid.x[node] += omega * res_x;
            grid.y[node] += omega * res_y;
        }
    }
    res_max
}
