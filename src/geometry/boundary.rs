//! Construction of the four fixed boundary curves.
//!
//! Writes only boundary rows and columns of the coordinate field; the
//! interior is left for the transfinite interpolator:
//! - `eta = 0`: the extended airfoil/wake-cut curve
//! - `eta = max`: the tunnel wall (floor, inflow wall, ceiling)
//! - `ksi = 0` and `ksi = max`: radial lines on the outflow wall, from
//!   the wake-cut endpoints down to the floor and up to the ceiling
//!
//! The tunnel wall mirrors the index layout of the `eta = 0` curve so
//! that grid lines connect matching indices across the domain. Its two
//! corners on the inflow side are found from the extreme-y airfoil nodes.

use log::debug;
use thiserror::Error;

use crate::config::{GridConfig, SpacingKind, SMALL};
use crate::geometry::NodeCurve;
use crate::grid::StructuredGrid;
use crate::spacing;

/// Error type for boundary-curve construction.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The trailing edge already touches the outflow wall; there is no
    /// room for a wake cut.
    #[error("wake cut has zero length: trailing edge sits on the outflow wall")]
    ZeroLengthCut,

    /// The extreme-y search produced corners in the wrong order; the
    /// profile ordering does not match the documented convention.
    #[error("malformed profile: highest-y node {higher} not above lowest-y node {lower}")]
    ExtremaOutOfOrder { lower: usize, higher: usize },

    /// A tunnel-wall segment was assigned no nodes; its per-node slope
    /// would divide by zero.
    #[error("degenerate tunnel-wall segment between wall nodes {from} and {to}")]
    DegenerateWallSegment { from: usize, to: usize },

    /// A radial exit line has no extent between the wake cut and the
    /// tunnel floor or ceiling.
    #[error("exit plane at i={column} has zero radial length")]
    DegenerateExitPlane { column: usize },
}

/// Write all four boundary curves into the coordinate field.
pub fn build_boundaries(
    grid: &mut StructuredGrid,
    curve: &NodeCurve,
    config: &GridConfig,
) -> Result<(), BoundaryError> {
    debug_assert_eq!(curve.len(), grid.im);

    write_airfoil_row(grid, curve);
    write_tunnel_wall(grid, curve, config)?;
    write_exit_planes(grid, curve, config)?;

    debug!("boundaries written for {}x{} grid", grid.im, grid.jm);
    Ok(())
}

/// Copy the extended node curve onto the `eta = 0` row. The row is fixed
/// from here on; the elliptic smoother never touches it.
fn write_airfoil_row(grid: &mut StructuredGrid, curve: &NodeCurve) {
    for i in 0..grid.im {
        let loc = grid.at(0, i);
        grid.x[loc] = curve.x[i];
        grid.y[loc] = curve.y[i];
    }
}

/// Index of the lowest-y node over the lower-surface window.
///
/// Precondition (shared with [`highest_y_node`]): the extended curve runs
/// outflow wall -> lower surface -> leading edge -> upper surface ->
/// outflow wall, so the lower surface occupies the first half of the
/// airfoil index block `[cut_nodes, cut_nodes + airfoil_nodes)` and the
/// upper surface the second half.
pub(crate) fn lowest_y_node(curve: &NodeCurve, airfoil_nodes: usize, cut_nodes: usize) -> usize {
    let start = cut_nodes + 1;
    let end = cut_nodes + airfoil_nodes / 2;

    let mut node = start;
    for i in start..end {
        if curve.y[i] < curve.y[node] {
            node = i;
        }
    }
    node
}

/// Index of the highest-y node over the upper-surface window.
pub(crate) fn highest_y_node(curve: &NodeCurve, airfoil_nodes: usize, cut_nodes: usize) -> usize {
    let start = cut_nodes + airfoil_nodes / 2;
    let end = cut_nodes + airfoil_nodes;

    let mut node = start;
    for i in start..end {
        if curve.y[i] > curve.y[node] {
            node = i;
        }
    }
    node
}

/// Build the `eta = max` boundary: floor under the cut, floor toward the
/// inflow corner E, inflow wall E -> F, ceiling from F, ceiling under the
/// cut. Each straight segment is filled by linear interpolation with its
/// own slope.
fn write_tunnel_wall(
    grid: &mut StructuredGrid,
    curve: &NodeCurve,
    config: &GridConfig,
) -> Result<(), BoundaryError> {
    let jm = grid.jm;

    let lower = lowest_y_node(curve, config.airfoil_nodes, config.cut_nodes);
    let higher = highest_y_node(curve, config.airfoil_nodes, config.cut_nodes);
    if lower >= higher {
        return Err(BoundaryError::ExtremaOutOfOrder { lower, higher });
    }

    // Wall length to divide between the two extreme nodes: down the
    // floor, up the inflow wall, along the ceiling.
    let wall_length = curve.x[lower] + config.height + curve.x[higher];
    let delta = wall_length / (higher - lower) as f64;

    let corner_e = lower + (curve.x[lower] / delta).round() as usize;
    let corner_f = higher
        .checked_sub((curve.x[higher] / delta).round() as usize)
        .unwrap_or(0);

    if corner_e <= lower {
        return Err(BoundaryError::DegenerateWallSegment {
            from: lower,
            to: corner_e,
        });
    }
    if corner_f <= corner_e {
        return Err(BoundaryError::DegenerateWallSegment {
            from: corner_e,
            to: corner_f,
        });
    }
    if higher <= corner_f {
        return Err(BoundaryError::DegenerateWallSegment {
            from: corner_f,
            to: higher,
        });
    }

    debug!(
        "tunnel wall: lower={} E={} F={} higher={}",
        lower, corner_e, corner_f, higher
    );

    // Floor under the cut and the lower surface: project the curve down.
    for i in 0..=lower {
        let loc = grid.at(jm - 1, i);
        grid.x[loc] = curve.x[i];
        grid.y[loc] = 0.0;
    }

    // Floor from the lowest node to corner E at the inflow edge.
    let step = curve.x[lower] / (corner_e - lower) as f64;
    for i in lower + 1..=corner_e {
        let loc = grid.at(jm - 1, i);
        grid.x[loc] = curve.x[lower] - (i - lower) as f64 * step;
        grid.y[loc] = 0.0;
    }

    // Inflow wall from corner E up to corner F.
    let step = config.height / (corner_f - corner_e) as f64;
    for i in corner_e + 1..=corner_f {
        let loc = grid.at(jm - 1, i);
        grid.x[loc] = 0.0;
        grid.y[loc] = (i - corner_e) as f64 * step;
    }

    // Ceiling from corner F to the highest node.
    let step = curve.x[higher] / (higher - corner_f) as f64;
    for i in corner_f + 1..=higher {
        let loc = grid.at(jm - 1, i);
        grid.x[loc] = (i - corner_f) as f64 * step;
        grid.y[loc] = config.height;
    }

    // Ceiling above the upper surface and the cut.
    for i in higher + 1..grid.im {
        let loc = grid.at(jm - 1, i);
        grid.x[loc] = curve.x[i];
        grid.y[loc] = config.height;
    }

    Ok(())
}

/// Build the `ksi = 0` and `ksi = max` boundaries: radial lines at the
/// outflow wall from the wake-cut endpoints to floor and ceiling.
fn write_exit_planes(
    grid: &mut StructuredGrid,
    curve: &NodeCurve,
    config: &GridConfig,
) -> Result<(), BoundaryError> {
    let im = grid.im;
    let jm = grid.jm;

    let distribute = |length: f64| match config.spacing {
        SpacingKind::Uniform => spacing::uniform(jm, length),
        SpacingKind::Clustered => spacing::single_clustered(jm, length),
    };

    // ksi = 0: from the lower cut endpoint down to the floor.
    let reach = curve.y[0];
    if reach < SMALL {
        return Err(BoundaryError::DegenerateExitPlane { column: 0 });
    }
    let v = distribute(reach);
    for (j, v_j) in v.iter().enumerate() {
        let loc = grid.at(j, 0);
        grid.x[loc] = config.length;
        grid.y[loc] = curve.y[0] - v_j;
    }

    // ksi = max: from the upper cut endpoint up to the ceiling.
    let reach = config.height - curve.y[im - 1];
    if reach < SMALL {
        return Err(BoundaryError::DegenerateExitPlane { column: im - 1 });
    }
    let v = distribute(reach);
    for (j, v_j) in v.iter().enumerate() {
        let loc = grid.at(j, im - 1);
        grid.x[loc] = config.length;
        grid.y[loc] = curve.y[im - 1] + v_j;
    }

    Ok(())
}
