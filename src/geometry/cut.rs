//! Wake-cut extension of the airfoil node curve.
//!
//! The cut is a straight line from the trailing edge to the outflow wall
//! at angle `-alpha` from the chord, traversed by both branches of the
//! C-topology: the extended curve runs outflow wall -> lower trailing
//! edge -> airfoil surface -> upper trailing edge -> outflow wall, and
//! becomes the `eta = 0` boundary row of the grid.

use log::debug;

use crate::config::{GridConfig, SpacingKind, SMALL};
use crate::geometry::boundary::BoundaryError;
use crate::geometry::NodeCurve;
use crate::spacing;

/// Extend the resampled airfoil curve with the wake cut on both sides.
///
/// Consumes the `airfoil_nodes`-long curve and returns the extended curve
/// of length `im = airfoil_nodes + 2 * cut_nodes`. One spacing value more
/// than requested is generated and the first is skipped: the cut starts
/// on the trailing edge, which already exists as an airfoil node.
pub fn extend_with_cut(curve: NodeCurve, config: &GridConfig) -> Result<NodeCurve, BoundaryError> {
    let n1 = curve.len();
    let n2 = config.cut_nodes;
    let im = n1 + 2 * n2;

    // Cut direction: from the trailing edge to the outflow wall, dropped
    // by the angle of attack. Assumes alpha is small enough that the cut
    // meets the outflow wall rather than floor or ceiling.
    let dx = config.length - curve.x[0];
    let dy = dx * (-config.alpha_deg.to_radians()).tan();
    let cut_length = (dx * dx + dy * dy).sqrt();
    if cut_length < SMALL {
        return Err(BoundaryError::ZeroLengthCut);
    }

    let v = match config.spacing {
        SpacingKind::Uniform => spacing::uniform(n2 + 1, cut_length),
        SpacingKind::Clustered => spacing::single_clustered(n2 + 1, cut_length),
    };

    let mut x = vec![0.0; im];
    let mut y = vec![0.0; im];

    for i in 0..n2 {
        let t = v[i + 1] / cut_length;

        // Lower branch, stored in reverse so index 0 sits on the wall.
        x[n2 - 1 - i] = curve.x[0] + t * dx;
        y[n2 - 1 - i] = curve.y[0] + t * dy;

        // Upper branch, walking from the trailing edge out to the wall.
        x[n1 + n2 + i] = curve.x[n1 - 1] + t * dx;
        y[n1 + n2 + i] = curve.y[n1 - 1] + t * dy;
    }

    for i in 0..n1 {
        x[n2 + i] = curve.x[i];
        y[n2 + i] = curve.y[i];
    }

    debug!(
        "wake cut: {} -> {} nodes, cut length {:.6}",
        n1, im, cut_length
    );

    Ok(NodeCurve { x, y })
}
