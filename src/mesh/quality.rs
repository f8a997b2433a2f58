//! Per-element shape quality.
//!
//! Fills the quality attributes of every element from the final
//! coordinates:
//! - *area* via the cross-product/sine formula at the second vertex; the
//!   parallelogram product already covers both halves of a quadrangle,
//!   triangles take half of it
//! - *aspect ratio* = shortest / longest edge, in `(0, 1]`
//! - *minimum angle* = smallest interior vertex angle in degrees
//! - *skewness* (quadrangles only) = shorter / longer diagonal, in `(0, 1]`

use crate::grid::StructuredGrid;
use crate::mesh::elements::Elements;

/// Compute and store the quality attributes of every element.
///
/// The tagged [`Elements`] sum is dispatched exhaustively; there is no
/// unknown-kind failure mode left to report.
pub fn analyze(elements: &mut Elements, grid: &StructuredGrid) {
    match elements {
        Elements::Quadrangles(quads) => {
            for quad in quads {
                quad.area = corner_area(grid, quad.nodes[0], quad.nodes[1], quad.nodes[2]);
                quad.aspect_ratio = aspect_ratio(grid, &quad.nodes);
                quad.minimum_angle = minimum_angle(grid, &quad.nodes);
                quad.skewness = skewness(grid, &quad.nodes);
            }
        }
        Elements::Triangles(tris) => {
            for tri in tris {
                tri.area = 0.5 * corner_area(grid, tri.nodes[0], tri.nodes[1], tri.nodes[2]);
                tri.aspect_ratio = aspect_ratio(grid, &tri.nodes);
                tri.minimum_angle = minimum_angle(grid, &tri.nodes);
            }
        }
    }
}

/// Parallelogram area spanned by the edges meeting at `cur`.
fn corner_area(grid: &StructuredGrid, prev: usize, cur: usize, next: usize) -> f64 {
    let ax = grid.x[cur] - grid.x[prev];
    let ay = grid.y[cur] - grid.y[prev];
    let bx = grid.x[cur] - grid.x[next];
    let by = grid.y[cur] - grid.y[next];

    let len_a = (ax * ax + ay * ay).sqrt();
    let len_b = (bx * bx + by * by).sqrt();
    let angle = vertex_angle(ax, ay, bx, by, len_a, len_b);

    len_a * len_b * angle.sin()
}

/// Shortest over longest polygon edge.
fn aspect_ratio(grid: &StructuredGrid, nodes: &[usize]) -> f64 {
    let mut min_side = f64::MAX;
    let mut max_side: f64 = 0.0;
    for n in 0..nodes.len() {
        let next = nodes[(n + 1) % nodes.len()];
        let dx = grid.x[nodes[n]] - grid.x[next];
        let dy = grid.y[nodes[n]] - grid.y[next];
        let side = (dx * dx + dy * dy).sqrt();
        min_side = min_side.min(side);
        max_side = max_side.max(side);
    }
    min_side / max_side
}

/// Smallest interior vertex angle, in degrees.
fn minimum_angle(grid: &StructuredGrid, nodes: &[usize]) -> f64 {
    let count = nodes.len();
    let mut min_angle = f64::MAX;
    for n in 0..count {
        let prev = nodes[(n + count - 1) % count];
        let next = nodes[(n + 1) % count];

        let ax = grid.x[prev] - grid.x[nodes[n]];
        let ay = grid.y[prev] - grid.y[nodes[n]];
        let bx = grid.x[next] - grid.x[nodes[n]];
        let by = grid.y[next] - grid.y[nodes[n]];

        let len_a = (ax * ax + ay * ay).sqrt();
        let len_b = (bx * bx + by * by).sqrt();
        let angle = vertex_angle(ax, ay, bx, by, len_a, len_b).to_degrees();
        min_angle = min_angle.min(angle);
    }
    min_angle
}

/// Shorter over longer diagonal of a quadrangle `[SE, SW, NW, NE]`.
fn skewness(grid: &StructuredGrid, nodes: &[usize; 4]) -> f64 {
    let [se, sw, nw, ne] = *nodes;

    let dx = grid.x[nw] - grid.x[se];
    let dy = grid.y[nw] - grid.y[se];
    let diag_nw_se = (dx * dx + dy * dy).sqrt();

    let dx = grid.x[sw] - grid.x[ne];
    let dy = grid.y[sw] - grid.y[ne];
    let diag_sw_ne = (dx * dx + dy * dy).sqrt();

    if diag_nw_se > diag_sw_ne {
        diag_sw_ne / diag_nw_se
    } else {
        diag_nw_se / diag_sw_ne
    }
}

/// Angle between two vectors, clamped against rounding outside the
/// arccos domain.
fn vertex_angle(ax: f64, ay: f64, bx: f64, by: f64, len_a: f64, len_b: f64) -> f64 {
    ((ax * bx + ay * by) / (len_a * len_b)).clamp(-1.0, 1.0).acos()
}
