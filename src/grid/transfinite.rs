//! Transfinite (Coons patch) interpolation of the grid interior.
//!
//! Every interior node is a bilinear blend of the four boundary curves:
//! the same-index values on the two ksi and the two eta boundaries,
//! minus the corner-weighted bilinear correction. The blending weights
//! are the normalized index fractions `i / (im-1)` and `j / (jm-1)`, so
//! the boundary values themselves are reproduced exactly where the
//! opposite weight vanishes.

use log::debug;

use crate::grid::StructuredGrid;

/// Fill all interior nodes from the boundary curves.
///
/// Boundary rows and columns must be populated; they are read, never
/// written. Purely algebraic, no failure modes.
pub fn interpolate_interior(grid: &mut StructuredGrid) {
    let im = grid.im;
    let jm = grid.jm;

    let corner_00 = grid.at(0, 0);
    let corner_0m = grid.at(0, im - 1);
    let corner_m0 = grid.at(jm - 1, 0);
    let corner_mm = grid.at(jm - 1, im - 1);

    let (x00, y00) = (grid.x[corner_00], grid.y[corner_00]);
    let (x0m, y0m) = (grid.x[corner_0m], grid.y[corner_0m]);
    let (xm0, ym0) = (grid.x[corner_m0], grid.y[corner_m0]);
    let (xmm, ymm) = (grid.x[corner_mm], grid.y[corner_mm]);

    for j in 1..jm - 1 {
        let ksi_min = grid.at(j, 0);
        let ksi_max = grid.at(j, im - 1);
        let (x_ksi_min, y_ksi_min) = (grid.x[ksi_min], grid.y[ksi_min]);
        let (x_ksi_max, y_ksi_max) = (grid.x[ksi_max], grid.y[ksi_max]);

        let f3 = (jm - 1 - j) as f64 / (jm - 1) as f64;
        let f4 = j as f64 / (jm - 1) as f64;

        for i in 1..im - 1 {
            let eta_min = grid.at(0, i);
            let eta_max = grid.at(jm - 1, i);
            let (x_eta_min, y_eta_min) = (grid.x[eta_min], grid.y[eta_min]);
            let (x_eta_max, y_eta_max) = (grid.x[eta_max], grid.y[eta_max]);

            let f1 = (im - 1 - i) as f64 / (im - 1) as f64;
            let f2 = i as f64 / (im - 1) as f64;

            let x = f1 * x_ksi_min + f2 * x_ksi_max + f3 * x_eta_min + f4 * x_eta_max
                - f1 * f3 * x00
                - f2 * f3 * x0m
                - f1 * f4 * xm0
                - f2 * f4 * xmm;
            let y = f1 * y_ksi_min + f2 * y_ksi_max + f3 * y_eta_min + f4 * y_eta_max
                - f1 * f3 * y00
                - f2 * f3 * y0m
                - f1 * f4 * ym0
                - f2 * f4 * ymm;

            let loc = grid.at(j, i);
            grid.x[loc] = x;
            grid.y[loc] = y;
        }
    }

    debug!("transfinite interpolation over {}x{} interior", im - 2, jm - 2);
}
