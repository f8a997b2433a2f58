//! Middlecoff control functions.
//!
//! The control functions `phi` and `psi` are source terms that force grid
//! lines to stay orthogonal at the boundaries. `phi` is evaluated from
//! the tangential first and second ksi-derivatives along the two eta
//! boundaries, `psi` from the eta-derivatives along the two ksi
//! boundaries; both are then interpolated linearly across the interior
//! with the same index-fraction weights as the transfinite interpolator.

use crate::config::SMALL;
use crate::elliptic::EllipticError;
use crate::grid::{GridMetrics, StructuredGrid};

/// Interior control-function fields, one value per node.
#[derive(Clone, Debug)]
pub(crate) struct ControlFunctions {
    phi: Vec<f64>,
    psi: Vec<f64>,
}

impl ControlFunctions {
    /// Evaluate the boundary control functions and interpolate them
    /// across the interior.
    ///
    /// The metrics must describe the current (algebraic) coordinates.
    /// A vanishing tangential derivative on a boundary node makes the
    /// normalization impossible and is reported as
    /// [`EllipticError::ZeroTangent`].
    pub(crate) fn compute(
        grid: &StructuredGrid,
        metrics: &GridMetrics,
    ) -> Result<Self, EllipticError> {
        let im = grid.im;
        let jm = grid.jm;

        let mut phi = vec![0.0; grid.node_count()];
        let mut psi = vec![0.0; grid.node_count()];

        // phi along the two eta boundaries.
        for i in 1..im - 1 {
            for j in [0, jm - 1] {
                let loc = grid.at(j, i);
                let x_ksi = metrics.x_ksi[loc];
                let y_ksi = metrics.y_ksi[loc];
                let tangent = x_ksi * x_ksi + y_ksi * y_ksi;
                if tangent < SMALL {
                    return Err(EllipticError::ZeroTangent { j, i });
                }
                phi[loc] =
                    -(x_ksi * metrics.x_ksi_ksi[loc] + y_ksi * metrics.y_ksi_ksi[loc]) / tangent;
            }
        }

        // psi along the two ksi boundaries.
        for j in 1..jm - 1 {
            for i in [0, im - 1] {
                let loc = grid.at(j, i);
                let x_eta = metrics.x_eta[loc];
                let y_eta = metrics.y_eta[loc];
                let tangent = x_eta * x_eta + y_eta * y_eta;
                if tangent < SMALL {
                    return Err(EllipticError::ZeroTangent { j, i });
                }
                psi[loc] =
                    -(x_eta * metrics.x_eta_eta[loc] + y_eta * metrics.y_eta_eta[loc]) / tangent;
            }
        }

        // Interpolate between opposing boundaries with index fractions.
        for j in 1..jm - 1 {
            let ksi_min = grid.at(j, 0);
            let ksi_max = grid.at(j, im - 1);
            let jf1 = (jm - 1 - j) as f64 / (jm - 1) as f64;
            let jf2 = j as f64 / (jm - 1) as f64;

            for i in 1..im - 1 {
                let loc = grid.at(j, i);
                let eta_min = grid.at(0, i);
                let eta_max = grid.at(jm - 1, i);
                let if1 = (im - 1 - i) as f64 / (im - 1) as f64;
                let if2 = i as f64 / (im - 1) as f64;

                phi[loc] = jf1 * phi[eta_min] + jf2 * phi[eta_max];
                psi[loc] = if1 * psi[ksi_min] + if2 * psi[ksi_max];
            }
        }

        Ok(Self { phi, psi })
    }

    #[inline]
    pub(crate) fn phi(&self, loc: usize) -> f64 {
        self.phi[loc]
    }

    #[inline]
    pub(crate) fn psi(&self, loc: usize) -> f64 {
        self.psi[loc]
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

    #[test]
    fn test_control_vanishes_on_straight_uniform_boundaries() {
        let grid = rectangle_grid(6, 5);
        let metrics = GridMetrics::compute(&grid).unwrap();
        let control = ControlFunctions::compute(&grid, &metrics).unwrap();

        for loc in 0..grid.node_count() {
            assert!(
                control.phi(loc).abs() < 1e-12 && control.psi(loc).abs() < 1e-12,
                "uniform straight boundaries need no forcing, got phi={} psi={}",
                control.phi(loc),
                control.psi(loc)
            );
        }
    }

    #[test]
    fn test_stretched_boundary_forces_against_the_stretch() {
        // Quadratic stretching along the eta = 0 boundary: nodes crowd
        // toward ksi = 0, so phi must be negative (pushing back).
        let mut grid = rectangle_grid(7, 4);
        for j in 0..grid.jm {
            for i in 0..grid.im {
                let loc = grid.at(j, i);
                let s = i as f64 / (grid.im - 1) as f64;
                grid.x[loc] = s * s * 0.5 + s * 0.5;
            }
        }
        let metrics = GridMetrics::compute(&grid).unwrap();
        let control = ControlFunctions::compute(&grid, &metrics).unwrap();

        for i in 1..grid.im - 1 {
            let loc = grid.at(0, i);
            assert!(
                control.phi(loc) < 0.0,
                "phi at i={} should oppose the stretch, got {}",
                i,
                control.phi(loc)
            );
        }
    }

    #[test]
    fn test_zero_tangent_is_reported() {
        let grid = rectangle_grid(5, 4);
        let mut metrics = GridMetrics::compute(&grid).unwrap();

        // Degenerate tangential derivative at one boundary node.
        let loc = grid.at(0, 2);
        metrics.x_ksi[loc] = 0.0;
        metrics.y_ksi[loc] = 0.0;

        let err = ControlFunctions::compute(&grid, &metrics).unwrap_err();
        assert!(matches!(err, EllipticError::ZeroTangent { j: 0, i: 2 }));
    }
}
