//! Physical geometry construction.
//!
//! Turns the positioned airfoil profile into the boundary curves of the
//! grid:
//! - cubic-spline fit and clustered resampling of the airfoil surface
//! - wake-cut extension closing the C-topology around the airfoil
//! - the four fixed boundary curves of the tunnel domain

pub mod boundary;
pub mod cut;
pub mod spline;

pub use boundary::{build_boundaries, BoundaryError};
pub use cut::extend_with_cut;
pub use spline::{CubicSpline, SplineError};

/// Resampled boundary node curve.
///
/// Holds the airfoil surface nodes after spline resampling; the wake-cut
/// step replaces it with the extended curve of length `im` and it is
/// frozen afterwards.
#[derive(Clone, Debug, Default)]
pub struct NodeCurve {
    /// Node x coordinates.
    pub x: Vec<f64>,
    /// Node y coordinates.
    pub y: Vec<f64>,
}

impl NodeCurve {
    /// Number of nodes on the curve.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the curve holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
