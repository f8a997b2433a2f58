//! # tunnelgrid
//!
//! Boundary-conforming structured grid generation around an airfoil in a
//! rectangular wind tunnel, for use as a discretization mesh in flow
//! solvers.
//!
//! The crate provides the geometric and numerical core:
//! - Airfoil curve fitting (natural cubic splines over arclength)
//! - Boundary-curve synthesis (wake cut, tunnel wall, exit planes)
//! - Algebraic initialization (transfinite/Coons interpolation)
//! - Elliptic smoothing (Laplace and Middlecoff control-function variants)
//! - Differential metrics (derivatives, Jacobian, inverse metrics)
//! - Element generation (quadrangles or triangles) with quality assessment
//!
//! Everything runs sequentially through [`pipeline::generate`], which
//! consumes a validated [`GridConfig`] and yields the [`Mesh`] aggregate
//! for external exporters. Command-line parsing, configuration file I/O
//! and visualization writers are external collaborators.

pub mod config;
pub mod elliptic;
pub mod geometry;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod spacing;
pub mod tridiagonal;

// Re-export the main types for convenience
pub use config::{AirfoilProfile, ConfigError, GridConfig, GridKind, SpacingKind, SMALL};
pub use elliptic::{
    EllipticError, EllipticKind, EllipticSmoother, SolveReport, SolveState, RESIDUAL_EPS,
};
pub use geometry::{
    build_boundaries, extend_with_cut, BoundaryError, CubicSpline, NodeCurve, SplineError,
};
pub use grid::{interpolate_interior, GridMetrics, MetricsError, StructuredGrid};
pub use mesh::{
    analyze, average_at_nodes, Elements, NodeQuality, Quadrangle, SmoothError, SmoothReport,
    Triangle,
};
pub use pipeline::{generate, GridGenError, Mesh};
pub use tridiagonal::TridiagonalError;
