//! Grid generation pipeline.
//!
//! Runs the stages in their mandatory order — geometry setup, boundary
//! synthesis, computational space, transfinite interpolation, metrics,
//! optional elliptic smoothing, element generation, quality — and
//! aggregates the results into the [`Mesh`] handed to exporters.
//!
//! The pipeline is fail-fast: the first stage error aborts the run and
//! surfaces as a [`GridGenError`] naming the failing stage; partial
//! results are dropped.

use log::info;
use thiserror::Error;

use crate::config::{AirfoilProfile, ConfigError, GridConfig, GridKind, SMALL};
use crate::elliptic::{EllipticError, EllipticKind, EllipticSmoother};
use crate::geometry::{build_boundaries, extend_with_cut, BoundaryError, CubicSpline, SplineError};
use crate::grid::{interpolate_interior, GridMetrics, MetricsError, StructuredGrid};
use crate::mesh::{self, Elements, NodeQuality, SmoothError};

/// Error type of the whole pipeline; each variant names the stage that
/// failed.
#[derive(Debug, Error)]
pub enum GridGenError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("spline fit: {0}")]
    Spline(#[from] SplineError),

    #[error("boundary construction: {0}")]
    Boundary(#[from] BoundaryError),

    #[error("metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("elliptic smoothing: {0}")]
    Elliptic(#[from] EllipticError),

    #[error("mesh smoothing: {0}")]
    Smooth(#[from] SmoothError),
}

/// Final grid artifact: coordinates, metrics, elements and node-averaged
/// quality, laid out so exporters can iterate node-by-node and
/// element-by-element without re-deriving anything.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Index grid with logical and physical coordinates.
    pub grid: StructuredGrid,
    /// Differential metrics of the final coordinates.
    pub metrics: GridMetrics,
    /// Element collection with quality attributes.
    pub elements: Elements,
    /// Element quality averaged at the nodes.
    pub node_quality: NodeQuality,
}

/// Generate the grid described by `config`.
pub fn generate(config: &GridConfig) -> Result<Mesh, GridGenError> {
    config.validate()?;

    // Geometry setup: position the profile, fit and resample the spline,
    // extend the curve with the wake cut.
    let profile = AirfoilProfile::from_config(config);
    let spline = CubicSpline::fit(&profile)?;
    let curve = spline.resample(config.airfoil_nodes, config.spacing);
    let curve = extend_with_cut(curve, config)?;
    info!(
        "geometry: {} profile points -> {} boundary nodes",
        profile.len(),
        curve.len()
    );

    // Boundary curves, computational space, algebraic interior.
    let mut grid = StructuredGrid::new(config.im(), config.jm());
    build_boundaries(&mut grid, &curve, config)?;
    grid.fill_computational_space();
    interpolate_interior(&mut grid);
    let mut metrics = GridMetrics::compute(&grid)?;
    info!("algebraic grid ready ({}x{})", grid.im, grid.jm);

    // Elliptic smoothing; skipped entirely for the algebraic grid or a
    // zero relaxation factor.
    let elliptic_kind = match config.grid_kind {
        GridKind::Algebraic => None,
        GridKind::Laplace => Some(EllipticKind::Laplace),
        GridKind::Middlecoff | GridKind::Unstructured => Some(EllipticKind::Middlecoff),
    };
    if let Some(kind) = elliptic_kind {
        if config.omega_elliptic > SMALL {
            let report =
                EllipticSmoother::new(kind, config.omega_elliptic).solve(&mut grid, &mut metrics)?;
            info!(
                "elliptic stage done in {} iterations (residual {:.3e})",
                report.iterations, report.residual
            );
        }
    }

    // Element generation; the unstructured path splits into triangles,
    // smooths the nodes and refreshes the metrics afterwards.
    let mut elements = match config.grid_kind {
        GridKind::Unstructured => {
            let elements = Elements::triangulate(&grid);
            mesh::smooth(&mut grid, &elements, config.omega_smooth)?;
            metrics = GridMetrics::compute(&grid)?;
            elements
        }
        _ => Elements::quadrangulate(&grid),
    };
    info!("{} elements generated", elements.len());

    // Quality assessment on the final coordinates.
    mesh::analyze(&mut elements, &grid);
    let node_quality = mesh::average_at_nodes(&grid, &elements);

    Ok(Mesh {
        grid,
        metrics,
        elements,
        node_quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn test_algebraic_pipeline_produces_a_full_mesh() {
        let config = test_config();
        let mesh = generate(&config).unwrap();

        let nodes = config.im() * config.jm();
        assert_eq!(mesh.grid.node_count(), nodes);
        assert_eq!(mesh.metrics.jacobian.len(), nodes);
        assert_eq!(mesh.elements.len(), (config.im() - 1) * (config.jm() - 1));
        assert_eq!(mesh.node_quality.area.len(), nodes);

        // The Jacobian contract holds everywhere.
        for loc in 0..nodes {
            assert!(mesh.metrics.jacobian[loc] != 0.0);
        }
    }

    #[test]
    fn test_unstructured_pipeline_triangulates() {
        let mut config = test_config();
        config.grid_kind = GridKind::Unstructured;
        config.omega_smooth = 0.5;

        let mesh = generate(&config).unwrap();

        assert!(matches!(mesh.elements, Elements::Triangles(_)));
        assert_eq!(
            mesh.elements.len(),
            2 * (config.im() - 1) * (config.jm() - 1)
        );
    }

    #[test]
    fn test_invalid_config_fails_before_any_geometry() {
        let mut config = test_config();
        config.normal_nodes = 0;

        assert!(matches!(
            generate(&config),
            Err(GridGenError::Config(ConfigError::TooFewNormalNodes(0)))
        ));
    }

    #[test]
    fn test_unstructured_without_smoothing_factor_fails() {
        let mut config = test_config();
        config.grid_kind = GridKind::Unstructured;
        config.omega_smooth = 0.0;

        assert!(matches!(
            generate(&config),
            Err(GridGenError::Smooth(SmoothError::RelaxationNotSet))
        ));
    }
}
