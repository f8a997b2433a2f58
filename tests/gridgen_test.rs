//! End-to-end grid generation scenarios.
//!
//! Exercises the full pipeline on a small symmetric airfoil in a 2 x 1
//! tunnel and checks the algebraic grid against hand-evaluated values:
//! the boundary row must equal the resampled-and-cut node sequence, and
//! the interior must equal the bilinear transfinite blend of the four
//! boundary curves.

use approx::assert_relative_eq;
use tunnelgrid::{
    extend_with_cut, generate, AirfoilProfile, CubicSpline, Elements, EllipticError, GridConfig,
    GridGenError, GridKind, SpacingKind,
};

/// 5-point symmetric airfoil, 9 surface nodes, 2 cut nodes, 4 layers,
/// uniform spacing, zero angle of attack, elliptic relaxation disabled.
fn reference_config() -> GridConfig {
    GridConfig {
        grid_kind: GridKind::Algebraic,
        spacing: SpacingKind::Uniform,
        airfoil_nodes: 9,
        cut_nodes: 2,
        normal_nodes: 4,
        omega_elliptic: 0.0,
        omega_smooth: 0.0,
        chord: 1.0,
        alpha_deg: 0.0,
        length: 2.0,
        height: 1.0,
        half_profile: vec![
            (0.0, 0.0),
            (25.0, 5.0),
            (50.0, 6.0),
            (75.0, 4.0),
            (100.0, 0.0),
        ],
    }
}

#[test]
fn boundary_row_equals_resampled_and_cut_sequence() {
    let config = reference_config();
    let mesh = generate(&config).unwrap();

    // Rebuild the expected node sequence through the geometry stages.
    let profile = AirfoilProfile::from_config(&config);
    let spline = CubicSpline::fit(&profile).unwrap();
    let curve = spline.resample(config.airfoil_nodes, config.spacing);
    let curve = extend_with_cut(curve, &config).unwrap();

    assert_eq!(curve.len(), config.im());
    for i in 0..config.im() {
        let loc = mesh.grid.node_index(0, i).unwrap();
        assert_eq!(
            mesh.grid.x[loc], curve.x[i],
            "boundary x mismatch at i={}",
            i
        );
        assert_eq!(
            mesh.grid.y[loc], curve.y[i],
            "boundary y mismatch at i={}",
            i
        );
    }
}

#[test]
fn interior_equals_hand_evaluated_transfinite_blend() {
    let config = reference_config();
    let mesh = generate(&config).unwrap();
    let grid = &mesh.grid;
    let (im, jm) = (config.im(), config.jm());

    let at = |j: usize, i: usize| grid.node_index(j, i).unwrap();

    for j in 1..jm - 1 {
        for i in 1..im - 1 {
            let f1 = (im - 1 - i) as f64 / (im - 1) as f64;
            let f2 = i as f64 / (im - 1) as f64;
            let f3 = (jm - 1 - j) as f64 / (jm - 1) as f64;
            let f4 = j as f64 / (jm - 1) as f64;

            let expected_x = f1 * grid.x[at(j, 0)]
                + f2 * grid.x[at(j, im - 1)]
                + f3 * grid.x[at(0, i)]
                + f4 * grid.x[at(jm - 1, i)]
                - f1 * f3 * grid.x[at(0, 0)]
                - f2 * f3 * grid.x[at(0, im - 1)]
                - f1 * f4 * grid.x[at(jm - 1, 0)]
                - f2 * f4 * grid.x[at(jm - 1, im - 1)];
            let expected_y = f1 * grid.y[at(j, 0)]
                + f2 * grid.y[at(j, im - 1)]
                + f3 * grid.y[at(0, i)]
                + f4 * grid.y[at(jm - 1, i)]
                - f1 * f3 * grid.y[at(0, 0)]
                - f2 * f3 * grid.y[at(0, im - 1)]
                - f1 * f4 * grid.y[at(jm - 1, 0)]
                - f2 * f4 * grid.y[at(jm - 1, im - 1)];

            let loc = at(j, i);
            assert_relative_eq!(grid.x[loc], expected_x, epsilon = 1e-13);
            assert_relative_eq!(grid.y[loc], expected_y, epsilon = 1e-13);
        }
    }
}

#[test]
fn quality_invariants_hold_on_the_generated_mesh() {
    let mesh = generate(&reference_config()).unwrap();

    let Elements::Quadrangles(quads) = &mesh.elements else {
        panic!("algebraic pipeline must produce quadrangles");
    };
    for (n, quad) in quads.iter().enumerate() {
        assert!(quad.area > 0.0, "element {} has non-positive area", n);
        assert!(
            quad.aspect_ratio > 0.0 && quad.aspect_ratio <= 1.0,
            "element {} aspect ratio {} out of (0, 1]",
            n,
            quad.aspect_ratio
        );
        assert!(
            quad.skewness > 0.0 && quad.skewness <= 1.0,
            "element {} skewness {} out of (0, 1]",
            n,
            quad.skewness
        );
        assert!(
            quad.minimum_angle > 0.0 && quad.minimum_angle < 180.0,
            "element {} minimum angle {} out of (0, 180)",
            n,
            quad.minimum_angle
        );
        for &node in &quad.nodes {
            assert!(node < mesh.grid.node_count());
        }
    }
}

#[test]
fn jacobian_is_nonzero_everywhere() {
    let mesh = generate(&reference_config()).unwrap();
    for j in 0..mesh.grid.jm {
        for i in 0..mesh.grid.im {
            let loc = mesh.grid.node_index(j, i).unwrap();
            assert!(
                mesh.metrics.jacobian[loc].abs() > 0.0,
                "zero Jacobian at ({}, {})",
                j,
                i
            );
        }
    }
}

#[test]
fn elliptic_smoothing_preserves_the_airfoil_row() {
    let algebraic = generate(&reference_config()).unwrap();

    let mut config = reference_config();
    config.grid_kind = GridKind::Laplace;
    config.omega_elliptic = 1.0;
    let smoothed = generate(&config).unwrap();

    // The eta = 0 boundary is fixed once constructed; smoothing must not
    // move it.
    for i in 0..smoothed.grid.im {
        let loc = smoothed.grid.node_index(0, i).unwrap();
        assert_eq!(smoothed.grid.x[loc], algebraic.grid.x[loc]);
        assert_eq!(smoothed.grid.y[loc], algebraic.grid.y[loc]);
    }

    // The interior did move.
    let probe = smoothed.grid.node_index(2, smoothed.grid.im / 2).unwrap();
    assert!(
        (smoothed.grid.x[probe] - algebraic.grid.x[probe]).abs() > 0.0
            || (smoothed.grid.y[probe] - algebraic.grid.y[probe]).abs() > 0.0
    );
}

#[test]
fn divergence_is_an_error_for_both_variants() {
    // Gross over-relaxation blows the solve up. The original program let
    // the Middlecoff variant continue after detecting divergence while
    // Laplace aborted; both abort here.
    for kind in [GridKind::Laplace, GridKind::Middlecoff] {
        let mut config = reference_config();
        config.grid_kind = kind;
        config.omega_elliptic = 5.0;

        let err = generate(&config).unwrap_err();
        assert!(
            matches!(
                err,
                GridGenError::Elliptic(EllipticError::Diverged { .. })
            ),
            "{:?} with omega=5 should diverge, got: {:?}",
            kind,
            err
        );
    }
}

#[test]
fn clustered_spacing_produces_a_valid_mesh() {
    let mut config = reference_config();
    config.spacing = SpacingKind::Clustered;
    config.airfoil_nodes = 17;
    config.cut_nodes = 4;
    config.normal_nodes = 6;

    let mesh = generate(&config).unwrap();

    assert_eq!(mesh.grid.im, 17 + 2 * 4);
    assert_eq!(mesh.grid.jm, 6);
    assert_eq!(mesh.elements.len(), (mesh.grid.im - 1) * (mesh.grid.jm - 1));
}
