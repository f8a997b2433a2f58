//! Grid generation configuration and airfoil profile preparation.
//!
//! [`GridConfig`] is the record handed in by an external loader (file
//! parsing is not this crate's concern); it carries serde derives so any
//! loader format works. [`GridConfig::validate`] enforces the structural
//! invariants of the index grid before any geometry is built.
//!
//! [`AirfoilProfile`] turns the raw half-profile samples (percent of
//! chord) into the closed profile positioned inside the tunnel: mirrored
//! about the chord line, scaled by the chord, rotated by the angle of
//! attack and offset into the tunnel interior.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometric tolerance shared across the crate: lengths and relaxation
/// factors below this are treated as zero.
pub const SMALL: f64 = 1e-7;

/// Which grid the pipeline produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridKind {
    /// Transfinite interpolation only; no elliptic relaxation.
    Algebraic,
    /// Elliptic relaxation without control functions.
    Laplace,
    /// Elliptic relaxation with Middlecoff boundary control functions.
    Middlecoff,
    /// Middlecoff-smoothed grid split into triangles and re-smoothed.
    Unstructured,
}

/// Node spacing selector for the airfoil, cut and radial distributions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacingKind {
    /// Constant step everywhere.
    Uniform,
    /// Sine clustering on the airfoil, exponential clustering on the cut
    /// and the radial exit lines.
    Clustered,
}

/// Error type for configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("need at least 2 airfoil nodes, got {0}")]
    TooFewAirfoilNodes(usize),

    #[error("need at least 1 wake-cut node, got {0}")]
    TooFewCutNodes(usize),

    #[error("need at least 2 normal-direction layers, got {0}")]
    TooFewNormalNodes(usize),

    #[error("{name} must be positive and finite, got {value}")]
    BadDimension { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    BadRelaxation { name: &'static str, value: f64 },

    #[error("need at least 3 half-profile samples, got {0}")]
    TooFewSamples(usize),
}

/// Configuration record for one grid generation run.
///
/// Produced by an external loader; immutable once handed to the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid construction strategy.
    pub grid_kind: GridKind,
    /// Node spacing strategy.
    pub spacing: SpacingKind,

    /// Number of nodes along the airfoil surface.
    pub airfoil_nodes: usize,
    /// Number of nodes along each branch of the wake cut.
    pub cut_nodes: usize,
    /// Number of layers in the boundary-normal direction.
    pub normal_nodes: usize,

    /// Relaxation factor of the elliptic solver; values at or below
    /// [`SMALL`] skip the elliptic stage entirely.
    pub omega_elliptic: f64,
    /// Relaxation factor of the Laplacian mesh smoother (unstructured
    /// grids only).
    pub omega_smooth: f64,

    /// Airfoil chord length.
    pub chord: f64,
    /// Angle of attack in degrees.
    pub alpha_deg: f64,
    /// Tunnel length (x extent).
    pub length: f64,
    /// Tunnel height (y extent).
    pub height: f64,

    /// Upper-half profile samples in percent of chord, leading edge first.
    pub half_profile: Vec<(f64, f64)>,
}

impl GridConfig {
    /// Number of nodes along the wake-cut boundary row: airfoil nodes plus
    /// one cut branch on each side.
    pub fn im(&self) -> usize {
        self.airfoil_nodes + 2 * self.cut_nodes
    }

    /// Number of boundary-normal layers.
    pub fn jm(&self) -> usize {
        self.normal_nodes
    }

    /// Check the structural invariants of the index grid and the physical
    /// dimensions before any geometry is built.
    ///
    /// The node-count floors guarantee the `im >= 4`, `jm >= 2` minimum
    /// the grid constructor requires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.airfoil_nodes < 2 {
            return Err(ConfigError::TooFewAirfoilNodes(self.airfoil_nodes));
        }
        if self.cut_nodes < 1 {
            return Err(ConfigError::TooFewCutNodes(self.cut_nodes));
        }
        if self.normal_nodes < 2 {
            return Err(ConfigError::TooFewNormalNodes(self.normal_nodes));
        }

        for (name, value) in [
            ("chord", self.chord),
            ("length", self.length),
            ("height", self.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::BadDimension { name, value });
            }
        }

        for (name, value) in [
            ("omega_elliptic", self.omega_elliptic),
            ("omega_smooth", self.omega_smooth),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::BadRelaxation { name, value });
            }
        }

        if self.half_profile.len() < 3 {
            return Err(ConfigError::TooFewSamples(self.half_profile.len()));
        }

        Ok(())
    }
}

/// Closed airfoil profile positioned in the tunnel.
///
/// Built once from the configured half profile and immutable afterwards.
/// The point order runs lower trailing edge -> leading edge -> upper
/// trailing edge; the spline fit and the extremum searches of the tunnel
/// wall both rely on this orientation.
#[derive(Clone, Debug)]
pub struct AirfoilProfile {
    /// Profile x coordinates in tunnel space.
    pub x: Vec<f64>,
    /// Profile y coordinates in tunnel space.
    pub y: Vec<f64>,
}

impl AirfoilProfile {
    /// Mirror the half profile into the closed `2n - 1` point profile and
    /// position it in the tunnel.
    ///
    /// The half profile is given in percent of chord. Positioning scales
    /// by `chord / 100`, rotates by `-alpha` about the leading edge and
    /// offsets both coordinates by `height / 2` so the chord line sits on
    /// the tunnel mid-plane.
    pub fn from_config(config: &GridConfig) -> Self {
        let n = config.half_profile.len();
        let total = 2 * n - 1;

        let mut x = vec![0.0; total];
        let mut y = vec![0.0; total];
        for (i, &(px, py)) in config.half_profile.iter().enumerate() {
            // Upper surface in order, lower surface reversed and negated;
            // the shared leading edge lands at index n - 1.
            x[n - 1 + i] = px;
            y[n - 1 + i] = py;
            x[n - 1 - i] = px;
            y[n - 1 - i] = -py;
        }

        let (sin_a, cos_a) = (config.alpha_deg.to_radians()).sin_cos();
        let offset = config.height / 2.0;
        for i in 0..total {
            let xa = x[i] * config.chord / 100.0;
            let ya = y[i] * config.chord / 100.0;
            x[i] = offset + xa * cos_a + ya * sin_a;
            y[i] = offset - xa * sin_a + ya * cos_a;
        }

        Self { x, y }
    }

    /// Number of profile points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the profile holds no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small symmetric profile shared by unit tests across the crate.
    pub(crate) fn test_config() -> GridConfig {
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
    fn test_validate_accepts_reference_config() {
        test_config().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_small_grids() {
        let mut config = test_config();
        config.normal_nodes = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewNormalNodes(1))
        ));

        let mut config = test_config();
        config.cut_nodes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::TooFewCutNodes(0))));
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let mut config = test_config();
        config.height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadDimension { name: "height", .. })
        ));

        let mut config = test_config();
        config.chord = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadDimension { name: "chord", .. })
        ));
    }

    #[test]
    fn test_profile_mirror_counts_and_symmetry() {
        let config = test_config();
        let n = config.half_profile.len();
        let profile = AirfoilProfile::from_config(&config);

        assert_eq!(profile.len(), 2 * n - 1);

        // Zero angle of attack: the mirrored points are symmetric about
        // the tunnel mid-plane and the leading edge sits on it.
        let mid = config.height / 2.0;
        assert!((profile.y[n - 1] - mid).abs() < 1e-14);
        for i in 0..n {
            assert!((profile.x[n - 1 + i] - profile.x[n - 1 - i]).abs() < 1e-14);
            assert!(
                ((profile.y[n - 1 + i] - mid) + (profile.y[n - 1 - i] - mid)).abs() < 1e-14,
                "profile must be antisymmetric about the chord line"
            );
        }
    }

    #[test]
    fn test_profile_positioning_spans_chord() {
        let config = test_config();
        let profile = AirfoilProfile::from_config(&config);

        // Leading edge at height/2, trailing edge one chord further.
        let n = config.half_profile.len();
        assert!((profile.x[n - 1] - 0.5).abs() < 1e-14);
        assert!((profile.x[0] - 1.5).abs() < 1e-14);
        assert!((profile.x[profile.len() - 1] - 1.5).abs() < 1e-14);
    }
}
