//! Element generation from the index grid.
//!
//! Partitions the `(im-1) x (jm-1)` index cells into either quadrangles
//! (one per cell) or triangles (two per cell, split along the SE-NW
//! diagonal). A mesh holds exactly one element kind at a time — whichever
//! mesher ran last — which the tagged [`Elements`] sum encodes directly.
//!
//! Corner convention per cell `(j, i)`:
//! SW = `(j, i)`, SE = `(j, i+1)`, NW = `(j+1, i)`, NE = `(j+1, i+1)`.

use crate::grid::StructuredGrid;

/// Quadrilateral element with its quality attributes.
///
/// Node order `[SE, SW, NW, NE]`, consistent with the corner convention
/// used by the quality formulas.
#[derive(Clone, Debug)]
pub struct Quadrangle {
    /// Flat node indices `[SE, SW, NW, NE]`.
    pub nodes: [usize; 4],
    /// Element area.
    pub area: f64,
    /// Shortest over longest edge length.
    pub aspect_ratio: f64,
    /// Shorter over longer diagonal.
    pub skewness: f64,
    /// Smallest interior angle in degrees.
    pub minimum_angle: f64,
}

impl Quadrangle {
    fn new(nodes: [usize; 4]) -> Self {
        Self {
            nodes,
            area: 0.0,
            aspect_ratio: 0.0,
            skewness: 0.0,
            minimum_angle: 0.0,
        }
    }
}

/// Triangular element with its quality attributes. Triangles report no
/// skewness.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Flat node indices; west triangle `[SE, SW, NW]`, east `[SE, NW, NE]`.
    pub nodes: [usize; 3],
    /// Element area.
    pub area: f64,
    /// Shortest over longest edge length.
    pub aspect_ratio: f64,
    /// Smallest interior angle in degrees.
    pub minimum_angle: f64,
}

impl Triangle {
    fn new(nodes: [usize; 3]) -> Self {
        Self {
            nodes,
            area: 0.0,
            aspect_ratio: 0.0,
            minimum_angle: 0.0,
        }
    }
}

/// Element collection of a mesh: one kind at a time.
#[derive(Clone, Debug)]
pub enum Elements {
    Quadrangles(Vec<Quadrangle>),
    Triangles(Vec<Triangle>),
}

impl Elements {
    /// One quadrangle per index cell, `(im-1) * (jm-1)` in total.
    pub fn quadrangulate(grid: &StructuredGrid) -> Self {
        let mut quads = Vec::with_capacity((grid.im - 1) * (grid.jm - 1));
        for j in 0..grid.jm - 1 {
            for i in 0..grid.im - 1 {
                let se = grid.at(j, i + 1);
                let sw = grid.at(j, i);
                let nw = grid.at(j + 1, i);
                let ne = grid.at(j + 1, i + 1);
                quads.push(Quadrangle::new([se, sw, nw, ne]));
            }
        }
        Self::Quadrangles(quads)
    }

    /// Two triangles per index cell sharing the SE-NW diagonal,
    /// `2 * (im-1) * (jm-1)` in total.
    pub fn triangulate(grid: &StructuredGrid) -> Self {
        let mut tris = Vec::with_capacity(2 * (grid.im - 1) * (grid.jm - 1));
        for j in 0..grid.jm - 1 {
            for i in 0..grid.im - 1 {
                let se = grid.at(j, i + 1);
                let sw = grid.at(j, i);
                let nw = grid.at(j + 1, i);
                let ne = grid.at(j + 1, i + 1);
                tris.push(Triangle::new([se, sw, nw]));
                tris.push(Triangle::new([se, nw, ne]));
            }
        }
        Self::Triangles(tris)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Quadrangles(quads) => quads.len(),
            Self::Triangles(tris) => tris.len(),
        }
    }

    /// True when the collection holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nodes per element of the held kind.
    pub fn nodes_per_element(&self) -> usize {
        match self {
            Self::Quadrangles(_) => 4,
            Self::Triangles(_) => 3,
        }
    }
}
