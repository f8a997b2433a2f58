//! Node-averaged element characteristics.
//!
//! Exporters want element quality as scalar fields they can iterate
//! node-by-node next to the metrics. For each grid node this averages
//! the quality attributes of the elements sharing it: at most four
//! quadrangles or six triangles meet in a node of the structured index
//! grid.

use crate::grid::StructuredGrid;
use crate::mesh::elements::Elements;

/// Element quality averaged at the grid nodes.
///
/// `skewness` is all zeros for triangle meshes, which carry none.
#[derive(Clone, Debug)]
pub struct NodeQuality {
    /// Average area of the elements sharing each node.
    pub area: Vec<f64>,
    /// Average aspect ratio per node.
    pub aspect_ratio: Vec<f64>,
    /// Average minimum angle per node, degrees.
    pub minimum_angle: Vec<f64>,
    /// Average skewness per node (quadrangle meshes only).
    pub skewness: Vec<f64>,
}

/// Average the per-element quality attributes at every node.
///
/// Quality must have been computed on `elements` first.
pub fn average_at_nodes(grid: &StructuredGrid, elements: &Elements) -> NodeQuality {
    let size = grid.node_count();
    let max_sharing = match elements {
        Elements::Quadrangles(_) => 4,
        Elements::Triangles(_) => 6,
    };

    let mut quality = NodeQuality {
        area: vec![0.0; size],
        aspect_ratio: vec![0.0; size],
        minimum_angle: vec![0.0; size],
        skewness: vec![0.0; size],
    };

    let mut shared = Vec::with_capacity(max_sharing);
    for node in 0..size {
        find_sharing_elements(elements, node, max_sharing, &mut shared);
        let count = shared.len() as f64;

        match elements {
            Elements::Quadrangles(quads) => {
                for &e in &shared {
                    quality.area[node] += quads[e].area / count;
                    quality.aspect_ratio[node] += quads[e].aspect_ratio / count;
                    quality.minimum_angle[node] += quads[e].minimum_angle / count;
                    quality.skewness[node] += quads[e].skewness / count;
                }
            }
            Elements::Triangles(tris) => {
                for &e in &shared {
                    quality.area[node] += tris[e].area / count;
                    quality.aspect_ratio[node] += tris[e].aspect_ratio / count;
                    quality.minimum_angle[node] += tris[e].minimum_angle / count;
                }
            }
        }
    }

    quality
}

/// Collect the indices of all elements containing `node`, stopping at the
/// structural sharing limit.
fn find_sharing_elements(
    elements: &Elements,
    node: usize,
    max_sharing: usize,
    found: &mut Vec<usize>,
) {
    found.clear();
    match elements {
        Elements::Quadrangles(quads) => {
            for (e, quad) in quads.iter().enumerate() {
                if quad.nodes.contains(&node) {
                    found.push(e);
                    if found.len() == max_sharing {
                        break;
                    }
                }
            }
        }
        Elements::Triangles(tris) => {
            for (e, tri) in tris.iter().enumerate() {
                if tri.nodes.contains(&node) {
                    found.push(e);
                    if found.len() == max_sharing {
                        break;
                    }
                }
            }
        }
    }
}
