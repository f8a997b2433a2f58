//! Element mesh: generation, smoothing and quality assessment.
//!
//! - element generation over the index cells (quadrangles or triangles)
//! - Laplacian node smoothing for the unstructured pipeline
//! - per-element shape quality and its node-averaged form for exporters

pub mod elements;
pub mod node_quality;
pub mod quality;
pub mod smooth;

pub use elements::{Elements, Quadrangle, Triangle};
pub use node_quality::{average_at_nodes, NodeQuality};
pub use quality::analyze;
pub use smooth::{smooth, SmoothError, SmoothReport};
