//! Engine data structures: vertices, meshes and transforms.
//!
//! - `mesh` contains the vertex layout and the CPU-side triangle mesh
//! - `transform` holds position/rotation/scale and builds model matrices

pub mod mesh;
pub mod transform;
