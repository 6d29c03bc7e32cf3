//! glge
//!
//! The core of the GLGE graphics engine: procedural and imported meshes plus
//! the binary formats the engine persists its objects in. Everything here works
//! on plain CPU-side data; the only GPU contact is handing a finished mesh to a
//! `wgpu` device as vertex and index buffers.
//!
//! High-level modules
//! - `error`: the error type and the policy deciding how errors are reported
//! - `data_structures`: vertices, meshes and transforms
//! - `presets`: procedural meshes (cube, plane, circle, spheres, cone, cylinder)
//! - `resources`: OBJ import, asset loading and GPU upload
//! - `persistence`: typed payloads, named objects, scene files and atlas files
//!

pub mod data_structures;
pub mod error;
pub mod persistence;
pub mod presets;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use data_structures::{
    mesh::{Mesh, Vertex, VertexLayout},
    transform::Transform,
};
pub use error::{ErrorPolicy, GlgeError};
pub use persistence::{AtlasFile, AtlasImage, Data, Encode, NamedObject, Scene};
pub use presets::Preset;
pub use resources::obj::MeshFormat;

/// Sets up logging for the current platform. Calling it more than once is harmless.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            log::debug!("Logger was already initialized: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::debug!("Logger was already initialized: {}", e);
        }
    }
}
