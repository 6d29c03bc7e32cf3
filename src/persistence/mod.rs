//! Binary persistence: typed payloads, named objects, scene files and atlas files.
//!
//! Objects implement [`Encode`] to turn themselves into a [`Data`] payload.
//! A [`NamedObject`] wraps the payload together with the type tag so it can be
//! checked on the way back, and a [`Scene`] stores named objects in a
//! `.glges` file. The atlas file is a separate format for packed texture sheets.

pub mod atlas;
pub mod data;
pub mod named_object;
pub mod scene;

use cgmath::Vector3;

pub use atlas::{AtlasFile, AtlasImage, FileMode};
pub use data::Data;
pub use named_object::NamedObject;
pub use scene::Scene;

use crate::{
    data_structures::{
        mesh::{Mesh, Vertex},
        transform::Transform,
    },
    error::GlgeError,
};

/// A type that can be stored inside a [`NamedObject`].
///
/// `TYPE_TAG` is written in front of the payload and compared when decoding, so
/// it has to be unique per type and must not change between versions.
pub trait Encode: Sized {
    const TYPE_TAG: &'static str;

    fn encode(&self, data: &mut Data);

    fn decode(data: &mut Data) -> Result<Self, GlgeError>;

    /// Encodes `self` into a fresh buffer.
    fn to_data(&self) -> Data {
        let mut data = Data::new();
        self.encode(&mut data);
        data
    }
}

impl Encode for Vertex {
    const TYPE_TAG: &'static str = "glge::Vertex";

    fn encode(&self, data: &mut Data) {
        self.position
            .iter()
            .chain(&self.color)
            .chain(&self.tex_coords)
            .chain(&self.normal)
            .for_each(|&f| data.write_f32(f));
    }

    fn decode(data: &mut Data) -> Result<Self, GlgeError> {
        let mut floats = [0.0f32; 12];
        for f in floats.iter_mut() {
            *f = data.read_f32()?;
        }
        Ok(Vertex {
            position: [floats[0], floats[1], floats[2]],
            color: [floats[3], floats[4], floats[5], floats[6]],
            tex_coords: [floats[7], floats[8]],
            normal: [floats[9], floats[10], floats[11]],
        })
    }
}

impl Encode for Mesh {
    const TYPE_TAG: &'static str = "glge::Mesh";

    fn encode(&self, data: &mut Data) {
        data.write_var_len(self.vertices.len());
        for vertex in &self.vertices {
            vertex.encode(data);
        }
        data.write_var_len(self.indices.len());
        for &index in &self.indices {
            data.write_u32(index);
        }
    }

    fn decode(data: &mut Data) -> Result<Self, GlgeError> {
        let vertex_count = data.read_var_len()?;
        // every vertex takes 48 bytes, reject counts the buffer cannot hold
        if vertex_count > data.remaining() / 48 {
            return Err(GlgeError::format(
                "mesh",
                format!("{vertex_count} vertices do not fit into the payload"),
            ));
        }
        let vertices = (0..vertex_count)
            .map(|_| Vertex::decode(data))
            .collect::<Result<Vec<_>, _>>()?;

        let index_count = data.read_var_len()?;
        if index_count > data.remaining() / 4 {
            return Err(GlgeError::format(
                "mesh",
                format!("{index_count} indices do not fit into the payload"),
            ));
        }
        let indices = (0..index_count)
            .map(|_| data.read_u32())
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = Mesh::new(vertices, indices);
        if !mesh.is_valid() {
            return Err(GlgeError::format(
                "mesh",
                "an index points past the vertex list",
            ));
        }
        Ok(mesh)
    }
}

impl Encode for Transform {
    const TYPE_TAG: &'static str = "glge::Transform";

    fn encode(&self, data: &mut Data) {
        data.write_vec3(self.pos);
        data.write_vec3(self.rot);
        data.write_vec3(self.scale);
    }

    fn decode(data: &mut Data) -> Result<Self, GlgeError> {
        let pos: Vector3<f32> = data.read_vec3()?;
        let rot = data.read_vec3()?;
        let scale = data.read_vec3()?;
        Ok(Transform { pos, rot, scale })
    }
}
