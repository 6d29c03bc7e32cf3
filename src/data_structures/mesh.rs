//! Vertices and meshes.
//!
//! A [`Mesh`] is a plain CPU-side vertex/index list. Presets, the OBJ importer
//! and user code build meshes; [`crate::resources::mesh`] uploads them to the GPU
//! and [`crate::persistence`] stores them in scene files.

use std::ops::{Add, AddAssign};

use cgmath::{InnerSpace, Vector2, Vector3, Vector4, Zero};

use crate::data_structures::transform::Transform;

/// Colour alpha that tells the shader to sample the texture instead of using the vertex colour.
pub const USE_TEXTURE_COORDINATES: f32 = -1.0;

/// A single mesh vertex as it is laid out in GPU memory.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
    /// A zero normal means "not set yet", see [`Mesh::recalculate_normals`].
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            ..Default::default()
        }
    }

    pub fn with_color(position: Vector3<f32>, color: Vector4<f32>) -> Self {
        Self {
            position: position.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn with_tex_coords(position: Vector3<f32>, tex_coords: Vector2<f32>) -> Self {
        Self {
            position: position.into(),
            tex_coords: tex_coords.into(),
            ..Default::default()
        }
    }

    pub fn with_normal(position: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            ..Default::default()
        }
    }

    pub fn textured(
        position: Vector3<f32>,
        tex_coords: Vector2<f32>,
        normal: Vector3<f32>,
    ) -> Self {
        Self {
            position: position.into(),
            tex_coords: tex_coords.into(),
            normal: normal.into(),
            ..Default::default()
        }
    }

    /// `true` if the colour alpha carries the texture sentinel.
    pub fn uses_texture(&self) -> bool {
        self.color[3] == USE_TEXTURE_COORDINATES
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: [1.0; 4],
            tex_coords: [1.0, 1.0],
            normal: [0.0; 3],
        }
    }
}

/**
 * As we store vertex data directly in the GPU memory we need to tell what the bytes refer to.
 *
 * Layout: position (vec3) + colour (vec4) + texture coordinate (vec2) + normal (vec3)
 */
pub trait VertexLayout {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl VertexLayout for Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Vertex and index data of a triangle mesh.
///
/// Every three indices form one triangle; the order of the three decides which
/// side is the front face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn from_slices(vertices: &[Vertex], indices: &[u32]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// All indices point at a vertex and they form whole triangles.
    pub fn is_valid(&self) -> bool {
        let len = self.vertices.len();
        self.indices.len() % 3 == 0 && self.indices.iter().all(|&i| (i as usize) < len)
    }

    /// Moves every vertex by `transform`. Normals only follow the rotation.
    pub fn apply_transform(&mut self, transform: &Transform) {
        let matrix = transform.matrix();
        let rotation = transform.rotation_matrix();
        for v in self.vertices.iter_mut() {
            let position = matrix * Vector3::from(v.position).extend(1.0);
            v.position = position.truncate().into();
            let normal = rotation * Vector3::from(v.normal).extend(0.0);
            v.normal = normal.truncate().into();
        }
    }

    /**
     * Derives vertex normals from the triangle faces.
     *
     * Vertices without a normal take the face normal of the first triangle that
     * touches them. Every further triangle is blended in by adding its face normal
     * and normalizing again, so the result depends on triangle order and is not an
     * area weighted average. Degenerate triangles contribute a zero normal and
     * triangles pointing past the vertex list are skipped.
     */
    pub fn recalculate_normals(&mut self) {
        let len = self.vertices.len();
        for tri in self.indices.chunks_exact(3) {
            if tri.iter().any(|&i| i as usize >= len) {
                log::warn!(
                    "Skipping triangle {:?}, the mesh only has {} vertices",
                    tri,
                    len
                );
                continue;
            }
            let p0 = Vector3::from(self.vertices[tri[0] as usize].position);
            let p1 = Vector3::from(self.vertices[tri[1] as usize].position);
            let p2 = Vector3::from(self.vertices[tri[2] as usize].position);

            let mut face = (p1 - p0).cross(p2 - p0).normalize();
            if !(face.x.is_finite() && face.y.is_finite() && face.z.is_finite()) {
                face = Vector3::zero();
            }

            for &i in tri {
                let vertex = &mut self.vertices[i as usize];
                let current = Vector3::from(vertex.normal);
                let blended = if current.is_zero() {
                    face
                } else {
                    let sum = current.normalize() + face;
                    if sum.is_zero() { sum } else { sum.normalize() }
                };
                vertex.normal = blended.into();
            }
        }
    }

    /// Returns a new mesh holding `self` followed by `other`.
    pub fn join(&self, other: &Mesh) -> Mesh {
        let mut joined = self.clone();
        joined.join_this(other);
        joined
    }

    /// Appends `other` to `self`, shifting its indices past the existing vertices.
    pub fn join_this(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|index| index + offset));
    }
}

impl Add<Mesh> for Mesh {
    type Output = Mesh;

    fn add(mut self, rhs: Mesh) -> Self::Output {
        self.join_this(&rhs);
        self
    }
}

impl<'a, 'b> Add<&'b Mesh> for &'a Mesh {
    type Output = Mesh;

    fn add(self, rhs: &'b Mesh) -> Self::Output {
        self.join(rhs)
    }
}

impl AddAssign<Mesh> for Mesh {
    fn add_assign(&mut self, rhs: Mesh) {
        self.join_this(&rhs);
    }
}

impl AddAssign<&Mesh> for Mesh {
    fn add_assign(&mut self, rhs: &Mesh) {
        self.join_this(rhs);
    }
}
