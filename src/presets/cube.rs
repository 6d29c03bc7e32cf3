use cgmath::{Vector2, Vector3, Vector4};

use crate::data_structures::mesh::Mesh;

use super::shade;

/// Face normal plus two in-plane axes with `u x v == normal`, so corners listed
/// along `u` first come out counter-clockwise when looking at the face.
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

const QUAD_CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// A box spanning `[-1, 1]` on every axis: 24 vertices (4 per face) and 12 triangles.
pub fn cube(color: Vector4<f32>) -> Mesh {
    let mut mesh = Mesh::default();
    for (normal, u, v) in CUBE_FACES {
        let normal = Vector3::from(normal);
        let u = Vector3::from(u);
        let v = Vector3::from(v);

        let first = mesh.vertices.len() as u32;
        for (su, sv) in QUAD_CORNERS {
            let position = normal + u * su + v * sv;
            let uv = Vector2::new(su * 0.5 + 0.5, sv * 0.5 + 0.5);
            mesh.vertices.push(shade(position, normal, uv, color));
        }
        mesh.indices
            .extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
    }
    mesh
}

/// A flat square in the XZ plane spanning `[-1, 1]`, facing up.
pub fn plane(color: Vector4<f32>) -> Mesh {
    let normal = Vector3::new(0.0, 1.0, 0.0);
    let vertices = QUAD_CORNERS
        .iter()
        .map(|&(x, z)| {
            let uv = Vector2::new(x * 0.5 + 0.5, z * 0.5 + 0.5);
            shade(Vector3::new(x, 0.0, z), normal, uv, color)
        })
        .collect();
    Mesh::new(vertices, vec![0, 2, 1, 0, 3, 2])
}
