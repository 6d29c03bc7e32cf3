use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::data_structures::mesh::Mesh;

use super::{is_textured, shade};

/**
 * A latitude/longitude sphere with radius 1.
 *
 * `resolution` is used for both the number of latitude rings and the number of
 * longitude segments. The first and last ring sit exactly on the poles; their
 * vertices collapse onto one point and the triangles that would have zero area
 * there are left out. The seam column is duplicated so `u` can reach 1.
 */
pub fn uv_sphere(resolution: u32, color: Vector4<f32>) -> Mesh {
    let latitudes = if resolution < 3 {
        log::warn!("sphere resolution {resolution} is too small, using 3");
        3
    } else {
        resolution
    };
    let longitudes = latitudes;
    let columns = longitudes + 1;

    let mut mesh = Mesh::default();
    for i in 0..latitudes {
        let phi = PI * i as f32 / (latitudes - 1) as f32;
        let (ring_radius, y) = phi.sin_cos();
        for j in 0..columns {
            let theta = 2.0 * PI * j as f32 / longitudes as f32;
            let (sin, cos) = theta.sin_cos();
            let position = Vector3::new(ring_radius * cos, y, ring_radius * sin);
            let uv = Vector2::new(
                j as f32 / longitudes as f32,
                i as f32 / (latitudes - 1) as f32,
            );
            mesh.vertices.push(shade(position, position, uv, color));
        }
    }

    for i in 0..latitudes - 1 {
        for j in 0..longitudes {
            let a = i * columns + j;
            let b = (i + 1) * columns + j;
            let c = (i + 1) * columns + j + 1;
            let d = i * columns + j + 1;
            if i != latitudes - 2 {
                mesh.indices.extend_from_slice(&[a, c, b]);
            }
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, d, c]);
            }
        }
    }
    mesh
}

/**
 * An icosphere with radius 1.
 *
 * Starts from the 12 corners of a regular icosahedron and splits every triangle
 * into four for each of the `subdivisions` passes. New vertices are pushed onto
 * the sphere and merged with existing ones of the exact same position.
 */
pub fn icosphere(subdivisions: u32, color: Vector4<f32>) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];

    let mut points: Vec<Vector3<f32>> = Vec::new();
    let corners: Vec<u32> = corners
        .into_iter()
        .map(|corner| insert_unique(&mut points, Vector3::from(corner)))
        .collect();

    #[rustfmt::skip]
    let mut faces: Vec<[u32; 3]> = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ]
    .into_iter()
    .map(|[a, b, c]| [corners[a], corners[b], corners[c]])
    .collect();

    for _ in 0..subdivisions {
        let mut refined = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(&mut points, a, b);
            let bc = midpoint(&mut points, b, c);
            let ca = midpoint(&mut points, c, a);
            refined.push([a, ab, ca]);
            refined.push([b, bc, ab]);
            refined.push([c, ca, bc]);
            refined.push([ab, bc, ca]);
        }
        faces = refined;
    }

    let textured = is_textured(color);
    let vertices = points
        .into_iter()
        .map(|p| {
            let uv = if textured {
                Vector2::new(0.5 + p.z.atan2(p.x) / (2.0 * PI), 0.5 - p.y.asin() / PI)
            } else {
                Vector2::new(1.0, 1.0)
            };
            shade(p, p, uv, color)
        })
        .collect();
    Mesh::new(vertices, faces.into_iter().flatten().collect())
}

/// Projects `point` onto the unit sphere and returns its index, reusing an identical point.
fn insert_unique(points: &mut Vec<Vector3<f32>>, point: Vector3<f32>) -> u32 {
    let point = point.normalize();
    // linear scan, the vertex counts stay small
    match points.iter().position(|p| *p == point) {
        Some(index) => index as u32,
        None => {
            points.push(point);
            (points.len() - 1) as u32
        }
    }
}

fn midpoint(points: &mut Vec<Vector3<f32>>, a: u32, b: u32) -> u32 {
    let middle = (points[a as usize] + points[b as usize]) * 0.5;
    insert_unique(points, middle)
}
