use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::data_structures::mesh::Mesh;

use super::shade;

/// Knobs for [`circle`]. Cones and cylinders are assembled from differently configured circles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CircleOptions {
    /// Triangulate the inside as a fan around the first vertex.
    pub fill: bool,
    /// Reverse the winding and point the normal down instead of up.
    pub flip: bool,
    /// Use each vertex's radial direction as its normal (for side walls).
    pub sideways_normals: bool,
    /// Wrap `u` once around the rim instead of projecting the circle onto the texture.
    pub wrap_uv: bool,
}

impl CircleOptions {
    pub fn filled() -> Self {
        Self {
            fill: true,
            ..Default::default()
        }
    }

    pub fn flipped(mut self) -> Self {
        self.flip = true;
        self
    }

    /// An unfilled rim carrying side wall normals and wrapped texture coordinates.
    pub fn rim() -> Self {
        Self {
            sideways_normals: true,
            wrap_uv: true,
            ..Default::default()
        }
    }
}

/**
 * A unit circle with `resolution` rim vertices in the XZ plane at height `y`.
 *
 * Planar texture coordinates map the circle onto the unit square. Wrapped
 * coordinates run `u` from 0 up to 1 at the half way point and back down to 0,
 * so the texture meets itself without a seam; `v` follows the height
 * (`y = -1` is 0, `y = 1` is 1).
 */
pub fn circle(resolution: u32, color: Vector4<f32>, options: CircleOptions, y: f32) -> Mesh {
    let n = clamp_resolution(resolution);
    let step = 2.0 * PI / n as f32;
    let up = if options.flip { -1.0 } else { 1.0 };

    let vertices = (0..n)
        .map(|j| {
            let angle = j as f32 * step;
            let (sin, cos) = angle.sin_cos();
            let position = Vector3::new(cos, y, sin);
            let normal = if options.sideways_normals {
                Vector3::new(cos, 0.0, sin).normalize() * up
            } else {
                Vector3::new(0.0, up, 0.0)
            };
            let uv = if options.wrap_uv {
                let mut u = j as f32 * 2.0 / n as f32;
                if u > 1.0 {
                    u = 2.0 - u;
                }
                Vector2::new(u, y * 0.5 + 0.5)
            } else {
                Vector2::new(cos * 0.5 + 0.5, sin * 0.5 + 0.5)
            };
            shade(position, normal, uv, color)
        })
        .collect();

    let mut indices = Vec::new();
    if options.fill {
        for j in 1..n - 1 {
            if options.flip {
                indices.extend_from_slice(&[0, j, j + 1]);
            } else {
                indices.extend_from_slice(&[0, j + 1, j]);
            }
        }
    }
    Mesh::new(vertices, indices)
}

/// A cone with its base at `y = -1` and the tip at `y = 1`.
pub fn cone(resolution: u32, color: Vector4<f32>) -> Mesh {
    let mut mesh = circle(resolution, color, CircleOptions::filled().flipped(), -1.0);
    let n = mesh.vertices.len() as u32;

    let apex = Vector3::new(0.0, 1.0, 0.0);
    mesh.vertices.push(shade(apex, apex, Vector2::new(0.5, 0.5), color));

    for j in 0..n {
        let next = (j + 1) % n;
        mesh.indices.extend_from_slice(&[j, n, next]);
    }
    mesh
}

/**
 * A cylinder from `y = -1` to `y = 1`.
 *
 * The caps are filled circles facing away from each other. The side wall gets
 * its own pair of rims so it can carry sideways normals and wrapped texture
 * coordinates without disturbing the caps.
 */
pub fn cylinder(resolution: u32, color: Vector4<f32>) -> Mesh {
    let top = circle(resolution, color, CircleOptions::filled(), 1.0);
    let bottom = circle(resolution, color, CircleOptions::filled().flipped(), -1.0);
    let side_bottom = circle(resolution, color, CircleOptions::rim(), -1.0);
    let side_top = circle(resolution, color, CircleOptions::rim(), 1.0);

    let mut mesh = top + bottom;
    let lower = mesh.vertices.len() as u32;
    let n = side_bottom.vertices.len() as u32;
    let upper = lower + n;
    mesh += side_bottom;
    mesh += side_top;

    for j in 0..n {
        let next = (j + 1) % n;
        mesh.indices.extend_from_slice(&[
            lower + j,
            upper + j,
            upper + next,
            lower + j,
            upper + next,
            lower + next,
        ]);
    }
    mesh
}

fn clamp_resolution(resolution: u32) -> u32 {
    if resolution < 3 {
        log::warn!("circle resolution {resolution} is too small, using 3 segments");
        3
    } else {
        resolution
    }
}
