//! Procedural mesh presets.
//!
//! Every preset builds a unit sized shape centred on the origin. The colour
//! decides how vertices are shaded: a colour whose alpha is
//! [`USE_TEXTURE_COORDINATES`] produces texture coordinates, any other colour is
//! written to the vertices as a flat colour.
//!
//! - `cube` contains the box and the plane
//! - `circle` contains the circle and the shapes built from circles (cone, cylinder)
//! - `sphere` contains the UV-sphere and the icosphere

pub mod circle;
pub mod cube;
pub mod sphere;

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    data_structures::mesh::{Mesh, USE_TEXTURE_COORDINATES, Vertex},
    error::{ErrorPolicy, GlgeError},
};

pub use circle::CircleOptions;

/// Resolution used for circles, cones and cylinders when `0` is passed.
pub const DEFAULT_CIRCLE_RESOLUTION: u32 = 32;
/// Latitude/longitude count used for UV-spheres when `0` is passed.
pub const DEFAULT_SPHERE_RESOLUTION: u32 = 16;
/// Subdivision passes used for icospheres when `0` is passed.
pub const DEFAULT_ICOSPHERE_SUBDIVISIONS: u32 = 1;

/// The shapes the preset builder knows. The discriminants are the engine's preset ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Preset {
    Empty = 0,
    Cube = 1,
    Plane = 2,
    Circle = 3,
    Sphere = 4,
    Icosphere = 5,
    Cylinder = 6,
    Cone = 7,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Empty,
        Preset::Cube,
        Preset::Plane,
        Preset::Circle,
        Preset::Sphere,
        Preset::Icosphere,
        Preset::Cylinder,
        Preset::Cone,
    ];

    /// Replaces a resolution of `0` with the shape's default.
    pub fn resolve_resolution(&self, resolution: u32) -> u32 {
        if resolution != 0 {
            return resolution;
        }
        match self {
            Preset::Circle | Preset::Cylinder | Preset::Cone => DEFAULT_CIRCLE_RESOLUTION,
            Preset::Sphere => DEFAULT_SPHERE_RESOLUTION,
            Preset::Icosphere => DEFAULT_ICOSPHERE_SUBDIVISIONS,
            Preset::Empty | Preset::Cube | Preset::Plane => 0,
        }
    }
}

impl TryFrom<u32> for Preset {
    type Error = GlgeError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Preset::ALL
            .into_iter()
            .find(|preset| *preset as u32 == id)
            .ok_or_else(|| GlgeError::Unsupported(format!("unknown mesh preset {id}")))
    }
}

impl Mesh {
    /**
     * Builds the mesh of a preset.
     *
     * `resolution` is the number of circle segments, the UV-sphere's latitude and
     * longitude count, or the icosphere's number of subdivision passes. `0`
     * selects the shape's default. The cube, plane and empty presets ignore it.
     */
    pub fn preset(preset: Preset, color: Vector4<f32>, resolution: u32) -> Mesh {
        let resolution = preset.resolve_resolution(resolution);
        match preset {
            Preset::Empty => Mesh::default(),
            Preset::Cube => cube::cube(color),
            Preset::Plane => cube::plane(color),
            Preset::Circle => circle::circle(resolution, color, CircleOptions::filled(), 0.0),
            Preset::Sphere => sphere::uv_sphere(resolution, color),
            Preset::Icosphere => sphere::icosphere(resolution, color),
            Preset::Cylinder => circle::cylinder(resolution, color),
            Preset::Cone => circle::cone(resolution, color),
        }
    }

    /// Builds a preset from its numeric id.
    ///
    /// Unknown ids are handed to `policy` and yield an empty mesh.
    pub fn from_preset_id(
        id: u32,
        color: Vector4<f32>,
        resolution: u32,
        policy: &ErrorPolicy,
    ) -> Mesh {
        let preset = Preset::try_from(id).map(|preset| Mesh::preset(preset, color, resolution));
        policy.recover(preset, Mesh::default())
    }
}

/// `true` if the preset colour asks for texture coordinates.
pub(crate) fn is_textured(color: Vector4<f32>) -> bool {
    color.w == USE_TEXTURE_COORDINATES
}

/// Creates a preset vertex: texture coordinates when texturing, otherwise the flat colour.
pub(crate) fn shade(
    position: Vector3<f32>,
    normal: Vector3<f32>,
    uv: Vector2<f32>,
    color: Vector4<f32>,
) -> Vertex {
    let mut vertex = Vertex::with_color(position, color);
    vertex.normal = normal.into();
    if is_textured(color) {
        vertex.tex_coords = uv.into();
    }
    vertex
}
