//! Position, rotation and scale of an object.
//!
//! A [`Transform`] is turned into a 4x4 model matrix that is applied to mesh
//! vertices. Rotations are Euler angles applied in X, Y, Z order.

use std::ops::Mul;

use cgmath::{Matrix4, Rad, Vector3};

/// Position, rotation (radians, per axis) and scale of an object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pos: Vector3<f32>,
    pub rot: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Create a transform from a position, a rotation in degrees and a per-axis scale.
    pub fn new(pos: Vector3<f32>, rot_degrees: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            pos,
            rot: rot_degrees.map(f32::to_radians),
            scale,
        }
    }

    /// Same as [`Transform::new`] with the same scale on all three axes.
    pub fn uniform(pos: Vector3<f32>, rot_degrees: Vector3<f32>, scale: f32) -> Self {
        Self::new(pos, rot_degrees, Vector3::new(scale, scale, scale))
    }

    /// The full model matrix: translation * scale * rotation.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.pos)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * self.rotation_matrix()
    }

    /// Only the rotational part, used to carry normals along with a transform.
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        (Matrix4::from_angle_x(Rad(self.rot.x)) * Matrix4::from_angle_y(Rad(self.rot.y)))
            * Matrix4::from_angle_z(Rad(self.rot.z))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vector3::new(0.0, 0.0, 0.0),
            rot: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(pos: Vector3<f32>) -> Self {
        Transform {
            pos,
            ..Default::default()
        }
    }
}

/**
 * Stacks two transforms component wise. Positions and rotations add up and
 * scales multiply, which is what moving an already placed object by another
 * offset means for Euler transforms.
 */
impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        Transform {
            pos: self.pos + rhs.pos,
            rot: self.rot + rhs.rot,
            scale: Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}
