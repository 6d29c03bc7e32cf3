#![allow(dead_code)]

use glge::{InnerSpace, Mesh, Vector3};

pub const EPSILON: f32 = 1e-5;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_near(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a - e).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }
}

pub fn position(mesh: &Mesh, index: u32) -> Vector3<f32> {
    mesh.vertices[index as usize].position.into()
}

/// Face normal (not normalized) and centroid of every triangle with a noticeable area.
pub fn faces(mesh: &Mesh) -> Vec<(Vector3<f32>, Vector3<f32>)> {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let p0 = position(mesh, tri[0]);
            let p1 = position(mesh, tri[1]);
            let p2 = position(mesh, tri[2]);
            ((p1 - p0).cross(p2 - p0), (p0 + p1 + p2) / 3.0)
        })
        .filter(|(normal, _)| normal.magnitude() > 1e-6)
        .collect()
}
