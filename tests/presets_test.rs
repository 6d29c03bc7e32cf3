use glge::{
    ErrorPolicy, GlgeError, InnerSpace, Mesh, Preset, Vector4,
    presets::{
        self, CircleOptions,
        sphere::{icosphere, uv_sphere},
    },
};

use crate::common::test_utils::{faces, init_logger};

mod common;

const WHITE: Vector4<f32> = Vector4 {
    x: 1.0,
    y: 1.0,
    z: 1.0,
    w: 1.0,
};
const TEXTURED: Vector4<f32> = Vector4 {
    x: 1.0,
    y: 1.0,
    z: 1.0,
    w: -1.0,
};

#[test]
fn should_keep_indices_in_range_for_all_presets() {
    init_logger();
    for preset in Preset::ALL {
        let resolutions: &[u32] = if preset == Preset::Icosphere {
            &[0, 1, 2, 3]
        } else {
            &[0, 1, 2, 3, 7, 16, 33]
        };
        for &resolution in resolutions {
            for color in [WHITE, TEXTURED] {
                let mesh = Mesh::preset(preset, color, resolution);
                assert!(
                    mesh.is_valid(),
                    "{:?} with resolution {} produced invalid indices",
                    preset,
                    resolution
                );
            }
        }
    }
}

#[test]
fn should_seed_icosphere_with_twelve_unique_vertices() {
    let mesh = icosphere(0, WHITE);
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 20);
    for v in &mesh.vertices {
        let p: glge::Vector3<f32> = v.position.into();
        assert!((p.magnitude() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn should_share_midpoints_when_subdividing_icosphere() {
    let once = icosphere(1, WHITE);
    assert_eq!(once.vertex_count(), 42);
    assert_eq!(once.triangle_count(), 80);

    let twice = icosphere(2, WHITE);
    assert_eq!(twice.vertex_count(), 162);
    assert_eq!(twice.triangle_count(), 320);
}

#[test]
fn should_build_textured_cube_on_unit_bounds() {
    let mesh = Mesh::preset(Preset::Cube, TEXTURED, 0);
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.index_count(), 36);
    for v in &mesh.vertices {
        for c in v.position {
            assert!(c == 1.0 || c == -1.0, "coordinate {} is not on the cube", c);
        }
        for t in v.tex_coords {
            assert!((0.0..=1.0).contains(&t));
        }
        assert!(v.uses_texture());
    }
    assert!(mesh.vertices.iter().any(|v| v.tex_coords != [1.0, 1.0]));
}

#[test]
fn should_write_flat_color_without_texture_coordinates() {
    let red = Vector4::new(1.0, 0.0, 0.0, 1.0);
    for preset in [Preset::Cube, Preset::Sphere, Preset::Cylinder] {
        let mesh = Mesh::preset(preset, red, 8);
        for v in &mesh.vertices {
            assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
            assert_eq!(v.tex_coords, [1.0, 1.0]);
        }
    }
}

#[test]
fn should_wind_closed_presets_outwards() {
    for preset in [
        Preset::Cube,
        Preset::Sphere,
        Preset::Icosphere,
        Preset::Cylinder,
        Preset::Cone,
    ] {
        let resolution = if preset == Preset::Icosphere { 2 } else { 12 };
        let mesh = Mesh::preset(preset, WHITE, resolution);
        let faces = faces(&mesh);
        assert!(!faces.is_empty());
        for (normal, centroid) in faces {
            assert!(
                normal.dot(centroid) > 0.0,
                "{:?} has an inward facing triangle at {:?}",
                preset,
                centroid
            );
        }
    }
}

#[test]
fn should_face_plane_and_circle_up() {
    for preset in [Preset::Plane, Preset::Circle] {
        let mesh = Mesh::preset(preset, WHITE, 0);
        for (normal, _) in faces(&mesh) {
            assert!(normal.y > 0.0);
            assert!(normal.x.abs() < 1e-5 && normal.z.abs() < 1e-5);
        }
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }
}

#[test]
fn should_flip_circle_winding_and_normal() {
    let mesh = presets::circle::circle(6, WHITE, CircleOptions::filled().flipped(), 0.0);
    assert_eq!(mesh.triangle_count(), 4);
    for (normal, _) in faces(&mesh) {
        assert!(normal.y < 0.0);
    }
    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, -1.0, 0.0]));
}

#[test]
fn should_leave_unfilled_circle_without_triangles() {
    let mesh = presets::circle::circle(5, TEXTURED, CircleOptions::rim(), 1.0);
    assert_eq!(mesh.vertex_count(), 5);
    assert!(mesh.indices.is_empty());
    // folded wrap: 0, 0.4, 0.8, then back down
    let us: Vec<f32> = mesh.vertices.iter().map(|v| v.tex_coords[0]).collect();
    let expected = [0.0, 0.4, 0.8, 0.8, 0.4];
    for (u, e) in us.iter().zip(expected) {
        assert!((u - e).abs() < 1e-5, "{:?}", us);
    }
    assert!(mesh.vertices.iter().all(|v| v.tex_coords[1] == 1.0));
}

#[test]
fn should_use_default_resolutions_for_zero() {
    assert_eq!(Mesh::preset(Preset::Circle, WHITE, 0).vertex_count(), 32);
    assert_eq!(Mesh::preset(Preset::Cone, WHITE, 0).vertex_count(), 33);
    assert_eq!(Mesh::preset(Preset::Cylinder, WHITE, 0).vertex_count(), 128);
    assert_eq!(Mesh::preset(Preset::Sphere, WHITE, 0).vertex_count(), 16 * 17);
    assert_eq!(Mesh::preset(Preset::Icosphere, WHITE, 0).vertex_count(), 42);
    assert!(Mesh::preset(Preset::Empty, WHITE, 0).is_empty());
}

#[test]
fn should_count_cone_and_cylinder_elements() {
    let cone = Mesh::preset(Preset::Cone, WHITE, 8);
    assert_eq!(cone.vertex_count(), 9);
    assert_eq!(cone.triangle_count(), 6 + 8);

    let cylinder = Mesh::preset(Preset::Cylinder, WHITE, 8);
    assert_eq!(cylinder.vertex_count(), 32);
    assert_eq!(cylinder.triangle_count(), 2 * 6 + 2 * 8);
}

#[test]
fn should_skip_degenerate_pole_triangles_on_uv_sphere() {
    let mesh = uv_sphere(10, WHITE);
    assert_eq!(mesh.vertex_count(), 10 * 11);
    // 9 bands of 10 quads, minus one triangle per quad on both pole bands
    assert_eq!(mesh.triangle_count(), 9 * 10 * 2 - 2 * 10);
    assert_eq!(faces(&mesh).len(), mesh.triangle_count());
}

#[test]
fn should_point_sphere_normals_away_from_center() {
    for mesh in [uv_sphere(12, TEXTURED), icosphere(2, TEXTURED)] {
        for v in &mesh.vertices {
            let p: glge::Vector3<f32> = v.position.into();
            let n: glge::Vector3<f32> = v.normal.into();
            assert!(p.dot(n) > 0.99);
            assert!(v.tex_coords.iter().all(|t| (0.0..=1.0).contains(t)));
        }
    }
}

#[test]
fn should_reject_unknown_preset_ids() {
    assert_eq!(Preset::try_from(3).ok(), Some(Preset::Circle));
    assert!(matches!(
        Preset::try_from(8),
        Err(GlgeError::Unsupported(_))
    ));
    let mesh = Mesh::from_preset_id(42, WHITE, 0, &ErrorPolicy::SILENT);
    assert!(mesh.is_empty());
    let cube = Mesh::from_preset_id(1, WHITE, 0, &ErrorPolicy::LOG);
    assert_eq!(cube.vertex_count(), 24);
}
