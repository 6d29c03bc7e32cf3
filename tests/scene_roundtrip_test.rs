use std::fs;

use glge::{
    GlgeError, Mesh, NamedObject, Preset, Scene, Transform, Vector3, Vector4,
    resources::{load_binary, load_scene},
};

use crate::common::test_utils::init_logger;

mod common;

fn sample_scene(name: &str) -> Scene {
    Scene::from_objects(
        name,
        [
            NamedObject::encode("zebra", b"stripes", "test::Text").unwrap(),
            NamedObject::encode("apple", b"", "test::Empty").unwrap(),
            NamedObject::encode("binary", &[0, 1, 2, 0, 255], "test::Bytes").unwrap(),
        ],
    )
}

#[test]
fn should_round_trip_scene_through_file() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let name = dir.path().join("level").to_string_lossy().into_owned();
    let scene = sample_scene(&name);

    scene.save_file().unwrap();
    let path = dir.path().join("level.glges");
    assert!(path.is_file());
    assert_eq!(scene.file_path(), path);

    let loaded = Scene::open(&path).unwrap();
    assert_eq!(loaded.len(), 3);
    for object in scene.all_objects() {
        let other = loaded.get(&object.name).unwrap();
        assert_eq!(other.data(), object.data());
    }
    assert_eq!(loaded, scene);

    let mut reloaded = Scene::new(name);
    reloaded.load().unwrap();
    assert_eq!(reloaded, scene);
}

#[test]
fn should_write_header_and_sorted_records() {
    let scene = sample_scene("sorted");
    let bytes = scene.to_bytes().unwrap();
    assert_eq!(&bytes[..12], b"GLGEScene001");

    let apple = scene.get("apple").unwrap();
    let record_len = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
    assert_eq!(record_len, 1 + "apple".len() + apple.len());
    assert_eq!(bytes[16], 5);
    assert_eq!(&bytes[17..22], b"apple");
    assert_eq!(&bytes[22..22 + apple.len()], apple.data());

    // saving twice gives the same file
    assert_eq!(sample_scene("sorted").to_bytes().unwrap(), bytes);
}

#[test]
fn should_keep_scene_path_extension() {
    assert_eq!(
        Scene::new("menu.glges").file_path(),
        std::path::PathBuf::from("menu.glges")
    );
    assert_eq!(
        Scene::new("menu").file_path(),
        std::path::PathBuf::from("menu.glges")
    );
}

#[test]
fn should_round_trip_empty_scene() {
    let scene = Scene::new("empty");
    let bytes = scene.to_bytes().unwrap();
    assert_eq!(bytes, b"GLGEScene001");
    let loaded = Scene::from_bytes("empty", &bytes).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn should_keep_objects_without_payload() {
    let scene = Scene::from_objects("blank", [NamedObject::new("nothing")]);
    let loaded = Scene::from_bytes("blank", &scene.to_bytes().unwrap()).unwrap();
    assert_eq!(loaded, scene);
}

#[test]
fn should_reject_files_from_newer_versions() {
    let mut bytes = Scene::new("future").to_bytes().unwrap();
    bytes[9..12].copy_from_slice(b"002");
    let err = Scene::from_bytes("future", &bytes).unwrap_err();
    assert!(err.to_string().contains("newer version"), "{}", err);

    bytes[9..12].copy_from_slice(b"000");
    assert!(Scene::from_bytes("past", &bytes).is_ok());

    bytes[9..12].copy_from_slice(b"abc");
    assert!(Scene::from_bytes("garbage", &bytes).is_err());
}

#[test]
fn should_reject_foreign_and_truncated_files() {
    assert!(matches!(
        Scene::from_bytes("foreign", b"NotAScene001"),
        Err(GlgeError::Format { .. })
    ));
    assert!(Scene::from_bytes("short", b"GLGEScene0").is_err());

    let bytes = sample_scene("cut").to_bytes().unwrap();
    for len in [14, 20, bytes.len() - 1] {
        assert!(
            Scene::from_bytes("cut", &bytes[..len]).is_err(),
            "a file cut at {} bytes was accepted",
            len
        );
    }
}

#[test]
fn should_refuse_names_longer_than_255_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.glges");
    let long_name = "n".repeat(256);
    let scene = Scene::from_objects(
        "long",
        [
            NamedObject::encode("short", b"ok", "tag").unwrap(),
            NamedObject::encode(long_name, b"too long", "tag").unwrap(),
        ],
    );
    assert!(matches!(
        scene.save_to(&path),
        Err(GlgeError::Format { .. })
    ));
    assert!(!path.exists());

    let fits = Scene::from_objects(
        "fits",
        [NamedObject::encode("m".repeat(255), b"ok", "tag").unwrap()],
    );
    assert!(fits.to_bytes().is_ok());
}

#[test]
fn should_replace_objects_with_the_same_name() {
    let mut scene = Scene::new("replace");
    assert!(scene.set(NamedObject::encode("a", b"1", "tag").unwrap()).is_none());
    let old = scene.set(NamedObject::encode("a", b"2", "tag").unwrap());
    assert_eq!(old.unwrap().decode("tag").unwrap(), b"1");
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.get("a").unwrap().decode("tag").unwrap(), b"2");

    scene.store_objects([
        NamedObject::encode("a", b"3", "tag").unwrap(),
        NamedObject::encode("b", b"4", "tag").unwrap(),
    ]);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.get("a").unwrap().decode("tag").unwrap(), b"3");

    assert!(scene.remove("a").is_some());
    assert!(scene.get("a").is_none());
}

#[test]
fn should_store_meshes_and_transforms_in_scene_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("objects.glges");

    let mesh = Mesh::preset(Preset::Icosphere, Vector4::new(1.0, 1.0, 1.0, -1.0), 1);
    let transform = Transform::uniform(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 30.0),
        0.5,
    );
    let mut scene = Scene::new("objects");
    scene.set_object("ball", &mesh).unwrap();
    scene.set_object("ball_transform", &transform).unwrap();
    scene.save_to(&path).unwrap();

    let loaded = Scene::open(&path).unwrap();
    assert_eq!(loaded.get_object::<Mesh>("ball").unwrap(), mesh);
    assert_eq!(
        loaded.get_object::<Transform>("ball_transform").unwrap(),
        transform
    );
    assert!(matches!(
        loaded.get_object::<Transform>("ball"),
        Err(GlgeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        loaded.get_object::<Mesh>("missing"),
        Err(GlgeError::NotFound(_))
    ));
}

#[test]
fn should_report_missing_scene_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Scene::open(dir.path().join("nowhere.glges")),
        Err(GlgeError::NotFound(_))
    ));
    fs::write(dir.path().join("broken.glges"), b"GLGEScene001\x05\x00").unwrap();
    assert!(Scene::open(dir.path().join("broken.glges")).is_err());
}

#[test]
fn should_load_scene_asset() {
    init_logger();
    let scene = futures::executor::block_on(load_scene("sample.glges")).unwrap();
    assert_eq!(scene.name, "sample");
    assert_eq!(scene, sample_scene("sample"));
    let binary = scene.get("binary").unwrap();
    assert_eq!(binary.decode("test::Bytes").unwrap(), [0, 1, 2, 0, 255]);

    let bytes = futures::executor::block_on(load_binary("sample.glges")).unwrap();
    assert_eq!(bytes, sample_scene("sample").to_bytes().unwrap());

    assert!(futures::executor::block_on(load_scene("missing.glges")).is_err());
    // an OBJ file is not a scene
    assert!(futures::executor::block_on(load_scene("pyramid.obj")).is_err());
}

#[test]
fn should_write_records_under_their_scene_key() {
    let mut object = NamedObject::encode("inner", b"payload", "tag").unwrap();
    let mut scene = Scene::new("keys");
    scene.set(object.clone());

    // a renamed copy is stored under its new name
    object.name = "outer".to_string();
    scene.set(object);
    assert_eq!(scene.len(), 2);

    let loaded = Scene::from_bytes("keys", &scene.to_bytes().unwrap()).unwrap();
    assert_eq!(loaded, scene);
    for name in ["inner", "outer"] {
        assert_eq!(loaded.get(name).unwrap().name, name);
    }
}
