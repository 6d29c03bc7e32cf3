use glge::{
    AtlasFile, AtlasImage, GlgeError, Vector2,
    persistence::{FileMode, atlas::ATLAS_HEADER},
    resources::{load_atlas, load_binary},
};

use crate::common::test_utils::init_logger;

mod common;

fn sample_atlas() -> AtlasFile {
    let mut atlas = AtlasFile::new(Vector2::new(256, 128));
    atlas.add_image("grass", Vector2::new(0, 0), Vector2::new(64, 64));
    atlas.add_image("stone", Vector2::new(64, 0), Vector2::new(64, 64));
    atlas.push(AtlasImage::new("marker", Vector2::new(128, 64), Vector2::new(0, 0)));
    atlas
}

#[test]
fn should_round_trip_atlas_through_file() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.atlas");

    let mut atlas = sample_atlas();
    atlas.open(&path, 'w').unwrap();
    assert_eq!(atlas.mode(), Some(FileMode::Write));
    atlas.write().unwrap();
    atlas.close();
    assert_eq!(atlas.mode(), None);

    let mut loaded = AtlasFile::new(Vector2::new(0, 0));
    loaded.open(&path, 'r').unwrap();
    loaded.read().unwrap();
    loaded.close();

    assert_eq!(loaded.size, Vector2::new(256, 128));
    assert_eq!(loaded.images, atlas.images);
    let marker = loaded.get("marker").unwrap();
    assert_eq!(marker.size, Vector2::new(0, 0));
}

#[test]
fn should_write_big_endian_fields() {
    let mut atlas = AtlasFile::new(Vector2::new(256, 2));
    atlas.add_image("a", Vector2::new(1, 2), Vector2::new(3, 4));
    let bytes = atlas.to_bytes().unwrap();

    let mut expected = ATLAS_HEADER.to_vec();
    expected.extend_from_slice(&[0, 0, 0, 1]);
    expected.extend_from_slice(&[0, 0, 1, 0]);
    expected.extend_from_slice(&[0, 0, 0, 2]);
    expected.extend_from_slice(&[0, 0, 0, 1, b'a']);
    for value in [1u8, 2, 3, 4] {
        expected.extend_from_slice(&[0, 0, 0, value]);
    }
    assert_eq!(bytes, expected);
}

#[test]
fn should_read_names_with_arbitrary_bytes() {
    let mut atlas = AtlasFile::new(Vector2::new(16, 16));
    atlas.add_image("line\nbreak", Vector2::new(0, 0), Vector2::new(8, 8));
    atlas.add_image("", Vector2::new(8, 8), Vector2::new(8, 8));
    // a width of 10 contains a newline byte
    atlas.add_image("ten", Vector2::new(0, 8), Vector2::new(10, 8));
    let parsed = AtlasFile::from_bytes(&atlas.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, atlas);
}

#[test]
fn should_reject_invalid_modes() {
    let dir = tempfile::tempdir().unwrap();
    let mut atlas = sample_atlas();
    assert!(matches!(
        atlas.open(dir.path().join("x.atlas"), 'x'),
        Err(GlgeError::InvalidMode('x'))
    ));
    assert!(matches!(
        atlas.open(dir.path().join("missing.atlas"), 'r'),
        Err(GlgeError::NotFound(_))
    ));
    assert_eq!(atlas.mode(), None);
}

#[test]
fn should_check_mode_before_reading_or_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("modes.atlas");

    let mut atlas = sample_atlas();
    assert!(matches!(atlas.write(), Err(GlgeError::WrongMode(_))));
    assert!(matches!(atlas.read(), Err(GlgeError::WrongMode(_))));

    atlas.open(&path, 'w').unwrap();
    assert!(path.is_file());
    assert!(matches!(atlas.read(), Err(GlgeError::WrongMode(_))));
    atlas.write().unwrap();

    atlas.open(&path, 'r').unwrap();
    assert!(matches!(atlas.write(), Err(GlgeError::WrongMode(_))));
    atlas.read().unwrap();
    assert_eq!(atlas.images, sample_atlas().images);
}

#[test]
fn should_find_images_by_name() {
    let atlas = sample_atlas();
    assert_eq!(atlas.find("grass"), Some(0));
    assert_eq!(atlas.find("stone"), Some(1));
    assert_eq!(atlas.find("lava"), None);
}

#[test]
fn should_report_images_outside_the_atlas() {
    let mut atlas = sample_atlas();
    assert!(atlas.check_bounds().is_ok());

    atlas.add_image("wide", Vector2::new(200, 0), Vector2::new(64, 64));
    match atlas.check_bounds() {
        Err(GlgeError::OutOfSpace(name)) => assert_eq!(name, "wide"),
        other => panic!("expected out of space, got {:?}", other),
    }

    let mut negative = AtlasFile::new(Vector2::new(8, 8));
    negative.add_image("left", Vector2::new(-1, 0), Vector2::new(2, 2));
    assert!(negative.check_bounds().is_err());
}

#[test]
fn should_reject_truncated_atlas_files() {
    assert!(AtlasFile::from_bytes(b"GLGE_AtlasFile_2").is_err());
    let bytes = sample_atlas().to_bytes().unwrap();
    for len in [10, 18, 30, bytes.len() - 1] {
        assert!(
            matches!(
                AtlasFile::from_bytes(&bytes[..len]),
                Err(GlgeError::Format { .. })
            ),
            "an atlas cut at {} bytes was accepted",
            len
        );
    }
}

#[test]
fn should_load_atlas_asset() {
    init_logger();
    let atlas = futures::executor::block_on(load_atlas("blocks.atlas")).unwrap();
    assert_eq!(atlas.size, Vector2::new(256, 128));
    assert_eq!(atlas.images, sample_atlas().images);
    assert_eq!(atlas.mode(), None);
    assert_eq!(atlas.get("stone").unwrap().pos, Vector2::new(64, 0));

    let bytes = futures::executor::block_on(load_binary("blocks.atlas")).unwrap();
    assert_eq!(&bytes[..16], ATLAS_HEADER);
    assert_eq!(bytes, sample_atlas().to_bytes().unwrap());

    assert!(futures::executor::block_on(load_atlas("missing.atlas")).is_err());
    assert!(futures::executor::block_on(load_atlas("sample.glges")).is_err());
}
