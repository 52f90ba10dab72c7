// tests/tileset_loading.rs
mod common;

use common::{scratch_dir, write, FakeTextures};
use macroquad::math::Rect;
use macroquad_tiles::{Assets, Error, Tileset};

const GARDEN: &str = r#"
{
    "name": "garden",
    "texture": "garden.png",
    "cellSize": 16,
    "tileDatas": {
        "3": { "solid": true, "frames": [3, 5, 7], "delay": 0.25 },
        "5": { "solid": true },
        "6": { "frames": [1, 2], "delay": 0.5 }
    }
}
"#;

#[test]
fn loads_overrides_and_resolves_texture_next_to_definition() {
    let dir = scratch_dir("tileset");
    let path = write(&dir, "garden.json", GARDEN);
    let mut textures = FakeTextures::new(64, 32);

    let ts = Tileset::from_file(&path, &mut textures).unwrap();

    assert_eq!(ts.name(), "garden");
    assert_eq!(ts.tiles().len(), 8);
    assert_eq!(ts.texture_path(), Some(dir.join("garden.png").as_path()));
    assert!(textures.loaded.contains_key(&dir.join("garden.png")));

    let t3 = ts.tile_by_id(3).unwrap();
    assert!(t3.solid);
    assert_eq!(t3.frames, vec![3, 5, 7]);
    assert_eq!(t3.delay, 0.25);
    assert!(ts.tile_by_id(5).unwrap().solid);
    assert!(!ts.tile_by_id(1).unwrap().solid);
}

#[test]
fn frames_without_solid_are_ignored_but_delay_applies() {
    let dir = scratch_dir("tileset_nosolid");
    let path = write(&dir, "garden.json", GARDEN);
    let ts = Tileset::from_file(&path, &mut FakeTextures::new(64, 32)).unwrap();

    let t6 = ts.tile_by_id(6).unwrap();
    assert!(!t6.is_animated());
    assert!(!t6.solid);
    assert_eq!(t6.delay, 0.5);
}

#[test]
fn animated_tile_cycles_its_region() {
    let dir = scratch_dir("tileset_anim");
    let path = write(&dir, "garden.json", GARDEN);
    let mut ts = Tileset::from_file(&path, &mut FakeTextures::new(64, 32)).unwrap();

    // frames [3,5,7] on a 4x2 grid: tiles 5 and 7 live on the second row
    let mut seen = Vec::new();
    for _ in 0..4 {
        ts.update(0.25);
        seen.push(ts.region_for(3).unwrap());
    }
    assert_eq!(
        seen,
        vec![
            Rect::new(0.0, 16.0, 16.0, 16.0),
            Rect::new(32.0, 16.0, 16.0, 16.0),
            Rect::new(32.0, 0.0, 16.0, 16.0),
            Rect::new(0.0, 16.0, 16.0, 16.0),
        ]
    );
}

#[test]
fn override_for_missing_tile_is_rejected() {
    let dir = scratch_dir("tileset_missing");
    let path = write(
        &dir,
        "bad.json",
        r#"{ "name": "bad", "texture": "t.png", "cellSize": 16,
             "tileDatas": { "9": { "solid": true } } }"#,
    );
    let err = Tileset::from_file(&path, &mut FakeTextures::new(32, 32)).unwrap_err();
    match err {
        Error::TileOutOfRange { id, count, .. } => assert_eq!((id, count), (9, 4)),
        other => panic!("expected TileOutOfRange, got {:?}", other),
    }
}

#[test]
fn frame_ids_outside_tileset_are_rejected() {
    let dir = scratch_dir("tileset_frames");
    let path = write(
        &dir,
        "bad.json",
        r#"{ "name": "bad", "texture": "t.png", "cellSize": 16,
             "tileDatas": { "1": { "solid": false, "frames": [1, 0] } } }"#,
    );
    assert!(matches!(
        Tileset::from_file(&path, &mut FakeTextures::new(32, 32)),
        Err(Error::TileOutOfRange { id: 0, .. })
    ));
}

#[test]
fn ignored_frames_are_not_checked() {
    let dir = scratch_dir("tileset_ignored_frames");
    let path = write(
        &dir,
        "loose.json",
        r#"{ "name": "loose", "texture": "t.png", "cellSize": 16,
             "tileDatas": { "1": { "frames": [99] } } }"#,
    );
    let ts = Tileset::from_file(&path, &mut FakeTextures::new(32, 32)).unwrap();
    assert!(!ts.tile_by_id(1).unwrap().is_animated());
}

#[test]
fn non_numeric_override_key_is_rejected() {
    let dir = scratch_dir("tileset_key");
    let path = write(
        &dir,
        "bad.json",
        r#"{ "name": "bad", "texture": "t.png", "cellSize": 16,
             "tileDatas": { "grass": { "solid": true } } }"#,
    );
    match Tileset::from_file(&path, &mut FakeTextures::new(32, 32)).unwrap_err() {
        Error::InvalidTileKey { key, .. } => assert_eq!(key, "grass"),
        other => panic!("expected InvalidTileKey, got {:?}", other),
    }
}

#[test]
fn malformed_and_missing_documents() {
    let dir = scratch_dir("tileset_malformed");
    let path = write(&dir, "broken.json", "{ \"name\": ");
    assert!(matches!(
        Tileset::from_file(&path, &mut FakeTextures::new(32, 32)),
        Err(Error::Json { .. })
    ));
    assert!(matches!(
        Tileset::from_file(dir.join("nope.json"), &mut FakeTextures::new(32, 32)),
        Err(Error::Io { .. })
    ));
}

#[test]
fn shared_texture_is_loaded_once() {
    let dir = scratch_dir("tileset_shared");
    let a = write(&dir, "a.json", GARDEN);
    let b = write(&dir, "b.json", GARDEN);
    let mut textures = FakeTextures::new(64, 32);
    let mut assets = Assets::new();

    let ha = assets.load_tileset(&a, &mut textures).unwrap();
    let hb = assets.load_tileset(&b, &mut textures).unwrap();

    assert_ne!(ha, hb);
    assert_eq!(textures.loads, 1);
    let ta = assets.tilesets.get(ha).unwrap().texture();
    let tb = assets.tilesets.get(hb).unwrap().texture();
    assert_eq!(ta.handle, tb.handle);
}
