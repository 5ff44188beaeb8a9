use std::collections::BTreeMap;
use std::fs;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use mural_core::{CanvasId, TileBinding};
use mural_persistence::{load_bindings, save_bindings};
use mural_world::{CanvasRegistry, ImageStore};

fn write_image(dir: &TempDir, name: &str) {
    let pixels = RgbaImage::from_pixel(4, 4, Rgba([60, 120, 240, 255]));
    pixels.save(dir.path().join(name)).expect("write fixture image");
}

fn snapshot(registry: &CanvasRegistry) -> BTreeMap<CanvasId, TileBinding> {
    registry
        .iter()
        .map(|(id, binding)| (id, binding.clone()))
        .collect()
}

#[test]
fn saved_bindings_load_back_as_the_same_set() {
    let dir = tempfile::tempdir().expect("create temp directory");
    write_image(&dir, "wall.png");
    write_image(&dir, "floor.png");
    let document = dir.path().join("bindings.yml");

    let mut original = CanvasRegistry::new();
    original.restore(CanvasId::new(0), TileBinding::new("wall.png", 0, 0));
    original.restore(CanvasId::new(1), TileBinding::new("wall.png", 128, 0));
    original.restore(CanvasId::new(7), TileBinding::new("floor.png", 0, 256));

    save_bindings(&document, &original).expect("save succeeds");

    let mut restored = CanvasRegistry::new();
    let mut images = ImageStore::new(dir.path());
    let count = load_bindings(&document, &mut restored, &mut images).expect("load succeeds");

    assert_eq!(count, 3);
    assert_eq!(snapshot(&restored), snapshot(&original));
    assert!(images.is_cached("wall.png"), "images are resolved eagerly at load time");
    assert!(images.is_cached("floor.png"));
}

#[test]
fn absent_document_is_an_empty_start() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let mut registry = CanvasRegistry::new();
    let mut images = ImageStore::new(dir.path());

    let count = load_bindings(&dir.path().join("bindings.yml"), &mut registry, &mut images)
        .expect("missing document is not an error");

    assert_eq!(count, 0);
    assert!(registry.is_empty());
}

#[test]
fn record_with_missing_image_is_skipped_but_the_rest_survive() {
    let dir = tempfile::tempdir().expect("create temp directory");
    write_image(&dir, "kept.png");
    write_image(&dir, "doomed.png");
    let document = dir.path().join("bindings.yml");

    let mut original = CanvasRegistry::new();
    original.restore(CanvasId::new(0), TileBinding::new("doomed.png", 0, 0));
    original.restore(CanvasId::new(1), TileBinding::new("kept.png", 0, 0));
    original.restore(CanvasId::new(2), TileBinding::new("kept.png", 128, 0));
    save_bindings(&document, &original).expect("save succeeds");

    fs::remove_file(dir.path().join("doomed.png")).expect("remove backing image");

    let mut restored = CanvasRegistry::new();
    let mut images = ImageStore::new(dir.path());
    let count = load_bindings(&document, &mut restored, &mut images).expect("load succeeds");

    assert_eq!(count, 2, "only the records with loadable images come back");
    assert_eq!(restored.binding(CanvasId::new(0)), None);
    assert_eq!(
        restored.binding(CanvasId::new(1)),
        Some(&TileBinding::new("kept.png", 0, 0)),
    );
    assert_eq!(
        restored.binding(CanvasId::new(2)),
        Some(&TileBinding::new("kept.png", 128, 0)),
    );
}

#[test]
fn garbled_document_is_reported() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let document = dir.path().join("bindings.yml");
    fs::write(&document, ": not a mapping [").expect("write fixture");

    let mut registry = CanvasRegistry::new();
    let mut images = ImageStore::new(dir.path());

    assert!(load_bindings(&document, &mut registry, &mut images).is_err());
    assert!(registry.is_empty());
}
