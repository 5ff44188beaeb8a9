#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Durable storage for the canvas registry.
//!
//! Bindings are written as a YAML mapping keyed by the string-encoded
//! canvas identifier, each record holding the image name and the pixel
//! offset of the tile window. The document is written on graceful shutdown
//! and read back on startup so previously placed walls keep rendering.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use mural_core::{CanvasId, TileBinding};
use mural_world::{CanvasRegistry, ImageStore};

#[derive(Debug, Serialize, Deserialize)]
struct BindingRecord {
    image: String,
    x: u32,
    y: u32,
}

/// Writes every registered canvas binding to `path`.
///
/// Durability is best-effort: callers log a failure and carry on rather
/// than treating it as fatal.
pub fn save_bindings(path: &Path, canvases: &CanvasRegistry) -> Result<()> {
    let mut document: BTreeMap<String, BindingRecord> = BTreeMap::new();
    for (id, binding) in canvases.iter() {
        let record = BindingRecord {
            image: binding.image().to_owned(),
            x: binding.offset_x(),
            y: binding.offset_y(),
        };
        let _ = document.insert(id.get().to_string(), record);
    }

    let contents =
        serde_yaml::to_string(&document).context("failed to serialize canvas bindings")?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write bindings document at {}", path.display()))
}

/// Reads a bindings document and restores its records into the registry.
///
/// A missing document is an empty start, not an error. Each record eagerly
/// re-resolves its image through the store so missing files surface now
/// rather than at first paint; a record whose image cannot be loaded is
/// skipped with a warning and the pass continues with the remaining
/// records. Returns how many records were restored.
pub fn load_bindings(
    path: &Path,
    canvases: &mut CanvasRegistry,
    images: &mut ImageStore,
) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read bindings document at {}", path.display()))?;
    let document: BTreeMap<String, BindingRecord> = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse bindings document at {}", path.display()))?;

    let mut restored = 0;
    for (key, record) in document {
        let Ok(id) = key.parse::<u16>() else {
            warn!("skipping bindings record with non-numeric canvas id {key:?}");
            continue;
        };
        if let Err(error) = images.load(&record.image) {
            warn!("skipping canvas {id}: {error}");
            continue;
        }
        canvases.restore(
            CanvasId::new(id),
            TileBinding::new(record.image, record.x, record.y),
        );
        restored += 1;
    }

    Ok(restored)
}
