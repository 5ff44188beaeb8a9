//! Decoded image cache backed by a fixed images directory.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Reasons the store could not produce a decoded image.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// No file with the requested name exists under the images directory.
    #[error("image file {name:?} not found")]
    NotFound {
        /// Requested image name.
        name: String,
    },
    /// The file exists but could not be decoded.
    #[error("failed to decode image {name:?}")]
    Decode {
        /// Requested image name.
        name: String,
        /// Underlying codec failure.
        #[source]
        source: image::ImageError,
    },
}

/// Cache of decoded raster images keyed by filename.
///
/// Every image is decoded at most once and retained for the lifetime of the
/// store. Files under the images directory are treated as immutable, so the
/// cache is never invalidated.
#[derive(Debug)]
pub struct ImageStore {
    root: PathBuf,
    cache: HashMap<String, RgbaImage>,
}

impl ImageStore {
    /// Creates a store that resolves image names under the provided
    /// directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Directory image names are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reports whether the named image has already been decoded.
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Returns the decoded image for `name`, reading and decoding the file
    /// on first use.
    ///
    /// A failed load leaves the store usable; callers log the error and
    /// carry on.
    pub fn load(&mut self, name: &str) -> Result<&RgbaImage, ImageLoadError> {
        match self.cache.entry(name.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let path = self.root.join(slot.key());
                if !path.is_file() {
                    return Err(ImageLoadError::NotFound {
                        name: slot.key().clone(),
                    });
                }
                let decoded = match image::open(&path) {
                    Ok(decoded) => decoded.to_rgba8(),
                    Err(source) => {
                        return Err(ImageLoadError::Decode {
                            name: slot.key().clone(),
                            source,
                        })
                    }
                };
                Ok(slot.insert(decoded))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn store_with_image(name: &str, width: u32, height: u32) -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().expect("create temp images directory");
        let pixels = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        pixels.save(dir.path().join(name)).expect("write fixture image");
        let store = ImageStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn load_decodes_once_and_caches() {
        let (_dir, mut store) = store_with_image("wall.png", 3, 2);
        assert!(!store.is_cached("wall.png"));

        let decoded = store.load("wall.png").expect("decode fixture");
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert!(store.is_cached("wall.png"));

        let again = store.load("wall.png").expect("cache hit");
        assert_eq!((again.width(), again.height()), (3, 2));
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().expect("create temp images directory");
        let mut store = ImageStore::new(dir.path());

        let error = store.load("absent.png").expect_err("file does not exist");

        assert!(matches!(error, ImageLoadError::NotFound { name } if name == "absent.png"));
        assert!(!store.is_cached("absent.png"));
    }

    #[test]
    fn load_reports_undecodable_files() {
        let dir = tempfile::tempdir().expect("create temp images directory");
        fs::write(dir.path().join("broken.png"), b"not an image").expect("write fixture");
        let mut store = ImageStore::new(dir.path());

        let error = store.load("broken.png").expect_err("decode must fail");

        assert!(matches!(error, ImageLoadError::Decode { name, .. } if name == "broken.png"));
        assert!(!store.is_cached("broken.png"));
    }
}
