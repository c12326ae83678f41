//! In-memory image loader for testing.
//!
//! `MockImageLoader` implements [`ImageLoader`] over a virtual filesystem and
//! counts every decode, so tests can assert on cache hits.
//!
//! # Example
//!
//! ```
//! use template_cache::cache::{MockImageLoader, TemplateConfig, ValidationMode};
//!
//! let loader = MockImageLoader::new();
//! loader.add_image("/skin/idle.png", 8, 8);
//!
//! let mut config = TemplateConfig::with_loader(ValidationMode::Lenient, &loader);
//! config.lazy_load("hero", "/skin", ["idle.png"]).unwrap();
//!
//! config.get_template_images("hero").unwrap();
//! config.get_template_images("hero").unwrap();
//! assert_eq!(loader.decode_count(), 1);
//! ```

use image::{DynamicImage, RgbImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::entry::TemplateImage;
use super::loader::ImageLoader;

/// Contents of one virtual file.
#[derive(Debug, Clone)]
enum MockFile {
    Image { width: u32, height: u32 },
    Corrupt,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockFile>,
    decodes: HashMap<PathBuf, usize>,
    exists_checks: usize,
}

/// Mock image loader for testing.
///
/// Safe to share across threads.
#[derive(Debug, Default)]
pub struct MockImageLoader {
    state: Mutex<MockState>,
}

impl MockImageLoader {
    /// Create an empty virtual filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a decodable image of the given size at `path`.
    pub fn add_image(&self, path: impl Into<PathBuf>, width: u32, height: u32) {
        self.with_state(|s| {
            s.files
                .insert(path.into(), MockFile::Image { width, height });
        });
    }

    /// Place a file at `path` that exists but fails to decode.
    pub fn add_corrupt(&self, path: impl Into<PathBuf>) {
        self.with_state(|s| {
            s.files.insert(path.into(), MockFile::Corrupt);
        });
    }

    /// Remove a file from the virtual filesystem.
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.with_state(|s| {
            s.files.remove(path.as_ref());
        });
    }

    /// Total number of decodes across all paths.
    pub fn decode_count(&self) -> usize {
        self.with_state(|s| s.decodes.values().sum())
    }

    /// Number of decodes for one path.
    pub fn decodes_of(&self, path: impl AsRef<Path>) -> usize {
        self.with_state(|s| s.decodes.get(path.as_ref()).copied().unwrap_or(0))
    }

    /// Number of existence checks performed.
    pub fn exists_count(&self) -> usize {
        self.with_state(|s| s.exists_checks)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        // A panicking test thread must not hide the counters from the others.
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state)
    }
}

impl ImageLoader for MockImageLoader {
    fn exists(&self, path: &Path) -> bool {
        self.with_state(|s| {
            s.exists_checks += 1;
            s.files.contains_key(path)
        })
    }

    fn decode(&self, path: &Path) -> TemplateImage {
        let file = self.with_state(|s| {
            *s.decodes.entry(path.to_path_buf()).or_default() += 1;
            s.files.get(path).cloned()
        });

        match file {
            Some(MockFile::Image { width, height }) => {
                TemplateImage::new(path, DynamicImage::ImageRgb8(RgbImage::new(width, height)))
            }
            Some(MockFile::Corrupt) | None => TemplateImage::empty(path),
        }
    }
}
