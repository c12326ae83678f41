//! Image loading collaborators.
//!
//! The cache never touches the filesystem directly. It asks an
//! [`ImageLoader`] whether a path exists and to decode it.

use std::path::Path;

use super::entry::TemplateImage;

/// Filesystem and decoder access used by the cache.
pub trait ImageLoader {
    /// Whether something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Decode the image at `path`.
    ///
    /// Returns an empty image on any failure (missing file, corrupt data,
    /// unsupported format). Must not panic.
    fn decode(&self, path: &Path) -> TemplateImage;
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn decode(&self, path: &Path) -> TemplateImage {
        (**self).decode(path)
    }
}

/// Default loader backed by the real filesystem and the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl FsImageLoader {
    /// Create a new filesystem loader.
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for FsImageLoader {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn decode(&self, path: &Path) -> TemplateImage {
        match image::open(path) {
            Ok(pixels) => TemplateImage::new(path, pixels),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to decode image");
                TemplateImage::empty(path)
            }
        }
    }
}
