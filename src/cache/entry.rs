//! Cache entry types: decoded template images and per-name search paths.

use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A decoded template image.
///
/// Cloning is cheap: pixel data sits behind an `Arc`, so every name that
/// resolves to the same file shares one decoded buffer.
#[derive(Debug, Clone)]
pub struct TemplateImage {
    /// Path the image was decoded from.
    source: PathBuf,
    /// Decoded pixels, `None` when decoding failed.
    pixels: Option<Arc<DynamicImage>>,
}

impl TemplateImage {
    /// Wrap decoded pixels.
    pub fn new(source: impl Into<PathBuf>, pixels: DynamicImage) -> Self {
        Self {
            source: source.into(),
            pixels: Some(Arc::new(pixels)),
        }
    }

    /// An empty image, the result of a failed decode or a missing file.
    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            pixels: None,
        }
    }

    /// Whether this image has no usable pixels.
    pub fn is_empty(&self) -> bool {
        match &self.pixels {
            Some(pixels) => pixels.width() == 0 || pixels.height() == 0,
            None => true,
        }
    }

    /// Path the image was decoded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Decoded pixels, if any.
    pub fn pixels(&self) -> Option<&DynamicImage> {
        self.pixels.as_deref()
    }

    /// Width and height, `(0, 0)` when empty.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.as_ref().map_or((0, 0), |p| p.dimensions())
    }

    /// Whether both images share the same decoded buffer.
    pub fn shares_pixels_with(&self, other: &TemplateImage) -> bool {
        match (&self.pixels, &other.pixels) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Search paths registered under one logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplatePaths {
    /// Candidate roots in registration order. The last one has the highest
    /// search priority.
    pub roots: Vec<PathBuf>,
    /// Relative filenames, in output order.
    pub filenames: Vec<String>,
}

impl TemplatePaths {
    /// Append a root as the new highest-priority override.
    ///
    /// Returns `false` when `root` already is the last root; precedence is
    /// unchanged in that case so nothing is appended.
    pub fn push_root(&mut self, root: impl Into<PathBuf>) -> bool {
        let root = root.into();
        if self.roots.last() == Some(&root) {
            return false;
        }
        self.roots.push(root);
        true
    }

    /// Roots in search order (newest registration first).
    pub fn search_order(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().rev().map(PathBuf::as_path)
    }

    /// Candidate paths for one filename, in search order.
    pub fn candidates<'a>(&'a self, filename: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.search_order().map(move |root| root.join(filename))
    }
}
