//! Template configuration cache.
//!
//! [`TemplateConfig`] owns three maps:
//! - the path registry (name -> roots and filenames),
//! - the assembled cache (name -> ready-to-use image list),
//! - the raw bank (resolved path -> decoded image, shared across names).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use super::entry::{TemplateImage, TemplatePaths};
use super::loader::{FsImageLoader, ImageLoader};
use super::validation::ValidationMode;
use crate::error::{Result, TemplateCacheError};

/// Entry counts for each cache tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Names in the path registry.
    pub registered: usize,
    /// Names with an assembled image list.
    pub assembled: usize,
    /// Paths held in the raw bank (including failed decodes).
    pub banked: usize,
}

/// Lazy-loading cache for named sets of template images.
///
/// Not internally synchronized; see
/// [`SharedTemplateConfig`](super::SharedTemplateConfig) for concurrent use.
#[derive(Debug)]
pub struct TemplateConfig<L = FsImageLoader> {
    mode: ValidationMode,
    loader: L,
    template_paths: HashMap<String, TemplatePaths>,
    template_cache: HashMap<String, Vec<TemplateImage>>,
    template_bank: HashMap<PathBuf, TemplateImage>,
}

impl TemplateConfig<FsImageLoader> {
    /// Create a cache that reads images from the filesystem.
    pub fn new(mode: ValidationMode) -> Self {
        Self::with_loader(mode, FsImageLoader::new())
    }
}

impl Default for TemplateConfig<FsImageLoader> {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

impl<L: ImageLoader> TemplateConfig<L> {
    /// Create a cache with a custom image loader.
    pub fn with_loader(mode: ValidationMode, loader: L) -> Self {
        Self {
            mode,
            loader,
            template_paths: HashMap::new(),
            template_cache: HashMap::new(),
            template_bank: HashMap::new(),
        }
    }

    /// The validation mode chosen at construction.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Register `root` as the newest override for `name` and replace its
    /// filename list.
    ///
    /// Any assembled list for `name` is dropped; the raw bank is untouched.
    /// In strict mode the images are resolved immediately and registration
    /// fails if any of them is missing. The cache state built by that probe
    /// is kept either way.
    pub fn lazy_load<I, S>(
        &mut self,
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        filenames: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let root = root.into();
        let filenames: Vec<String> = filenames.into_iter().map(Into::into).collect();
        debug!(name = %name, root = %root.display(), ?filenames, "Register template");

        let paths = self.template_paths.entry(name.clone()).or_default();
        if !paths.push_root(root) {
            debug!(name = %name, "Root already has top priority");
        }
        paths.filenames = filenames;

        self.template_cache.remove(&name);

        if self.mode.is_strict() {
            let images = self.get_template_images(&name)?;
            if images.is_empty() || images.iter().any(TemplateImage::is_empty) {
                error!(name = %name, "Template image is empty");
                return Err(TemplateCacheError::EmptyAssembledSet { name });
            }
        }

        Ok(())
    }

    /// Images for `name`, loading them on first use.
    ///
    /// A cached list is returned without any I/O.
    pub fn get_template_images(&mut self, name: &str) -> Result<&[TemplateImage]> {
        if self.template_cache.contains_key(name) {
            return Ok(self.template_cache[name].as_slice());
        }

        self.load_images(name)
    }

    /// Resolve every filename of `name` and store the assembled list.
    fn load_images(&mut self, name: &str) -> Result<&[TemplateImage]> {
        debug!(name = %name, "Load template images");

        let Some(paths) = self.template_paths.get(name) else {
            error!(name = %name, "Invalid template name");
            return Err(TemplateCacheError::UnknownName {
                name: name.to_string(),
            });
        };

        let mut images = Vec::with_capacity(paths.filenames.len());
        for filename in &paths.filenames {
            let resolved = paths.candidates(filename).find_map(|path| {
                let image = load_single_image(&self.loader, &mut self.template_bank, &path);
                (!image.is_empty()).then_some(image)
            });

            match resolved {
                Some(image) => images.push(image),
                None => {
                    error!(
                        name = %name,
                        filename = %filename,
                        roots = ?paths.roots,
                        "Template image is empty"
                    );
                    if self.mode.is_strict() {
                        return Err(TemplateCacheError::EmptyResolution {
                            name: name.to_string(),
                            filename: filename.clone(),
                        });
                    }
                }
            }
        }

        if images.is_empty() {
            error!(
                name = %name,
                filenames = ?paths.filenames,
                roots = ?paths.roots,
                "Template list is empty"
            );
            return Err(TemplateCacheError::EmptyAssembledSet {
                name: name.to_string(),
            });
        }

        let stored = self
            .template_cache
            .entry(name.to_string())
            .insert_entry(images)
            .into_mut();
        Ok(stored.as_slice())
    }

    /// Decoded image at a resolved path, through the raw bank.
    pub fn load_single_image(&mut self, path: &Path) -> TemplateImage {
        load_single_image(&self.loader, &mut self.template_bank, path)
    }

    /// Drop every registration, assembled list and banked image.
    pub fn clear(&mut self) {
        debug!("Clear template config");

        self.template_paths.clear();
        self.template_cache.clear();
        self.template_bank.clear();
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.template_paths.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Search paths registered for `name`.
    pub fn paths(&self, name: &str) -> Option<&TemplatePaths> {
        self.template_paths.get(name)
    }

    /// Whether `name` currently has an assembled list.
    pub fn is_cached(&self, name: &str) -> bool {
        self.template_cache.contains_key(name)
    }

    /// Entry counts for each tier.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            registered: self.template_paths.len(),
            assembled: self.template_cache.len(),
            banked: self.template_bank.len(),
        }
    }
}

/// Raw bank lookup. Kept free of `self` so the load loop can borrow the
/// registry and the bank at the same time.
fn load_single_image<L: ImageLoader>(
    loader: &L,
    bank: &mut HashMap<PathBuf, TemplateImage>,
    path: &Path,
) -> TemplateImage {
    if let Some(image) = bank.get(path) {
        debug!(path = %path.display(), "Withdraw image");
        return image.clone();
    }

    if loader.exists(path) {
        debug!(path = %path.display(), "Read image");
        let image = loader.decode(path);
        bank.insert(path.to_path_buf(), image.clone());
        return image;
    }

    debug!(path = %path.display(), "Image not found");
    TemplateImage::empty(path)
}
