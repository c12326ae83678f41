//! Thread-safe template configuration cache.
//!
//! Same semantics as [`TemplateConfig`](super::TemplateConfig), usable from
//! many threads through `&self`. Both cache tiers are `moka` caches:
//! concurrent lookups of one name share a single load, and each resolved
//! path is decoded at most once.
//!
//! Assembled lists are keyed by name and registration generation, so a load
//! that races with a re-registration of its name returns its result without
//! serving it to later lookups.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use moka::sync::Cache;
use tracing::{debug, error};

use super::entry::{TemplateImage, TemplatePaths};
use super::loader::{FsImageLoader, ImageLoader};
use super::store::CacheStats;
use super::validation::ValidationMode;
use crate::error::{Result, TemplateCacheError};

/// Search paths for one name plus the generation of their last change.
#[derive(Debug, Clone, Default)]
struct Registration {
    paths: TemplatePaths,
    generation: u64,
}

type AssembledKey = (String, u64);

/// Concurrent lazy-loading cache for named sets of template images.
pub struct SharedTemplateConfig<L = FsImageLoader> {
    mode: ValidationMode,
    loader: L,
    template_paths: RwLock<HashMap<String, Registration>>,
    template_cache: Cache<AssembledKey, Arc<[TemplateImage]>>,
    template_bank: Cache<PathBuf, TemplateImage>,
    generation: AtomicU64,
}

impl SharedTemplateConfig<FsImageLoader> {
    /// Create a cache that reads images from the filesystem.
    pub fn new(mode: ValidationMode) -> Self {
        Self::with_loader(mode, FsImageLoader::new())
    }
}

impl<L: ImageLoader> SharedTemplateConfig<L> {
    /// Create a cache with a custom image loader.
    pub fn with_loader(mode: ValidationMode, loader: L) -> Self {
        Self {
            mode,
            loader,
            template_paths: RwLock::new(HashMap::new()),
            template_cache: Cache::builder().build(),
            template_bank: Cache::builder().build(),
            generation: AtomicU64::new(0),
        }
    }

    /// The validation mode chosen at construction.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Register `root` as the newest override for `name`.
    ///
    /// See [`TemplateConfig::lazy_load`](super::TemplateConfig::lazy_load).
    pub fn lazy_load<I, S>(
        &self,
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

        {
            let mut registry = self
                .template_paths
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let registration = registry.entry(name.clone()).or_default();
            registration.paths.push_root(root);
            registration.paths.filenames = filenames;

            let next = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            let stale = std::mem::replace(&mut registration.generation, next);
            self.template_cache.invalidate(&(name.clone(), stale));
        }

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
    /// Concurrent callers for the same registration wait on one load and
    /// receive the same list. Failed loads are not cached.
    pub fn get_template_images(&self, name: &str) -> Result<Arc<[TemplateImage]>> {
        let Some(registration) = self.registration(name) else {
            error!(name = %name, "Invalid template name");
            return Err(TemplateCacheError::UnknownName {
                name: name.to_string(),
            });
        };

        let key = (name.to_string(), registration.generation);
        let images = self
            .template_cache
            .try_get_with(key.clone(), || self.load_images(name, &registration.paths))
            .map_err(unshare)?;

        if self.generation_of(name) != Some(registration.generation) {
            debug!(name = %name, "Registration changed during load, result not cached");
            self.template_cache.invalidate(&key);
        }

        Ok(images)
    }

    fn registration(&self, name: &str) -> Option<Registration> {
        self.template_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn generation_of(&self, name: &str) -> Option<u64> {
        self.template_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|registration| registration.generation)
    }

    fn load_images(&self, name: &str, paths: &TemplatePaths) -> Result<Arc<[TemplateImage]>> {
        debug!(name = %name, "Load template images");

        let mut images = Vec::with_capacity(paths.filenames.len());
        for filename in &paths.filenames {
            let resolved = paths.candidates(filename).find_map(|path| {
                let image = self.load_single_image(&path);
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

        Ok(images.into())
    }

    /// Decoded image at a resolved path, through the raw bank.
    ///
    /// Paths that do not exist are not banked.
    pub fn load_single_image(&self, path: &Path) -> TemplateImage {
        if let Some(image) = self.template_bank.get(path) {
            debug!(path = %path.display(), "Withdraw image");
            return image;
        }

        if !self.loader.exists(path) {
            debug!(path = %path.display(), "Image not found");
            return TemplateImage::empty(path);
        }

        self.template_bank.get_with(path.to_path_buf(), || {
            debug!(path = %path.display(), "Read image");
            self.loader.decode(path)
        })
    }

    /// Drop every registration, assembled list and banked image.
    pub fn clear(&self) {
        debug!("Clear template config");

        let mut registry = self
            .template_paths
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registry.clear();
        self.template_cache.invalidate_all();
        self.template_bank.invalidate_all();
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .template_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }

    /// Search paths registered for `name`.
    pub fn paths(&self, name: &str) -> Option<TemplatePaths> {
        self.registration(name).map(|registration| registration.paths)
    }

    /// Whether `name` currently has an assembled list.
    pub fn is_cached(&self, name: &str) -> bool {
        self.generation_of(name).is_some_and(|generation| {
            self.template_cache
                .contains_key(&(name.to_string(), generation))
        })
    }

    /// Entry counts for each tier.
    pub fn stats(&self) -> CacheStats {
        self.template_cache.run_pending_tasks();
        self.template_bank.run_pending_tasks();

        let registered = self
            .template_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();

        CacheStats {
            registered,
            assembled: self.template_cache.entry_count() as usize,
            banked: self.template_bank.entry_count() as usize,
        }
    }
}

impl<L> fmt::Debug for SharedTemplateConfig<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTemplateConfig")
            .field("mode", &self.mode)
            .field("assembled", &self.template_cache.entry_count())
            .field("banked", &self.template_bank.entry_count())
            .finish_non_exhaustive()
    }
}

/// Take back ownership of an error shared among the waiters of one load.
fn unshare(err: Arc<TemplateCacheError>) -> TemplateCacheError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| match &*shared {
        TemplateCacheError::UnknownName { name } => {
            TemplateCacheError::UnknownName { name: name.clone() }
        }
        TemplateCacheError::EmptyResolution { name, filename } => {
            TemplateCacheError::EmptyResolution {
                name: name.clone(),
                filename: filename.clone(),
            }
        }
        TemplateCacheError::EmptyAssembledSet { name } => {
            TemplateCacheError::EmptyAssembledSet { name: name.clone() }
        }
        other => TemplateCacheError::Other(anyhow::anyhow!("{other}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockImageLoader;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Loader that parks inside `decode` of one path until released.
    struct GatedLoader {
        inner: MockImageLoader,
        gated: PathBuf,
        started: Mutex<Sender<()>>,
        release: Mutex<Receiver<()>>,
    }

    impl GatedLoader {
        fn new(gated: &str) -> (Self, Receiver<()>, Sender<()>) {
            let (started_tx, started_rx) = mpsc::channel();
            let (release_tx, release_rx) = mpsc::channel();
            let loader = Self {
                inner: MockImageLoader::new(),
                gated: PathBuf::from(gated),
                started: Mutex::new(started_tx),
                release: Mutex::new(release_rx),
            };
            (loader, started_rx, release_tx)
        }
    }

    impl ImageLoader for GatedLoader {
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn decode(&self, path: &Path) -> TemplateImage {
            if path == self.gated {
                self.started.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            self.inner.decode(path)
        }
    }

    #[test]
    fn concurrent_lookups_decode_each_path_once() {
        let loader = MockImageLoader::new();
        loader.add_image("/r/a.png", 2, 2);
        loader.add_image("/r/b.png", 2, 2);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        config.lazy_load("t", "/r", ["a.png", "b.png"]).unwrap();
        config.lazy_load("u", "/r", ["b.png"]).unwrap();

        thread::scope(|s| {
            for i in 0..8 {
                let config = &config;
                s.spawn(move || {
                    let name = if i % 2 == 0 { "t" } else { "u" };
                    assert!(!config.get_template_images(name).unwrap().is_empty());
                });
            }
        });

        assert_eq!(loader.decodes_of("/r/a.png"), 1);
        assert_eq!(loader.decodes_of("/r/b.png"), 1);
        assert_eq!(config.stats().assembled, 2);
    }

    #[test]
    fn waiter_reuses_list_of_inflight_load() {
        let (loader, started, release) = GatedLoader::new("/r/a.png");
        loader.inner.add_image("/r/a.png", 2, 2);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        config.lazy_load("t", "/r", ["a.png"]).unwrap();

        let (first, second) = thread::scope(|s| {
            let first = s.spawn(|| config.get_template_images("t").unwrap());
            started.recv().unwrap();

            let second = s.spawn(|| config.get_template_images("t").unwrap());
            thread::sleep(Duration::from_millis(20));
            release.send(()).unwrap();

            (first.join().unwrap(), second.join().unwrap())
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.inner.decodes_of("/r/a.png"), 1);
    }

    #[test]
    fn load_racing_reregistration_is_not_cached() {
        let (loader, started, release) = GatedLoader::new("/old/a.png");
        loader.inner.add_image("/old/a.png", 1, 1);
        loader.inner.add_image("/new/a.png", 2, 2);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        config.lazy_load("t", "/old", ["a.png"]).unwrap();

        let raced = thread::scope(|s| {
            let load = s.spawn(|| config.get_template_images("t").unwrap());
            started.recv().unwrap();

            config.lazy_load("t", "/new", ["a.png"]).unwrap();
            release.send(()).unwrap();

            load.join().unwrap()
        });

        assert_eq!(raced[0].source(), Path::new("/old/a.png"));
        assert!(!config.is_cached("t"));

        let images = config.get_template_images("t").unwrap();
        assert_eq!(images[0].source(), Path::new("/new/a.png"));
        assert!(config.is_cached("t"));
    }

    #[test]
    fn cache_hit_returns_same_allocation() {
        let loader = MockImageLoader::new();
        loader.add_image("/r/a.png", 1, 1);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        config.lazy_load("t", "/r", ["a.png"]).unwrap();

        let first = config.get_template_images("t").unwrap();
        let second = config.get_template_images("t").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn override_and_invalidation() {
        let loader = MockImageLoader::new();
        loader.add_image("/skin1/idle.png", 1, 1);
        loader.add_image("/skin2/idle.png", 2, 2);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        config.lazy_load("hero", "/skin1", ["idle.png"]).unwrap();
        let before = config.get_template_images("hero").unwrap();
        assert_eq!(before[0].source(), Path::new("/skin1/idle.png"));

        config.lazy_load("hero", "/skin2", ["idle.png"]).unwrap();
        assert!(!config.is_cached("hero"));
        let after = config.get_template_images("hero").unwrap();
        assert_eq!(after[0].source(), Path::new("/skin2/idle.png"));
    }

    #[test]
    fn strict_and_lenient_diverge() {
        let loader = MockImageLoader::new();
        loader.add_image("/r/a.png", 1, 1);

        let strict = SharedTemplateConfig::with_loader(ValidationMode::Strict, &loader);
        assert!(matches!(
            strict.lazy_load("t", "/r", ["a.png", "b.png"]),
            Err(TemplateCacheError::EmptyResolution { .. })
        ));
        assert!(!strict.is_cached("t"));

        let lenient = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        lenient.lazy_load("t", "/r", ["a.png", "b.png"]).unwrap();
        assert_eq!(lenient.get_template_images("t").unwrap().len(), 1);
    }

    #[test]
    fn unknown_name_and_clear() {
        let loader = MockImageLoader::new();
        loader.add_image("/r/a.png", 1, 1);

        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);
        assert!(matches!(
            config.get_template_images("t"),
            Err(TemplateCacheError::UnknownName { .. })
        ));
        assert_eq!(config.stats(), CacheStats::default());

        config.lazy_load("t", "/r", ["a.png"]).unwrap();
        config.get_template_images("t").unwrap();
        assert_eq!(config.names(), vec!["t".to_string()]);

        config.clear();
        assert_eq!(config.stats().registered, 0);
        assert!(config.paths("t").is_none());
        assert!(config.get_template_images("t").is_err());

        config.lazy_load("t", "/r", ["a.png"]).unwrap();
        config.get_template_images("t").unwrap();
        assert_eq!(loader.decodes_of("/r/a.png"), 2);
    }

    #[test]
    fn missing_path_is_not_banked() {
        let loader = MockImageLoader::new();
        let config = SharedTemplateConfig::with_loader(ValidationMode::Lenient, &loader);

        assert!(config.load_single_image(Path::new("/r/a.png")).is_empty());
        assert_eq!(config.stats().banked, 0);

        loader.add_image("/r/a.png", 1, 1);
        assert!(!config.load_single_image(Path::new("/r/a.png")).is_empty());
        assert_eq!(config.stats().banked, 1);
    }
}
