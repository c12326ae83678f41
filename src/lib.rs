//! template-cache - Lazy-loading cache for named template image sets.
//!
//! Callers register, under a logical name, one or more candidate root
//! directories and a fixed list of relative filenames. Images are resolved
//! and decoded on first use, then served from memory.
//!
//! # Modules
//!
//! - [`cache`] - The two-level image cache and its loaders
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - YAML template manifests
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use template_cache::cache::{MockImageLoader, TemplateConfig, ValidationMode};
//!
//! let loader = MockImageLoader::new();
//! loader.add_image("/skin1/idle.png", 4, 4);
//! loader.add_image("/skin2/idle.png", 8, 8);
//!
//! let mut config = TemplateConfig::with_loader(ValidationMode::Lenient, &loader);
//! config.lazy_load("hero", "/skin1", ["idle.png"]).unwrap();
//! config.lazy_load("hero", "/skin2", ["idle.png"]).unwrap();
//!
//! let images = config.get_template_images("hero").unwrap();
//! assert_eq!(images[0].dimensions(), (8, 8));
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;

pub use cache::{SharedTemplateConfig, TemplateConfig, TemplateImage, ValidationMode};
pub use error::{Result, TemplateCacheError};
