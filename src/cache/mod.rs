//! Template image caching.
//!
//! This module provides the two-level, lazy-loading cache for named template
//! image sets:
//! - [`TemplateConfig`] for single-owner use
//! - [`SharedTemplateConfig`] for concurrent use
//!
//! # Resolution Order
//!
//! Each logical name has an ordered list of roots. For every filename the
//! roots are searched newest registration first, so a later registration
//! overrides earlier ones file by file.
//!
//! # Example
//!
//! ```no_run
//! use template_cache::cache::{TemplateConfig, ValidationMode};
//!
//! let mut config = TemplateConfig::new(ValidationMode::Lenient);
//! config.lazy_load("hero", "/skins/base", ["idle.png", "attack.png"]).unwrap();
//! config.lazy_load("hero", "/skins/winter", ["idle.png", "attack.png"]).unwrap();
//!
//! for image in config.get_template_images("hero").unwrap() {
//!     println!("{} {:?}", image.source().display(), image.dimensions());
//! }
//! ```

pub mod entry;
pub mod loader;
pub mod mock;
pub mod shared;
pub mod store;
pub mod validation;

pub use entry::{TemplateImage, TemplatePaths};
pub use loader::{FsImageLoader, ImageLoader};
pub use mock::MockImageLoader;
pub use shared::SharedTemplateConfig;
pub use store::{CacheStats, TemplateConfig};
pub use validation::ValidationMode;
