//! Template manifest loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use template_cache::config::{load_manifest, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("templates.yml");
//! fs::write(
//!     &path,
//!     "templates:\n  - name: hero\n    root: skin\n    filenames: [idle.png]\n",
//! )
//! .unwrap();
//!
//! let manifest = load_manifest(&path).unwrap();
//! validate(&manifest).unwrap();
//! assert_eq!(manifest.templates[0].root, temp.path().join("skin"));
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_manifest, load_layered_manifests, load_manifest, parse_manifest, DEFAULT_MANIFEST,
};
pub use schema::{RegistrationFailure, TemplateEntry, TemplateManifest};
pub use validator::{validate, validate_manifest, ValidationError};
