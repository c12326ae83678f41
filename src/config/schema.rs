//! Template manifest schema.
//!
//! A manifest is an ordered list of registrations. Applying it replays each
//! entry through `lazy_load`, so a later entry for the same name becomes that
//! name's highest-priority root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::{ImageLoader, SharedTemplateConfig, TemplateConfig, ValidationMode};
use crate::error::TemplateCacheError;

/// Root structure of a `templates.yml` manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateManifest {
    /// Validation mode requested by the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ValidationMode>,

    /// Registrations, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateEntry>,
}

/// One registration: a root directory and the filenames looked up under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Logical template name
    pub name: String,

    /// Root directory (relative roots resolve against the manifest directory)
    pub root: PathBuf,

    /// Relative filenames, in output order
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// A registration that failed while applying a manifest.
#[derive(Debug)]
pub struct RegistrationFailure {
    /// Logical template name
    pub name: String,
    /// Root that was being registered
    pub root: PathBuf,
    /// Why registration failed
    pub error: TemplateCacheError,
}

impl TemplateManifest {
    /// Make every relative root absolute against `base`.
    pub fn resolve_roots(&mut self, base: &Path) {
        for entry in &mut self.templates {
            if entry.root.is_relative() {
                entry.root = base.join(&entry.root);
            }
        }
    }

    /// Append another manifest's entries after this one's.
    ///
    /// A mode set by `other` wins.
    pub fn layer(&mut self, other: TemplateManifest) {
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        self.templates.extend(other.templates);
    }

    /// Mode to run with: the manifest's mode unless `strict` forces it.
    pub fn effective_mode(&self, strict: bool) -> ValidationMode {
        if strict {
            ValidationMode::Strict
        } else {
            self.mode.unwrap_or_default()
        }
    }

    /// Register every entry, in order, and collect the failures.
    pub fn apply<L: ImageLoader>(&self, config: &mut TemplateConfig<L>) -> Vec<RegistrationFailure> {
        self.templates
            .iter()
            .filter_map(|entry| {
                config
                    .lazy_load(&entry.name, &entry.root, &entry.filenames)
                    .err()
                    .map(|error| entry.failure(error))
            })
            .collect()
    }

    /// Register every entry into a shared cache, in order.
    pub fn apply_shared<L: ImageLoader>(
        &self,
        config: &SharedTemplateConfig<L>,
    ) -> Vec<RegistrationFailure> {
        self.templates
            .iter()
            .filter_map(|entry| {
                config
                    .lazy_load(&entry.name, &entry.root, &entry.filenames)
                    .err()
                    .map(|error| entry.failure(error))
            })
            .collect()
    }

    /// Distinct template names in first-registration order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.templates {
            if !names.contains(&entry.name.as_str()) {
                names.push(&entry.name);
            }
        }
        names
    }
}

impl TemplateEntry {
    fn failure(&self, error: TemplateCacheError) -> RegistrationFailure {
        RegistrationFailure {
            name: self.name.clone(),
            root: self.root.clone(),
            error,
        }
    }
}
