//! Loaded manifest plus the cache it was applied to.

use std::path::{Path, PathBuf};

use crate::cache::{TemplateConfig, ValidationMode};
use crate::config::{
    find_manifest, load_layered_manifests, validate, RegistrationFailure, TemplateManifest,
    DEFAULT_MANIFEST,
};
use crate::error::{Result, TemplateCacheError};

/// State shared by every command: the layered manifest and a populated cache.
#[derive(Debug)]
pub struct TemplateSession {
    /// Layered manifest
    pub manifest: TemplateManifest,
    /// Cache with every manifest entry registered
    pub config: TemplateConfig,
    /// Registrations rejected in strict mode
    pub failures: Vec<RegistrationFailure>,
}

impl TemplateSession {
    /// Load, validate and apply the given manifests.
    ///
    /// With no manifests, `templates.yml` in `working_dir` is used.
    pub fn open(manifests: &[PathBuf], working_dir: &Path, strict: bool) -> Result<Self> {
        let paths = if manifests.is_empty() {
            let found = find_manifest(working_dir).ok_or_else(|| {
                TemplateCacheError::ConfigNotFound {
                    path: working_dir.join(DEFAULT_MANIFEST),
                }
            })?;
            vec![found]
        } else {
            manifests
                .iter()
                .map(|p| if p.is_relative() { working_dir.join(p) } else { p.clone() })
                .collect()
        };

        let manifest = load_layered_manifests(&paths)?;
        validate(&manifest)?;

        let mode = manifest.effective_mode(strict);
        tracing::debug!(%mode, entries = manifest.templates.len(), "Applying manifest");

        let mut config = TemplateConfig::new(mode);
        let failures = manifest.apply(&mut config);

        Ok(Self {
            manifest,
            config,
            failures,
        })
    }

    /// The mode the cache runs in.
    pub fn mode(&self) -> ValidationMode {
        self.config.mode()
    }

    /// Distinct template names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.manifest.names().into_iter().map(String::from).collect()
    }
}
