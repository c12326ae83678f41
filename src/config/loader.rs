//! Manifest discovery and loading.
//!
//! Manifests are YAML files. Several can be layered: entries of later files
//! are registered after those of earlier files, so they take priority.

use crate::config::schema::TemplateManifest;
use crate::error::{Result, TemplateCacheError};
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "templates.yml";

/// Find the default manifest in `dir`, if present.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(DEFAULT_MANIFEST);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single manifest file.
///
/// Relative roots are resolved against the directory containing the file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_manifest(path: &Path) -> Result<TemplateManifest> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TemplateCacheError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateCacheError::Io(e)
        }
    })?;

    let mut manifest = parse_manifest(&content, path)?;
    if let Some(base) = path.parent() {
        manifest.resolve_roots(base);
    }

    tracing::debug!(
        path = %path.display(),
        entries = manifest.templates.len(),
        "Loaded manifest"
    );

    Ok(manifest)
}

/// Parse YAML content into a manifest.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<TemplateManifest> {
    // An empty file is a manifest with no entries.
    if content.trim().is_empty() {
        return Ok(TemplateManifest::default());
    }

    serde_yaml::from_str(content).map_err(|e| TemplateCacheError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load several manifests and layer them in the given order.
pub fn load_layered_manifests<P: AsRef<Path>>(paths: &[P]) -> Result<TemplateManifest> {
    let mut merged = TemplateManifest::default();

    for path in paths {
        merged.layer(load_manifest(path.as_ref())?);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ValidationMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_manifest_in_dir() {
        let temp = TempDir::new().unwrap();
        assert!(find_manifest(temp.path()).is_none());

        fs::write(temp.path().join(DEFAULT_MANIFEST), "").unwrap();
        assert_eq!(
            find_manifest(temp.path()),
            Some(temp.path().join(DEFAULT_MANIFEST))
        );
    }

    #[test]
    fn load_manifest_resolves_relative_roots() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_MANIFEST);
        fs::write(
            &path,
            "templates:\n  - name: hero\n    root: skin1\n    filenames: [idle.png]\n",
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.templates[0].root, temp.path().join("skin1"));
    }

    #[test]
    fn load_manifest_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_manifest(&temp.path().join("nope.yml"));
        assert!(matches!(
            result,
            Err(TemplateCacheError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn load_manifest_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_MANIFEST);
        fs::write(&path, "templates: [unclosed").unwrap();

        let result = load_manifest(&path);
        assert!(matches!(
            result,
            Err(TemplateCacheError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn empty_file_is_empty_manifest() {
        let manifest = parse_manifest("  \n", Path::new("templates.yml")).unwrap();
        assert!(manifest.templates.is_empty());
    }

    #[test]
    fn layered_manifests_keep_file_order() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("base.yml");
        let local = temp.path().join("local.yml");
        fs::write(
            &base,
            "mode: lenient\ntemplates:\n  - name: hero\n    root: /skin1\n    filenames: [idle.png]\n",
        )
        .unwrap();
        fs::write(
            &local,
            "mode: strict\ntemplates:\n  - name: hero\n    root: /skin2\n    filenames: [idle.png]\n",
        )
        .unwrap();

        let manifest = load_layered_manifests(&[&base, &local]).unwrap();
        assert_eq!(manifest.mode, Some(ValidationMode::Strict));
        let roots: Vec<_> = manifest.templates.iter().map(|e| e.root.clone()).collect();
        assert_eq!(roots, vec![PathBuf::from("/skin1"), PathBuf::from("/skin2")]);
    }
}
