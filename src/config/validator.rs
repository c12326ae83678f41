//! Manifest validation rules.
//!
//! - Entries must have a non-empty name
//! - Entries must list at least one filename
//! - Filenames must be non-empty

use crate::config::schema::TemplateManifest;
use crate::error::{Result, TemplateCacheError};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Index of the offending entry
    pub entry: usize,
}

/// Validate a manifest and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_manifest(manifest: &TemplateManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, entry) in manifest.templates.iter().enumerate() {
        if entry.name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "missing-name".to_string(),
                message: format!("Template entry #{} has no name", index + 1),
                entry: index,
            });
        }

        if entry.filenames.is_empty() {
            errors.push(ValidationError {
                rule: "missing-filenames".to_string(),
                message: format!("Template '{}' lists no filenames", entry.name),
                entry: index,
            });
        }

        if entry.filenames.iter().any(|f| f.trim().is_empty()) {
            errors.push(ValidationError {
                rule: "empty-filename".to_string(),
                message: format!("Template '{}' has an empty filename", entry.name),
                entry: index,
            });
        }
    }

    errors
}

/// Validate and return a single error joining every message.
pub fn validate(manifest: &TemplateManifest) -> Result<()> {
    let errors = validate_manifest(manifest);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(TemplateCacheError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
