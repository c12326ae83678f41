//! Error types for template cache operations.
//!
//! This module defines [`TemplateCacheError`], the error type returned by the
//! cache, the manifest loader and the CLI, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Cache failures (`UnknownName`, `EmptyResolution`, `EmptyAssembledSet`)
//!   are logged where they are detected and returned as `Err`; a failed
//!   lookup never panics and never leaves a partial assembled entry
//! - Manifest failures carry the offending path
//! - Use `anyhow::Error` (via `TemplateCacheError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for template cache operations.
#[derive(Debug, Error)]
pub enum TemplateCacheError {
    /// The logical name was never registered.
    #[error("Unknown template name: {name}")]
    UnknownName { name: String },

    /// A filename resolved to no usable image under any registered root.
    #[error("Template image '{filename}' for '{name}' is empty under every root")]
    EmptyResolution { name: String, filename: String },

    /// No usable image remained after processing every filename.
    #[error("Template list for '{name}' is empty")]
    EmptyAssembledSet { name: String },

    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Manifest parsed but is structurally invalid.
    #[error("Invalid manifest: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemplateCacheError {
    /// Whether this error came from resolving images (as opposed to
    /// configuration or I/O).
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownName { .. } | Self::EmptyResolution { .. } | Self::EmptyAssembledSet { .. }
        )
    }
}

/// Result type alias for template cache operations.
pub type Result<T> = std::result::Result<T, TemplateCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_displays_name() {
        let err = TemplateCacheError::UnknownName {
            name: "hero".into(),
        };
        assert!(err.to_string().contains("hero"));
    }

    #[test]
    fn empty_resolution_displays_name_and_filename() {
        let err = TemplateCacheError::EmptyResolution {
            name: "hero".into(),
            filename: "attack.png".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hero"));
        assert!(msg.contains("attack.png"));
    }

    #[test]
    fn empty_assembled_set_displays_name() {
        let err = TemplateCacheError::EmptyAssembledSet {
            name: "hero".into(),
        };
        assert!(err.to_string().contains("hero"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = TemplateCacheError::ConfigParseError {
            path: PathBuf::from("/templates.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/templates.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn resolution_failures_are_classified() {
        assert!(TemplateCacheError::UnknownName { name: "a".into() }.is_resolution_failure());
        assert!(TemplateCacheError::EmptyAssembledSet { name: "a".into() }.is_resolution_failure());
        assert!(!TemplateCacheError::ConfigNotFound {
            path: PathBuf::from("x.yml")
        }
        .is_resolution_failure());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TemplateCacheError = io_err.into();
        assert!(matches!(err, TemplateCacheError::Io(_)));
    }
}
