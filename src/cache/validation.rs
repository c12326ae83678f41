//! Validation policy for template registration and loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strictly the cache treats unresolvable templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Resolve at registration time; any unresolved filename fails the
    /// whole name.
    Strict,
    /// Defer resolution to first use; unresolved filenames are skipped.
    #[default]
    Lenient,
}

impl ValidationMode {
    /// Whether registration should eagerly resolve images.
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!(
                "Invalid validation mode '{}'. Use 'strict' or 'lenient'",
                other
            )),
        }
    }
}
