//! Error types for pathconf Store
//!
//! Store operations themselves are total; errors only arise at the edges
//! where settings documents are parsed or read from disk.

use std::path::PathBuf;

/// Settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// JSON document could not be parsed
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML document could not be parsed
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML document could not be parsed
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings file could not be read
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension does not name a known format
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(String),
}

impl SettingsError {
    /// Check if the error comes from malformed document content
    #[inline]
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Yaml(_) | Self::Toml(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_classified() {
        let err = SettingsError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(err.is_parse_error());
        assert!(err.to_string().starts_with("invalid JSON settings"));

        let err = SettingsError::UnsupportedFormat("ini".into());
        assert!(!err.is_parse_error());
        assert_eq!(err.to_string(), "unsupported settings format: ini");
    }
}
