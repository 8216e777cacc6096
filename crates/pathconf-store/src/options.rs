//! Store options
//!
//! Identifies which session slot a store binds to.

use serde::{Deserialize, Serialize};

/// Default prefix of the session key holding an overlay
pub const DEFAULT_KEY_PREFIX: &str = "ConfigFile";

/// Options for [`PathConfigStore`](crate::PathConfigStore)
///
/// The session key is `key_prefix` followed by `server_index`, so each server
/// being edited gets its own overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Index of the server whose configuration session this store edits
    pub server_index: u32,
    /// Prefix of the session key
    pub key_prefix: String,
}

impl StoreOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With server index
    #[inline]
    #[must_use]
    pub fn with_server_index(mut self, server_index: u32) -> Self {
        self.server_index = server_index;
        self
    }

    /// With session key prefix
    #[inline]
    #[must_use]
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Session key of the overlay slot
    #[inline]
    #[must_use]
    pub fn session_key(&self) -> String {
        format!("{}{}", self.key_prefix, self.server_index)
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            server_index: 1,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_key() {
        assert_eq!(StoreOptions::new().session_key(), "ConfigFile1");
    }

    #[test]
    fn builder_overrides() {
        let options = StoreOptions::new().with_server_index(3).with_key_prefix("Prefs");
        assert_eq!(options.session_key(), "Prefs3");
    }

    #[test]
    fn deserialize_partial_options() {
        let options: StoreOptions = serde_json::from_str(r#"{"server_index": 2}"#).unwrap();
        assert_eq!(options.key_prefix, DEFAULT_KEY_PREFIX);
        assert_eq!(options.session_key(), "ConfigFile2");
    }
}
