//! Settings sources and compiled defaults
//!
//! A [`SettingsSource`] supplies the default tree, a table of absolute-path
//! overrides and a value database. [`Defaults`] is the immutable result of
//! applying the overrides once; it is shared between stores through `Arc`.

use std::path::Path;

use pathconf_tree::{ConfigPath, ConfigTree, ConfigValue, FlatConfig};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Compiled settings document shipped with the crate
const BUILTIN_SETTINGS: &str = include_str!("builtin_settings.json");

/// Source of default configuration
pub trait SettingsSource {
    /// Default configuration tree
    fn default_tree(&self) -> ConfigTree;

    /// Absolute-path assignments applied on top of the default tree
    fn overrides(&self) -> FlatConfig;

    /// Allowed values for non-standard fields
    fn value_db(&self) -> ConfigTree {
        ConfigTree::new()
    }
}

/// Settings document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// TOML
    Toml,
}

impl SettingsFormat {
    /// Detect format from a file extension
    ///
    /// # Errors
    /// Returns error if the extension is missing or unknown
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Settings held in memory
///
/// Deserializes from a document with top-level `defaults`, `overrides` and
/// `values` keys, each optional:
///
/// ```yaml
/// defaults:
///   Servers:
///     "1":
///       host: localhost
/// overrides:
///   Servers/1/extension: mysqli
/// values:
///   Servers:
///     "1":
///       auth_type: [cookie, config]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSettings {
    /// Default configuration tree
    pub defaults: ConfigTree,
    /// Absolute-path overrides
    pub overrides: FlatConfig,
    /// Value database
    pub values: ConfigTree,
}

impl StaticSettings {
    /// Create settings from a default tree
    #[inline]
    #[must_use]
    pub fn new(defaults: ConfigTree) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// With override assignments
    #[must_use]
    pub fn with_overrides<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        self.overrides = overrides.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// With value database
    #[inline]
    #[must_use]
    pub fn with_value_db(mut self, values: ConfigTree) -> Self {
        self.values = values;
        self
    }

    /// Settings compiled into the crate
    ///
    /// # Errors
    /// Returns error if the embedded document is malformed
    pub fn builtin() -> Result<Self, SettingsError> {
        Self::parse(BUILTIN_SETTINGS, SettingsFormat::Json)
    }

    /// Parse a settings document
    ///
    /// # Errors
    /// Returns error if the document does not parse in the given format
    pub fn parse(text: &str, format: SettingsFormat) -> Result<Self, SettingsError> {
        let settings = match format {
            SettingsFormat::Json => serde_json::from_str(text)?,
            SettingsFormat::Yaml => serde_yaml::from_str(text)?,
            SettingsFormat::Toml => toml::from_str(text)?,
        };
        Ok(settings)
    }

    /// Load a settings document, detecting the format from the extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format)
    }
}

impl SettingsSource for StaticSettings {
    fn default_tree(&self) -> ConfigTree {
        self.defaults.clone()
    }

    fn overrides(&self) -> FlatConfig {
        self.overrides.clone()
    }

    fn value_db(&self) -> ConfigTree {
        self.values.clone()
    }
}

/// Immutable default configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    tree: ConfigTree,
    value_db: ConfigTree,
}

impl Defaults {
    /// Build defaults from a settings source, applying every override
    #[must_use]
    pub fn load<S: SettingsSource + ?Sized>(source: &S) -> Self {
        let mut tree = source.default_tree();
        let overrides = source.overrides();
        for (path, value) in overrides {
            tree.write(&ConfigPath::parse(&path), value);
        }
        tracing::debug!(entries = tree.len(), "loaded default configuration");
        Self {
            tree,
            value_db: source.value_db(),
        }
    }

    /// Defaults made of a bare tree, without overrides or value database
    #[inline]
    #[must_use]
    pub fn from_tree(tree: ConfigTree) -> Self {
        Self {
            tree,
            value_db: ConfigTree::new(),
        }
    }

    /// Default value at a canonical path
    #[inline]
    #[must_use]
    pub fn get(&self, canonical: &ConfigPath) -> Option<&ConfigValue> {
        self.tree.read(canonical)
    }

    /// Value database entry at `path`
    #[inline]
    #[must_use]
    pub fn db_entry(&self, path: &ConfigPath) -> Option<&ConfigValue> {
        self.value_db.read(path)
    }

    /// Whole default tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Flattened default tree
    #[inline]
    #[must_use]
    pub fn flatten(&self) -> FlatConfig {
        self.tree.flatten()
    }
}
