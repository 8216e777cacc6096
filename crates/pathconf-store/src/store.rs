//! Path-addressed configuration store
//!
//! [`PathConfigStore`] keeps a sparse overlay of non-default values in a
//! session slot, on top of shared immutable [`Defaults`].

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use pathconf_tree::{ConfigPath, ConfigTree, ConfigValue, FlatConfig};
use tracing::{debug, info, trace};

use crate::options::StoreOptions;
use crate::session::SessionStore;
use crate::settings::Defaults;

/// Per-session configuration overlay
///
/// Every operation is total: missing paths yield `None` or the caller's
/// default, and writes rejected by a policy are silent no-ops.
///
/// # Policies
/// - **Persist keys**: canonical paths always written and always exported,
///   even when equal to their default.
/// - **Allowed keys**: when set, writes to other canonical paths are ignored.
/// - **Read/write mapping**: external path → internal path, applied when
///   importing a tree and reversed when exporting.
pub struct PathConfigStore {
    defaults: Arc<Defaults>,
    base: Option<ConfigTree>,
    session: Arc<dyn SessionStore>,
    id: String,
    persist_keys: IndexSet<String>,
    allowed_keys: Option<IndexSet<String>>,
    read_write_mapping: IndexMap<String, String>,
}

impl PathConfigStore {
    /// Bind a store to its session slot
    ///
    /// `base` is the externally supplied configuration; without it the store
    /// runs in setup mode. The slot is initialized to an empty tree when the
    /// session does not hold one yet.
    pub fn new(
        defaults: Arc<Defaults>,
        session: Arc<dyn SessionStore>,
        base: Option<ConfigTree>,
        options: &StoreOptions,
    ) -> Self {
        let id = options.session_key();
        if session.read(&id).is_none() {
            session.write(&id, ConfigTree::new());
        }
        info!(id = %id, setup = base.is_none(), "configuration store bound to session");
        Self {
            defaults,
            base,
            session,
            id,
            persist_keys: IndexSet::new(),
            allowed_keys: None,
            read_write_mapping: IndexMap::new(),
        }
    }

    /// Session key of the overlay
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Check if running without a base configuration
    #[inline]
    #[must_use]
    pub fn is_in_setup(&self) -> bool {
        self.base.is_none()
    }

    /// Replace the persist keys
    pub fn set_persist_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.persist_keys = keys.into_iter().map(Into::into).collect();
    }

    /// Current persist keys, in the order they were given
    #[inline]
    #[must_use]
    pub fn persist_keys_map(&self) -> &IndexSet<String> {
        &self.persist_keys
    }

    /// Restrict [`set`](Self::set) to the given canonical paths
    pub fn set_allowed_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_keys = Some(keys.into_iter().map(Into::into).collect());
    }

    /// Remove the allowed-keys filter
    #[inline]
    pub fn clear_allowed_keys(&mut self) {
        self.allowed_keys = None;
    }

    /// Replace the read/write mapping (external path → internal path)
    pub fn set_read_write_mapping<I, K, V>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.read_write_mapping = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Clear the overlay
    pub fn reset_config_data(&self) {
        debug!(id = %self.id, "overlay reset");
        self.session.write(&self.id, ConfigTree::new());
    }

    /// Replace the overlay verbatim
    pub fn set_config_data(&self, tree: ConfigTree) {
        debug!(id = %self.id, entries = tree.len(), "overlay replaced");
        self.session.write(&self.id, tree);
    }

    /// Raw overlay as stored in the session
    #[inline]
    #[must_use]
    pub fn config_data(&self) -> ConfigTree {
        self.overlay()
    }

    /// Set the value at `path`
    ///
    /// Values equal to the default are removed from the overlay rather than
    /// stored; see [`set_with_canonical`](Self::set_with_canonical).
    pub fn set(&self, path: &str, value: impl Into<ConfigValue>) {
        let path = ConfigPath::parse(path);
        let canonical = path.canonical();
        self.apply_set(&path, value.into(), &canonical);
    }

    /// Set the value at `path`, looking up policies and defaults under
    /// `canonical`
    ///
    /// 1. Outside the allowed keys (when set): ignored.
    /// 2. Persist key: written unconditionally.
    /// 3. Setup mode: removed when equal to the default, or when both the
    ///    value and the default are blank.
    /// 4. Otherwise: removed when equal to the default and the base
    ///    configuration holds that same default.
    /// 5. Anything not removed is written.
    pub fn set_with_canonical(&self, path: &str, value: impl Into<ConfigValue>, canonical: &str) {
        self.apply_set(
            &ConfigPath::parse(path),
            value.into(),
            &ConfigPath::parse(canonical),
        );
    }

    fn apply_set(&self, path: &ConfigPath, value: ConfigValue, canonical: &ConfigPath) {
        let canonical_key = canonical.to_string();
        if let Some(allowed) = &self.allowed_keys {
            if !allowed.contains(&canonical_key) {
                debug!(path = %path, "write outside allowed keys ignored");
                return;
            }
        }

        if self.persist_keys.contains(&canonical_key) {
            trace!(path = %path, "persisted key written");
            self.update_overlay(|overlay| overlay.write(path, value));
            return;
        }

        let default = self.defaults.get(canonical);
        let equals_default = default == Some(&value);
        let remove = match &self.base {
            None => equals_default || (value.is_blank() && default.map_or(true, ConfigValue::is_blank)),
            Some(base) => equals_default && base.read(canonical) == default,
        };

        if remove {
            debug!(path = %path, "value matches default, removed from overlay");
            self.update_overlay(|overlay| {
                overlay.remove(path);
            });
        } else {
            trace!(path = %path, "value written");
            self.update_overlay(|overlay| overlay.write(path, value));
        }
    }

    /// Populate the overlay from a full configuration tree
    ///
    /// Each flattened path is translated through the read/write mapping and
    /// then set with itself as canonical path.
    pub fn update_from_tree(&self, tree: &ConfigTree) {
        for (path, value) in tree.flatten() {
            let path = match self.read_write_mapping.get(&path) {
                Some(internal) => ConfigPath::parse(internal),
                None => ConfigPath::parse(&path),
            };
            self.apply_set(&path, value, &path);
        }
    }

    /// Overlay value at `path`
    #[must_use]
    pub fn get(&self, path: &str) -> Option<ConfigValue> {
        self.overlay().read(&ConfigPath::parse(path)).cloned()
    }

    /// Overlay value at `path`, or `default`
    #[must_use]
    pub fn get_or(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get(path).unwrap_or_else(|| default.into())
    }

    /// Default value at a canonical path
    #[must_use]
    pub fn get_default(&self, canonical: &str) -> Option<ConfigValue> {
        self.defaults.get(&ConfigPath::parse(canonical)).cloned()
    }

    /// Default value at a canonical path, or `default`
    #[must_use]
    pub fn get_default_or(&self, canonical: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get_default(canonical).unwrap_or_else(|| default.into())
    }

    /// Overlay value at `path`, falling back to the default of its canonical
    /// path
    #[must_use]
    pub fn get_value(&self, path: &str) -> Option<ConfigValue> {
        self.resolve(&self.overlay(), &ConfigPath::parse(path))
    }

    /// Like [`get_value`](Self::get_value), or `default`
    #[must_use]
    pub fn get_value_or(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get_value(path).unwrap_or_else(|| default.into())
    }

    pub(crate) fn resolve(&self, overlay: &ConfigTree, path: &ConfigPath) -> Option<ConfigValue> {
        overlay
            .read(path)
            .or_else(|| self.defaults.get(&path.canonical()))
            .cloned()
    }

    /// Canonical form of `path`
    #[inline]
    #[must_use]
    pub fn canonical_path(&self, path: &str) -> String {
        pathconf_tree::canonical_path(path)
    }

    /// Value database entry at `path`
    #[must_use]
    pub fn db_entry(&self, path: &str) -> Option<ConfigValue> {
        self.defaults.db_entry(&ConfigPath::parse(path)).cloned()
    }

    /// Value database entry at `path`, or `default`
    #[must_use]
    pub fn db_entry_or(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.db_entry(path).unwrap_or_else(|| default.into())
    }

    /// Overlay in nested form, with the mapping applied in export direction
    ///
    /// For each pair whose external path holds a value, the external path
    /// takes the value at the internal path (`Null` when unset) and the
    /// internal path is removed.
    #[must_use]
    pub fn config(&self) -> ConfigTree {
        let mut config = self.overlay();
        for (external, internal) in &self.read_write_mapping {
            let external = ConfigPath::parse(external);
            if config.read(&external).is_none() {
                continue;
            }
            let value = config.remove(&ConfigPath::parse(internal)).unwrap_or_default();
            config.write(&external, value);
        }
        config
    }

    /// Overlay in flat form
    ///
    /// Persist keys missing from the overlay are added with their default
    /// (`Null` when there is none), then the mapping is applied in export
    /// direction.
    #[must_use]
    pub fn flat_config(&self) -> FlatConfig {
        let mut flat = self.overlay().flatten();
        for key in &self.persist_keys {
            if !flat.contains_key(key) {
                let default = self
                    .defaults
                    .get(&ConfigPath::parse(key).canonical())
                    .cloned()
                    .unwrap_or_default();
                flat.insert(key.clone(), default);
            }
        }
        for (external, internal) in &self.read_write_mapping {
            if flat.get(internal).is_some_and(|v| !v.is_null()) {
                if let Some(value) = flat.shift_remove(internal) {
                    flat.insert(external.clone(), value);
                }
            }
        }
        flat
    }

    /// Flattened default configuration
    #[inline]
    #[must_use]
    pub fn flat_default_config(&self) -> FlatConfig {
        self.defaults.flatten()
    }

    pub(crate) fn overlay(&self) -> ConfigTree {
        self.session.read(&self.id).unwrap_or_default()
    }

    pub(crate) fn update_overlay(&self, f: impl FnOnce(&mut ConfigTree)) {
        let mut overlay = self.overlay();
        f(&mut overlay);
        self.session.write(&self.id, overlay);
    }
}

impl fmt::Debug for PathConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathConfigStore")
            .field("id", &self.id)
            .field("setup", &self.is_in_setup())
            .field("persist_keys", &self.persist_keys)
            .field("allowed_keys", &self.allowed_keys)
            .field("read_write_mapping", &self.read_write_mapping)
            .finish_non_exhaustive()
    }
}
