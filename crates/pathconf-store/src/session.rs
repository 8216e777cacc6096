//! Session storage backends
//!
//! The store keeps its overlay in a [`SessionStore`] slot rather than owning
//! it, so the overlay lives as long as the user session does.

use std::sync::Arc;

use dashmap::DashMap;
use pathconf_tree::ConfigTree;

/// Keyed, session-scoped storage of configuration trees
///
/// Implementations serialize access per session themselves; a store issues
/// one read, or one read followed by one write, per operation.
pub trait SessionStore: Send + Sync {
    /// Tree stored under `key`, if any
    fn read(&self, key: &str) -> Option<ConfigTree>;

    /// Replace the tree stored under `key`
    fn write(&self, key: &str, tree: ConfigTree);

    /// Drop the tree stored under `key`
    fn remove(&self, key: &str);
}

/// In-memory session store
///
/// Cheap to clone; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<DashMap<String, ConfigTree>>,
}

impl MemorySessionStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot is occupied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if `key` is occupied
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Drop every slot
    #[inline]
    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self, key: &str) -> Option<ConfigTree> {
        self.slots.get(key).map(|entry| entry.value().clone())
    }

    fn write(&self, key: &str, tree: ConfigTree) {
        self.slots.insert(key.to_string(), tree);
    }

    fn remove(&self, key: &str) {
        self.slots.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathconf_tree::ConfigValue;

    #[test]
    fn read_missing_slot() {
        let store = MemorySessionStore::new();
        assert!(store.read("ConfigFile1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn write_then_read() {
        let store = MemorySessionStore::new();
        let mut tree = ConfigTree::new();
        tree.insert("MaxRows", ConfigValue::Integer(50));
        store.write("ConfigFile1", tree.clone());

        assert_eq!(store.read("ConfigFile1"), Some(tree));
        assert!(store.contains("ConfigFile1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_slots() {
        let store = MemorySessionStore::new();
        let other = store.clone();
        store.write("k", ConfigTree::new());
        assert!(other.contains("k"));

        other.remove("k");
        assert!(!store.contains("k"));
    }
}
