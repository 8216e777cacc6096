//! Nested configuration trees
//!
//! [`ConfigTree`] is an insertion-ordered map of segment → [`ConfigValue`],
//! addressed with [`ConfigPath`]s. [`FlatConfig`] is its flattened
//! `path → value` form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::path::ConfigPath;
use crate::value::ConfigValue;

/// Flattened configuration: `a/b/c` path strings mapped to leaf values
pub type FlatConfig = IndexMap<String, ConfigValue>;

/// Segment marking a map as an array-style leaf during flattening
const ARRAY_MARKER: &str = "0";

/// Nested configuration tree
///
/// Reads treat an explicit `Null` the same as a missing entry. Writes create
/// intermediate maps as needed, replacing scalars that stand in the way.
/// Removal is structural: maps emptied by a removal are pruned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree(IndexMap<String, ConfigValue>);

impl ConfigTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Number of top-level entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if tree has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level entry by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Mutable top-level entry by key
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    /// Check for a top-level key
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a top-level entry, returning the previous value
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a top-level entry, keeping the order of the others
    #[inline]
    pub fn remove_key(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.shift_remove(key)
    }

    /// Top-level keys in insertion order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Top-level entries in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read the value at `path`
    ///
    /// Returns `None` when any segment is missing, an intermediate value is
    /// not a map, or the value is `Null`.
    #[must_use]
    pub fn read(&self, path: &ConfigPath) -> Option<&ConfigValue> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.0.get(segment)?.as_map()?;
        }
        current.0.get(last).filter(|v| !v.is_null())
    }

    /// Write `value` at `path`
    ///
    /// Writing at the root path is a no-op.
    pub fn write(&mut self, path: &ConfigPath, value: ConfigValue) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = self;
        for segment in parents {
            let slot = current
                .0
                .entry(segment.clone())
                .or_insert_with(|| ConfigValue::Map(ConfigTree::new()));
            if slot.as_map().is_none() {
                *slot = ConfigValue::Map(ConfigTree::new());
            }
            let ConfigValue::Map(next) = slot else {
                return;
            };
            current = next;
        }
        current.0.insert(last.to_string(), value);
    }

    /// Remove the value at `path`, pruning maps left empty
    pub fn remove(&mut self, path: &ConfigPath) -> Option<ConfigValue> {
        remove_in(self, path.segments())
    }

    /// Flatten into `path → value` pairs
    ///
    /// Maps are expanded into sub-paths unless they carry a non-null `0` key,
    /// in which case they are array-style leaves. Lists are always leaves.
    /// Empty maps contribute no entries.
    #[must_use]
    pub fn flatten(&self) -> FlatConfig {
        let mut result = FlatConfig::new();
        flatten_into(self, "", &mut result);
        result
    }

    /// Rebuild a nested tree from `path → value` pairs
    #[must_use]
    pub fn unflatten<I, K>(flat: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: AsRef<str>,
    {
        let mut tree = Self::new();
        for (path, value) in flat {
            tree.write(&ConfigPath::parse(path.as_ref()), value);
        }
        tree
    }

    /// Convert into a JSON object
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

fn remove_in(map: &mut ConfigTree, segments: &[String]) -> Option<ConfigValue> {
    match segments {
        [] => None,
        [last] => map.0.shift_remove(last),
        [head, rest @ ..] => {
            let child = map.0.get_mut(head)?.as_map_mut()?;
            let removed = remove_in(child, rest);
            let emptied = child.is_empty();
            if removed.is_some() && emptied {
                map.0.shift_remove(head);
            }
            removed
        }
    }
}

fn is_array_style(map: &ConfigTree) -> bool {
    map.get(ARRAY_MARKER).is_some_and(|v| !v.is_null())
}

fn flatten_into(map: &ConfigTree, prefix: &str, out: &mut FlatConfig) {
    for (key, value) in &map.0 {
        match value {
            ConfigValue::Map(child) if !is_array_style(child) => {
                flatten_into(child, &format!("{prefix}{key}/"), out);
            }
            _ => {
                // First writer wins when keys containing '/' collide
                out.entry(format!("{prefix}{key}")).or_insert_with(|| value.clone());
            }
        }
    }
}

impl From<JsonMap<String, JsonValue>> for ConfigTree {
    fn from(map: JsonMap<String, JsonValue>) -> Self {
        map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect()
    }
}

impl From<IndexMap<String, ConfigValue>> for ConfigTree {
    fn from(map: IndexMap<String, ConfigValue>) -> Self {
        Self(map)
    }
}

impl TryFrom<JsonValue> for ConfigTree {
    type Error = JsonValue;

    /// Accepts JSON objects; any other value is handed back unchanged
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(map) => Ok(Self::from(map)),
            other => Err(other),
        }
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
