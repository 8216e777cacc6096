//! pathconf Tree
//!
//! Slash-addressed configuration trees.
//!
//! # Core Concepts
//!
//! - [`ConfigValue`]: Closed set of values (scalars, array leaves, subtrees)
//! - [`ConfigTree`]: Insertion-ordered nested map with path read/write/remove
//! - [`ConfigPath`]: `/`-delimited path, parsed once into segments
//! - [`FlatConfig`]: Flattened `path → value` form of a tree
//!
//! # Example
//!
//! ```rust
//! use pathconf_tree::{ConfigPath, ConfigTree, ConfigValue};
//!
//! let mut tree = ConfigTree::new();
//! tree.write(&ConfigPath::parse("Servers/2/host"), ConfigValue::from("db1"));
//!
//! let flat = tree.flatten();
//! assert_eq!(flat["Servers/2/host"], ConfigValue::from("db1"));
//! assert_eq!(ConfigTree::unflatten(flat), tree);
//!
//! assert_eq!(ConfigPath::parse("Servers/2/host").canonical().to_string(), "Servers/1/host");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod path;
mod tree;
mod value;

// Re-exports
pub use path::{canonical_path, ConfigPath, CANONICAL_SERVER_INDEX, SEPARATOR, SERVERS_KEY};
pub use tree::{ConfigTree, FlatConfig};
pub use value::ConfigValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_document_to_flat_paths() {
        let tree = ConfigTree::try_from(json!({
            "Servers": {
                "1": {"host": "localhost", "only_db": ["a", "b"]},
                "2": {"host": "db2"}
            }
        }))
        .unwrap();

        let flat = tree.flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat["Servers/2/host"], ConfigValue::from("db2"));
        assert_eq!(
            flat["Servers/1/only_db"],
            ConfigValue::List(vec![ConfigValue::from("a"), ConfigValue::from("b")])
        );
    }

    #[test]
    fn canonical_lookup_through_tree() {
        let defaults = ConfigTree::try_from(json!({"Servers": {"1": {"port": ""}}})).unwrap();
        let path = ConfigPath::parse("Servers/9/port").canonical();
        assert!(defaults.flatten().contains_key(&path.to_string()));
    }
}
