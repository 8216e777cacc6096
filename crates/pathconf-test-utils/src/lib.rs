//! Testing utilities for pathconf workspace
//!
//! Shared test helpers, fixtures, and a mock session store.

#![allow(missing_docs)]

use std::sync::Arc;

use mockall::mock;
use pathconf_store::{Defaults, MemorySessionStore, PathConfigStore, SessionStore, StoreOptions};
use pathconf_tree::ConfigTree;
use serde_json::{json, Value as JsonValue};

/// Build a tree from a JSON object literal
pub fn tree(value: JsonValue) -> ConfigTree {
    ConfigTree::try_from(value).expect("fixture must be a JSON object")
}

/// Small default tree with one server and a few scalar settings
pub fn sample_defaults() -> Arc<Defaults> {
    Arc::new(Defaults::from_tree(tree(json!({
        "ServerDefault": 1,
        "Servers": {
            "1": {
                "host": "localhost",
                "port": "",
                "socket": "",
                "auth_type": "cookie",
                "user": "root",
                "password": "",
                "verbose": ""
            }
        },
        "MaxRows": 25,
        "ShowStats": true,
        "DefaultLang": "en"
    }))))
}

/// Store in setup mode over a fresh in-memory session
pub fn setup_store() -> (PathConfigStore, MemorySessionStore) {
    let session = MemorySessionStore::new();
    let store = PathConfigStore::new(
        sample_defaults(),
        Arc::new(session.clone()),
        None,
        &StoreOptions::new(),
    );
    (store, session)
}

/// Store with a base configuration over a fresh in-memory session
pub fn store_with_base(base: ConfigTree) -> PathConfigStore {
    PathConfigStore::new(
        sample_defaults(),
        Arc::new(MemorySessionStore::new()),
        Some(base),
        &StoreOptions::new(),
    )
}

mock! {
    /// Session store with programmable expectations
    pub SessionStore {}

    impl SessionStore for SessionStore {
        fn read(&self, key: &str) -> Option<ConfigTree>;
        fn write(&self, key: &str, tree: ConfigTree);
        fn remove(&self, key: &str);
    }
}
