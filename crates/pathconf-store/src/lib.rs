//! pathconf Store
//!
//! Per-session configuration overlays on top of compiled defaults.
//!
//! # Overview
//!
//! - **Defaults**: immutable default tree built once from a [`SettingsSource`]
//! - **SessionStore**: keyed session storage holding one overlay per server
//! - **PathConfigStore**: reads and writes `a/b/c` paths, keeping only values
//!   that differ from the defaults
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pathconf_store::{Defaults, MemorySessionStore, PathConfigStore, StaticSettings, StoreOptions};
//! use pathconf_tree::ConfigValue;
//!
//! let defaults = Arc::new(Defaults::load(&StaticSettings::builtin()?));
//! let session = Arc::new(MemorySessionStore::new());
//! let store = PathConfigStore::new(defaults, session, None, &StoreOptions::new());
//!
//! store.set("Servers/1/host", "db.example.com");
//! assert_eq!(store.get("Servers/1/host"), Some(ConfigValue::from("db.example.com")));
//!
//! // Writing the default back removes the entry
//! store.set("Servers/1/host", "localhost");
//! assert_eq!(store.get("Servers/1/host"), None);
//! assert_eq!(store.get_value("Servers/1/host"), Some(ConfigValue::from("localhost")));
//! # Ok::<(), pathconf_store::SettingsError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod options;
pub mod servers;
pub mod session;
pub mod settings;
pub mod store;

// Re-exports
pub use error::SettingsError;
pub use options::{StoreOptions, DEFAULT_KEY_PREFIX};
pub use servers::{DSN_SCHEME, SERVER_DEFAULT_KEY};
pub use session::{MemorySessionStore, SessionStore};
pub use settings::{Defaults, SettingsFormat, SettingsSource, StaticSettings};
pub use store::PathConfigStore;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for store operations
    pub use crate::{
        Defaults, MemorySessionStore, PathConfigStore, SessionStore, SettingsSource, StaticSettings,
        StoreOptions,
    };
    pub use pathconf_tree::{ConfigPath, ConfigTree, ConfigValue, FlatConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
