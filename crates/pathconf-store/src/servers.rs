//! Server list accessors
//!
//! Convenience views over the `Servers/<index>/…` subtree of the overlay.

use pathconf_tree::{ConfigPath, ConfigTree, ConfigValue, SERVERS_KEY};
use tracing::info;

use crate::store::PathConfigStore;

/// Overlay key pointing at the server selected by default
pub const SERVER_DEFAULT_KEY: &str = "ServerDefault";

/// Scheme prefix of server DSNs
pub const DSN_SCHEME: &str = "mysqli://";

/// Host value that selects a socket connection
const LOCALHOST: &str = "localhost";

/// `auth_type` under which credentials are part of the DSN
const CONFIG_AUTH: &str = "config";

/// Password placeholder in DSNs
const MASKED_PASSWORD: &str = ":***";

fn servers_of(overlay: &ConfigTree) -> Option<&ConfigTree> {
    overlay.get(SERVERS_KEY).and_then(ConfigValue::as_map)
}

fn has_server(overlay: &ConfigTree, index: u32) -> bool {
    overlay.read(&ConfigPath::server(index)).is_some()
}

impl PathConfigStore {
    /// Number of servers in the overlay
    #[must_use]
    pub fn server_count(&self) -> usize {
        servers_of(&self.overlay()).map_or(0, ConfigTree::len)
    }

    /// Server subtree of the overlay, empty when there is none
    #[must_use]
    pub fn servers(&self) -> ConfigTree {
        servers_of(&self.overlay()).cloned().unwrap_or_default()
    }

    /// Display name of a server
    ///
    /// Its `verbose` name when set, else its `host`, else `localhost`.
    /// Empty when the server is not in the overlay.
    #[must_use]
    pub fn server_name(&self, index: u32) -> String {
        let overlay = self.overlay();
        if !has_server(&overlay, index) {
            return String::new();
        }
        let server = ConfigPath::server(index);
        let field = |name: &str| overlay.read(&server.child(name)).filter(|v| !v.is_blank());

        if let Some(verbose) = field("verbose") {
            return verbose.to_string();
        }
        field("host").map_or_else(|| LOCALHOST.to_string(), ToString::to_string)
    }

    /// Connection string of a server
    ///
    /// `mysqli://[user[:***]@]host[:port]`, or `mysqli://[user[:***]@]socket`
    /// when the host is `localhost`. Credentials appear only for the `config`
    /// auth type, and the password is always masked. Fields missing from the
    /// overlay fall back to their defaults. Empty when the server is not in
    /// the overlay.
    #[must_use]
    pub fn server_dsn(&self, index: u32) -> String {
        let overlay = self.overlay();
        if !has_server(&overlay, index) {
            return String::new();
        }
        let server = ConfigPath::server(index);
        let field = |name: &str| self.resolve(&overlay, &server.child(name));

        let mut dsn = String::from(DSN_SCHEME);
        if field("auth_type").as_ref().and_then(ConfigValue::as_str) == Some(CONFIG_AUTH) {
            if let Some(user) = field("user") {
                dsn.push_str(&user.to_string());
            }
            if field("password").is_some_and(|p| !p.is_blank()) {
                dsn.push_str(MASKED_PASSWORD);
            }
            dsn.push('@');
        }

        let host = field("host");
        if host.as_ref().and_then(ConfigValue::as_str) == Some(LOCALHOST) {
            if let Some(socket) = field("socket") {
                dsn.push_str(&socket.to_string());
            }
        } else {
            if let Some(host) = host {
                dsn.push_str(&host.to_string());
            }
            if let Some(port) = field("port").filter(|p| !p.is_blank()) {
                dsn.push(':');
                dsn.push_str(&port.to_string());
            }
        }
        dsn
    }

    /// Remove a server, shifting higher servers down by one index
    ///
    /// The vacated top slot is deleted. A `ServerDefault` pointing at the
    /// removed server is cleared. One pointing above it is also decremented
    /// so it keeps selecting the same server after the shift, and is stored
    /// back as an integer even when it was held as a numeric string. No-op
    /// when the server is missing.
    pub fn remove_server(&self, index: u32) {
        let mut overlay = self.overlay();
        if !has_server(&overlay, index) {
            return;
        }

        if let Some(servers) = overlay.get_mut(SERVERS_KEY).and_then(ConfigValue::as_map_mut) {
            let last = u32::try_from(servers.len()).unwrap_or(u32::MAX);
            for i in index..last {
                match servers.remove_key(&(i + 1).to_string()) {
                    Some(next) => {
                        servers.insert(i.to_string(), next);
                    }
                    None => {
                        servers.remove_key(&i.to_string());
                    }
                }
            }
            servers.remove_key(&last.to_string());
            if servers.is_empty() {
                overlay.remove_key(SERVERS_KEY);
            }
        }

        match overlay.get(SERVER_DEFAULT_KEY).and_then(ConfigValue::as_i64) {
            Some(default) if default == i64::from(index) => {
                overlay.remove_key(SERVER_DEFAULT_KEY);
            }
            Some(default) if default > i64::from(index) => {
                overlay.insert(SERVER_DEFAULT_KEY, ConfigValue::Integer(default - 1));
            }
            _ => {}
        }

        info!(id = %self.id(), index, "server removed");
        self.set_config_data(overlay);
    }
}
