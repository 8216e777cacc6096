//! Configuration paths
//!
//! Provides [`ConfigPath`] for hierarchical addressing of values inside a
//! configuration tree.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path separator used by the external `a/b/c` notation
pub const SEPARATOR: char = '/';

/// Top-level key holding the per-server subtrees
pub const SERVERS_KEY: &str = "Servers";

/// Server index every server path is collapsed to by [`ConfigPath::canonical`]
pub const CANONICAL_SERVER_INDEX: &str = "1";

/// Path within a configuration tree
///
/// Parsed once from its `/`-delimited string form. Parsing is lenient: paths
/// are never rejected, and empty segments are kept so that the string form
/// round-trips through [`Display`].
///
/// # Examples
/// - `Servers/1/host` → `["Servers", "1", "host"]`
/// - `ServerDefault` → `["ServerDefault"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a `/`-delimited path
    ///
    /// The empty string is the root path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self(path.split(SEPARATOR).map(str::to_string).collect())
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of a server subtree, `Servers/<index>`
    #[inline]
    #[must_use]
    pub fn server(index: u32) -> Self {
        Self(vec![SERVERS_KEY.to_string(), index.to_string()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into parent segments and last segment (if not root)
    #[inline]
    #[must_use]
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        self.0.split_last().map(|(last, parent)| (last.as_str(), parent))
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Canonical form used for default lookups
    ///
    /// A leading `Servers/<digits>/` is collapsed to `Servers/1/`, so per-server
    /// defaults do not depend on which server is addressed. The server segment
    /// must be followed by at least one more segment; other paths are returned
    /// unchanged.
    #[must_use]
    pub fn canonical(&self) -> Self {
        match self.0.as_slice() {
            [head, index, _, ..] if head == SERVERS_KEY && is_server_index(index) => {
                let mut segments = self.0.clone();
                segments[1] = CANONICAL_SERVER_INDEX.to_string();
                Self(segments)
            }
            _ => self.clone(),
        }
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Canonicalize a path given in string form
#[must_use]
pub fn canonical_path(path: &str) -> String {
    ConfigPath::parse(path).canonical().to_string()
}

fn is_server_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl Display for ConfigPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ConfigPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ConfigPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<&String> for ConfigPath {
    fn from(path: &String) -> Self {
        Self::parse(path)
    }
}

impl From<String> for ConfigPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<Vec<String>> for ConfigPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[String]> for ConfigPath {
    fn from(segments: &[String]) -> Self {
        Self(segments.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn path_parse_and_segments() {
        let path = ConfigPath::parse("Servers/1/host");
        assert_eq!(path.segments(), &["Servers", "1", "host"]);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn path_parse_empty_is_root() {
        let path = ConfigPath::parse("");
        assert!(path.is_empty());
        assert_eq!(path, ConfigPath::root());
    }

    #[test]
    fn path_keeps_empty_segments() {
        let path = ConfigPath::parse("a//b/");
        assert_eq!(path.segments(), &["a", "", "b", ""]);
        assert_eq!(path.to_string(), "a//b/");
    }

    #[test]
    fn path_single_and_child() {
        let path = ConfigPath::single("Servers").child("2");
        assert_eq!(path.segments(), &["Servers", "2"]);
        assert_eq!(path, ConfigPath::server(2));
    }

    #[test]
    fn path_split_last() {
        let path = ConfigPath::parse("a/b/c");
        let (last, parent) = path.split_last().unwrap();
        assert_eq!(last, "c");
        assert_eq!(parent, &["a", "b"]);
        assert!(ConfigPath::root().split_last().is_none());
    }

    #[test]
    fn canonical_collapses_server_index() {
        assert_eq!(canonical_path("Servers/7/host"), "Servers/1/host");
        assert_eq!(canonical_path("Servers/12/a/b"), "Servers/1/a/b");
        assert_eq!(canonical_path("Servers/1/host"), "Servers/1/host");
    }

    #[test]
    fn canonical_leaves_other_paths() {
        assert_eq!(canonical_path("ServerDefault"), "ServerDefault");
        assert_eq!(canonical_path("Servers/3"), "Servers/3");
        assert_eq!(canonical_path("Servers/x/host"), "Servers/x/host");
        assert_eq!(canonical_path("Server/3/host"), "Server/3/host");
        assert_eq!(canonical_path("Export/Servers/3/host"), "Export/Servers/3/host");
    }

    #[test]
    fn canonical_requires_segment_after_index() {
        assert_eq!(canonical_path("Servers/3/"), "Servers/1/");
        assert_eq!(canonical_path("Servers//host"), "Servers//host");
    }

    #[test]
    fn path_display() {
        let path = ConfigPath::new(vec!["a".into(), "b".into()]);
        assert_eq!(path.to_string(), "a/b");
    }

    proptest! {
        #[test]
        fn prop_canonical_is_idempotent(path in "(Servers/[0-9]{1,3}/)?[A-Za-z_]{1,8}(/[A-Za-z0-9_]{1,8}){0,3}") {
            let once = canonical_path(&path);
            let twice = canonical_path(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_parse_display_round_trip(path in "[A-Za-z0-9_]{1,6}(/[A-Za-z0-9_]{0,6}){0,4}") {
            prop_assert_eq!(ConfigPath::parse(&path).to_string(), path);
        }
    }
}
