//! Configuration values
//!
//! [`ConfigValue`] is the closed set of values a configuration tree can hold.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::tree::ConfigTree;

/// A single configuration value
///
/// `List` is an opaque array leaf: it is stored and compared as a whole and
/// never expanded into sub-paths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String value
    String(String),
    /// Array-style leaf
    List(Vec<ConfigValue>),
    /// Nested subtree
    Map(ConfigTree),
}

impl ConfigValue {
    /// Check for explicit null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the value counts as blank
    ///
    /// Blank values are `null`, `false`, `0`, `0.0`, `""`, `"0"` and empty
    /// lists or maps. Form inputs deliver numbers as strings, hence `"0"`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Integer(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::String(s) => s.is_empty() || s == "0",
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    /// String slice if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer if this is an integer, or a string holding one
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Subtree if this is a map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ConfigTree> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable subtree if this is a map
    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut ConfigTree> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert into a JSON value
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => map.to_json(),
        }
    }
}

/// Textual rendering used when values are spliced into strings
///
/// Null and `false` render empty, `true` renders `1`; containers render as
/// compact JSON.
impl Display for ConfigValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => f.write_str("1"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<JsonValue> for ConfigValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => Self::Map(ConfigTree::from(map)),
        }
    }
}

impl From<ConfigValue> for JsonValue {
    fn from(value: ConfigValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for ConfigValue {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::List(items)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(map: ConfigTree) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_values() {
        for value in [
            ConfigValue::Null,
            ConfigValue::Bool(false),
            ConfigValue::Integer(0),
            ConfigValue::Float(0.0),
            ConfigValue::from(""),
            ConfigValue::from("0"),
            ConfigValue::List(vec![]),
            ConfigValue::Map(ConfigTree::new()),
        ] {
            assert!(value.is_blank(), "{value:?} should be blank");
        }
    }

    #[test]
    fn non_blank_values() {
        for value in [
            ConfigValue::Bool(true),
            ConfigValue::Integer(3306),
            ConfigValue::from("localhost"),
            ConfigValue::from("0.0"),
            ConfigValue::List(vec![ConfigValue::Null]),
        ] {
            assert!(!value.is_blank(), "{value:?} should not be blank");
        }
    }

    #[test]
    fn display_matches_string_splicing() {
        assert_eq!(ConfigValue::Null.to_string(), "");
        assert_eq!(ConfigValue::Bool(false).to_string(), "");
        assert_eq!(ConfigValue::Bool(true).to_string(), "1");
        assert_eq!(ConfigValue::Integer(3307).to_string(), "3307");
        assert_eq!(ConfigValue::from("db1").to_string(), "db1");
    }

    #[test]
    fn from_json_numbers() {
        assert_eq!(ConfigValue::from(json!(42)), ConfigValue::Integer(42));
        assert_eq!(ConfigValue::from(json!(1.5)), ConfigValue::Float(1.5));
        assert_eq!(ConfigValue::from(json!(u64::MAX)), ConfigValue::Float(u64::MAX as f64));
    }

    #[test]
    fn deserialize_untagged() {
        let value: ConfigValue = serde_json::from_str(r#"{"a": [1, "x", null], "b": true}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(
            map.get("a"),
            Some(&ConfigValue::List(vec![
                ConfigValue::Integer(1),
                ConfigValue::from("x"),
                ConfigValue::Null,
            ]))
        );
        assert_eq!(map.get("b"), Some(&ConfigValue::Bool(true)));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let original = json!({"z": 1, "a": {"y": "s", "b": false}});
        let value = ConfigValue::from(original.clone());
        assert_eq!(value.to_json(), original);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"z":1,"a":{"y":"s","b":false}}"#);
    }

    #[test]
    fn as_i64_accepts_numeric_strings() {
        assert_eq!(ConfigValue::from("3307").as_i64(), Some(3307));
        assert_eq!(ConfigValue::Integer(2).as_i64(), Some(2));
        assert_eq!(ConfigValue::from("x").as_i64(), None);
    }
}
