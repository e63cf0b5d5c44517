//! Structured key/value fields attached to log entries
//!
//! `Fields` keeps insertion order and unique keys. Inserting an existing key
//! replaces its value in place, so merges are right-biased.

use super::log_level::LogLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Error message captured when the field was attached
    Error(String),
    /// Rendering of an arbitrary `Display` value
    Display(String),
}

impl FieldValue {
    /// Capture an error's message
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        FieldValue::Error(err.to_string())
    }

    /// Capture any printable value
    pub fn display(value: impl fmt::Display) -> Self {
        FieldValue::Display(value.to_string())
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) | FieldValue::Display(s) => {
                serde_json::Value::String(s.clone())
            }
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) | FieldValue::Display(s) => {
                f.write_str(s)
            }
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i64::from(i))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::UInt(u64::from(u))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<LogLevel> for FieldValue {
    fn from(level: LogLevel) -> Self {
        FieldValue::Display(level.as_str().to_string())
    }
}

/// Ordered, key-unique set of structured fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields {
    inner: IndexMap<String, FieldValue>,
}

impl Fields {
    /// Create a new empty field set
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Add a field (builder version)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.insert(key, value);
        self
    }

    /// Add a field, replacing the value of an existing key in place
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Keys in lexicographic order
    pub fn keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Right-biased in-place merge: `overlay` wins on duplicate keys
    pub fn extend_from(&mut self, overlay: &Fields) {
        for (key, value) in &overlay.inner {
            self.inner.insert(key.clone(), value.clone());
        }
    }

    /// Right-biased merge of two field sets
    #[must_use]
    pub fn merge(base: &Fields, overlay: &Fields) -> Fields {
        let mut merged = base.clone();
        merged.extend_from(overlay);
        merged
    }

    /// Format fields as key=value pairs in insertion order
    pub fn format_fields(&self) -> String {
        self.inner
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_fields())
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
