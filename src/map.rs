//! Ordered map type for encoded records.
//!
//! This module provides [`ValueMap`], a wrapper around [`IndexMap`] that keeps
//! entries in insertion order. Keys are raw bytes: they are the fully
//! qualified key paths computed while building, already joined with the key
//! delimiter.
//!
//! The builder only ever appends; ordering for output is decided by the
//! writer, which may sort entries with the configured key order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_linecoder::{ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.insert("sub.numeral", Value::from(76));
//! map.insert("sub.string", Value::from("world"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("sub.string").and_then(|v| v.as_str()), Some("world"));
//! ```

use crate::collate::KeyOrder;
use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of key bytes to values.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::{ValueMap, Value};
///
/// let mut map = ValueMap::new();
/// map.insert("second", Value::from(2));
/// map.insert("first", Value::from(1));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec![b"second".to_vec(), b"first".to_vec()]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<Vec<u8>, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned.
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.0.get(key.as_ref())
    }

    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.0.contains_key(key.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Vec<u8>, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Vec<u8>, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Vec<u8>, Value> {
        self.0.iter()
    }

    /// Returns the entries ordered by `order`. Entries comparing equal keep
    /// their insertion order.
    #[must_use]
    pub fn sorted_entries(&self, order: &KeyOrder) -> Vec<(&Vec<u8>, &Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|(left, _), (right, _)| order.compare(left, right));
        entries
    }
}

impl IntoIterator for ValueMap {
    type Item = (Vec<u8>, Value);
    type IntoIter = indexmap::map::IntoIter<Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a Vec<u8>, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<Vec<u8>>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        ValueMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
