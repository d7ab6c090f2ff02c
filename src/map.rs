//! Ordered map type for decoded mappings.
//!
//! [`HkvnMap`] wraps [`IndexMap`] so that a decoded mapping iterates in the
//! order its entries appeared on the wire, and re-encodes in that same order.
//!
//! Duplicate keys are not rejected: a later entry overwrites the value of an
//! earlier one but keeps the earlier entry's position.
//!
//! ## Examples
//!
//! ```rust
//! use hkvn::{HkvnMap, Value};
//!
//! let mut map = HkvnMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("role".to_string(), Value::from("admin"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_bytes()), Some(&b"Alice"[..]));
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered map of string keys to values.
///
/// Equality ignores order, as for [`IndexMap`]; compare [`HkvnMap::keys`]
/// when order matters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HkvnMap(IndexMap<String, Value>);

impl HkvnMap {
    /// Creates an empty `HkvnMap`.
    #[must_use]
    pub fn new() -> Self {
        HkvnMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        HkvnMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the entry keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::{HkvnMap, Value};
    ///
    /// let mut map = HkvnMap::new();
    /// assert!(map.insert("key".to_string(), Value::from("a")).is_none());
    /// assert!(map.insert("key".to_string(), Value::from("b")).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
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
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for HkvnMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for HkvnMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        HkvnMap(IndexMap::from_iter(iter))
    }
}
