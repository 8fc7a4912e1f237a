//! Insertion-ordered map whose key equality is decided by a [`NameComparer`].
//!
//! Entries are stored under their folded name; the name as first inserted is
//! kept alongside the value and is what iteration yields.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::comparer::SharedComparer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("an entry named '{key}' already exists")]
pub struct DuplicateKeyError {
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    comparer: SharedComparer,
    entries: IndexMap<String, (String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new(comparer: SharedComparer) -> Self {
        Self {
            comparer,
            entries: IndexMap::new(),
        }
    }

    /// Collects `(name, value)` pairs, failing on the first name that is
    /// already present under the comparer.
    pub fn from_entries<K, I>(comparer: SharedComparer, entries: I) -> Result<Self, DuplicateKeyError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new(comparer);
        for (key, value) in entries {
            map.try_insert(key, value)?;
        }
        Ok(map)
    }

    /// Appends an entry. Existing entries are never overwritten.
    pub fn try_insert(&mut self, key: impl Into<String>, value: V) -> Result<(), DuplicateKeyError> {
        let key = key.into();
        let folded = self.comparer.fold(&key).into_owned();
        match self.entries.entry(folded) {
            Entry::Occupied(_) => Err(DuplicateKeyError { key }),
            Entry::Vacant(slot) => {
                slot.insert((key, value));
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .get(self.comparer.fold(key).as_ref())
            .map(|(_, v)| v)
    }

    /// Returns the stored name together with the value.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.entries
            .get(self.comparer.fold(key).as_ref())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Position of `key` in insertion order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(self.comparer.fold(key).as_ref())
    }

    /// Position, stored name and value of `key`.
    pub fn get_full(&self, key: &str) -> Option<(usize, &str, &V)> {
        self.entries
            .get_full(self.comparer.fold(key).as_ref())
            .map(|(index, _, (k, v))| (index, k.as_str(), v))
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &V)> {
        self.entries
            .get_index(index)
            .map(|(_, (k, v))| (k.as_str(), v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(self.comparer.fold(key).as_ref())
    }

    /// Removes an entry, keeping the relative order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<(String, V)> {
        let folded = self.comparer.fold(key).into_owned();
        self.entries.shift_remove(&folded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }

    pub fn comparer(&self) -> &SharedComparer {
        &self.comparer
    }
}

impl OrderedMap<Value> {
    /// Converts into a generic JSON object with the same key order.
    pub fn into_json_object(self) -> Map<String, Value> {
        self.into_iter().collect()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoValues<String, (String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
