use crate::types::{FastIndexMap, normalize_key};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::SmolStr;

// ─── IndifferentMap ─────────────────────────────────────────────────────────

/// Insertion-ordered map whose lookups ignore case and key style.
///
/// Entries are keyed by their [`normalize_key`] form and carry the spelling
/// seen on first insert, which iteration and serialization report. Re-inserting
/// an equivalent key replaces the value in place and keeps the first
/// spelling and position.
#[derive(Clone)]
pub struct IndifferentMap<V> {
    entries: FastIndexMap<SmolStr, (SmolStr, V)>,
}

impl<V> IndifferentMap<V> {
    pub fn new() -> Self {
        Self {
            entries: FastIndexMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FastIndexMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert a value, returning the previous one for an equivalent key.
    pub fn insert(&mut self, key: impl Into<SmolStr>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.get_mut(&normalize_key(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.insert(normalize_key(&key), (key, value));
                None
            }
        }
    }

    /// Mutable access to the value for `key`, inserting `default()` first if
    /// no equivalent key exists.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        &mut self
            .entries
            .entry(normalize_key(key))
            .or_insert_with(|| (SmolStr::new(key), default()))
            .1
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&normalize_key(key)).map(|(_, v)| v)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(&normalize_key(key)).map(|(_, v)| v)
    }

    /// Stored spelling and value for `key`.
    pub fn get_key_value(&self, key: &str) -> Option<(&SmolStr, &V)> {
        self.entries.get(&normalize_key(key)).map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&SmolStr, &V)> {
        self.entries.values().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &SmolStr> {
        self.entries.values().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.values().map(|(_, v)| v)
    }
}

impl<V> Default for IndifferentMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for IndifferentMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for IndifferentMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<SmolStr>, V> FromIterator<(K, V)> for IndifferentMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for IndifferentMap<V> {
    type Item = (SmolStr, V);
    type IntoIter = indexmap::map::IntoValues<SmolStr, (SmolStr, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<V> std::ops::Index<&str> for IndifferentMap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("IndifferentMap: no entry for key {key:?}"),
        }
    }
}

impl<V: Serialize> Serialize for IndifferentMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}
