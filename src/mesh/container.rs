//! Ordered key → entity storage.

use std::collections::btree_map::{self, BTreeMap};

use super::key::{ElementKey, Key, VertexKey};
use super::{Element, Vertex};

/// An ordered map from keys to entities.
///
/// Iteration always follows ascending key order, so results derived from a
/// container are deterministic regardless of insertion order.
#[derive(Debug, Clone)]
pub struct Container<K: Key, T> {
    items: BTreeMap<K, T>,
}

/// Vertex storage of a [`Mesh`](super::Mesh).
pub type VertexContainer = Container<VertexKey, Vertex>;

/// Element storage of a [`Mesh`](super::Mesh).
pub type ElementContainer = Container<ElementKey, Element>;

impl<K: Key, T> Default for Container<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T> Container<K, T> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Number of stored entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the container is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `key` is present.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.items.contains_key(&key)
    }

    /// Entity stored under `key`.
    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.items.get(&key)
    }

    /// Mutable entity stored under `key`.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.items.get_mut(&key)
    }

    /// Insert `item` under `key`.
    ///
    /// Returns the item back if the key is already taken.
    pub fn insert(&mut self, key: K, item: T) -> Result<(), T> {
        match self.items.entry(key) {
            btree_map::Entry::Occupied(_) => Err(item),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(item);
                Ok(())
            }
        }
    }

    /// Remove and return the entity stored under `key`.
    pub fn remove(&mut self, key: K) -> Option<T> {
        self.items.remove(&key)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The smallest key greater than every stored key (0 when empty).
    ///
    /// `None` once the largest key is `u32::MAX`.
    pub fn next_key(&self) -> Option<K> {
        match self.items.keys().next_back() {
            Some(last) => last.to_raw().checked_add(1).map(K::from_raw),
            None => Some(K::from_raw(0)),
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = K> + ExactSizeIterator + '_ {
        self.items.keys().copied()
    }

    /// Entities in key order.
    pub fn values(&self) -> btree_map::Values<'_, K, T> {
        self.items.values()
    }

    /// Mutable entities in key order.
    pub fn values_mut(&mut self) -> btree_map::ValuesMut<'_, K, T> {
        self.items.values_mut()
    }

    /// `(key, entity)` pairs in key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (K, &T)> + ExactSizeIterator + '_ {
        self.items.iter().map(|(k, v)| (*k, v))
    }

    /// The underlying map, for parallel iteration.
    pub(crate) fn map_mut(&mut self) -> &mut BTreeMap<K, T> {
        &mut self.items
    }
}
