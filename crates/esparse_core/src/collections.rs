//! Collection types shared by the scope tracker and the parser.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// A map that preserves insertion order.
///
/// Private-name bookkeeping reports unresolved names in first-use order, so
/// iteration order must be deterministic. Removal leaves a tombstone; the
/// entry list is compacted once tombstones outnumber live entries.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<Option<(K, V)>>,
    index: FxHashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            let slot = self.entries[idx].as_mut().map(|(_, v)| v)?;
            Some(std::mem::replace(slot, value))
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push(Some((key, value)));
            None
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let &idx = self.index.get(key)?;
        self.entries[idx].as_ref().map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a key, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let (_, value) = self.entries[idx].take()?;
        if self.entries.len() > 2 * self.index.len() {
            self.compact();
        }
        Some(value)
    }

    fn compact(&mut self) {
        self.entries.retain(Option::is_some);
        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some((key, _)) = entry {
                if let Some(idx) = self.index.get_mut(key) {
                    *idx = slot;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().flatten().map(|(k, v)| (k, v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Drain all entries in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.index.clear();
        self.entries.drain(..).flatten()
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A set using FxHash; DoS resistance is irrelevant for parser internals.
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;

/// Re-export FxHashMap for convenience.
pub type FxMap<K, V> = FxHashMap<K, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_preserves_order() {
        let mut map = OrderedMap::new();
        map.insert("c", 3);
        map.insert("a", 1);
        map.insert("b", 2);
        let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ordered_map_update_keeps_slot() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(map.get(&"a"), Some(&10));
        assert_eq!(map.iter().next().map(|(k, _)| *k), Some("a"));
    }

    #[test]
    fn test_ordered_map_many_removals() {
        let mut map = OrderedMap::new();
        for i in 0..100 {
            map.insert(i, i * 10);
        }
        for i in (0..100).filter(|i| i % 3 != 0) {
            assert_eq!(map.remove(&i), Some(i * 10));
        }
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.len(), 34);
        assert_eq!(map.get(&99), Some(&990));
        map.insert(1, 11);
        let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&0));
        assert_eq!(keys.last(), Some(&1));
        assert_eq!(keys.len(), 35);
    }

    #[test]
    fn test_ordered_map_remove_reindexes() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        assert_eq!(map.remove(&"a"), Some(1));
        assert_eq!(map.get(&"c"), Some(&3));
        assert_eq!(map.len(), 2);
        let drained: Vec<_> = map.drain().collect();
        assert_eq!(drained, vec![("b", 2), ("c", 3)]);
        assert!(map.is_empty());
    }
}
