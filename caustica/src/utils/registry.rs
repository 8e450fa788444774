use std::hash::Hash;

use fxhash::FxHashMap;

/// Insertion-ordered collection of items identified by caller's handles.
#[derive(Debug)]
pub struct Registry<K, V> {
    items: Vec<(K, V)>,
    index: FxHashMap<K, usize>,
}

impl<K, V> Registry<K, V>
where
    K: Copy + Eq + Hash,
{
    /// Inserts the item, replacing (and returning) the previous one stored
    /// under the same handle.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.items[idx].1, value));
        }

        self.index.insert(key, self.items.len());
        self.items.push((key, value));

        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let (_, value) = self.items.swap_remove(idx);

        if let Some((moved_key, _)) = self.items.get(idx) {
            self.index.insert(*moved_key, idx);
        }

        Some(value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.items[idx].1)
    }

    pub fn has(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.items.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            items: Default::default(),
            index: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replace_remove() {
        let mut registry = Registry::default();

        assert_eq!(None, registry.insert("a", 1));
        assert_eq!(None, registry.insert("b", 2));
        assert_eq!(None, registry.insert("c", 3));
        assert_eq!(Some(2), registry.insert("b", 20));

        assert_eq!(Some(1), registry.remove(&"a"));
        assert_eq!(None, registry.remove(&"a"));

        // `c` got moved into `a`'s place
        assert_eq!(Some(&3), registry.get(&"c"));
        assert_eq!(Some(&20), registry.get(&"b"));
        assert_eq!(2, registry.len());

        let items: Vec<_> = registry.iter().map(|(k, v)| (*k, *v)).collect();

        assert_eq!(vec![("c", 3), ("b", 20)], items);
    }
}
