use std::collections::BTreeMap;

bitflags::bitflags! {
    /// What an [`ItemTable`] is allowed to contain.
    ///
    /// The flags *permit*; validation rejects what they do not cover.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TableFlags: u32 {
        /// Allow zero-value keys (0 for ints, the nil uuid, …).
        const ZERO_KEYS = 0x1;
        /// Allow null (unallocated) entries in the table.
        const NULL_ENTITIES = 0x2;
    }
}

/// A map from keys to owned, optionally-null values.
///
/// A slot holding `None` is a key that exists without a value; whether that
/// is legal is decided by [`TableFlags::NULL_ENTITIES`] at validation time.
/// Iteration is in key order, which keeps serialization deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTable<K: Ord + Clone, V> {
    flags: TableFlags,
    entries: BTreeMap<K, Option<V>>,
}

impl<K: Ord + Clone, V> Default for ItemTable<K, V> {
    fn default() -> Self {
        Self::new(TableFlags::empty())
    }
}

impl<K: Ord + Clone, V> ItemTable<K, V> {
    pub fn new(flags: TableFlags) -> Self {
        Self {
            flags,
            entries: BTreeMap::new(),
        }
    }

    pub fn flags(&self) -> TableFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: TableFlags) {
        self.flags = flags;
    }

    /// Insert a key with a fresh default value, returning a reference to
    /// the value. An existing slot under the key is replaced.
    pub fn insert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entries
            .entry(key)
            .or_insert(None)
            .insert(V::default())
    }

    /// Insert a key with a null slot.
    pub fn insert_null(&mut self, key: K) {
        self.entries.insert(key, None);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key).and_then(|slot| slot.as_mut())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<Option<V>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct access to the slots, in key order.
    pub fn entries(&self) -> &BTreeMap<K, Option<V>> {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut BTreeMap<K, Option<V>> {
        &mut self.entries
    }

    /// Remove all entries. The flags are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut table: ItemTable<u32, String> = ItemTable::new(TableFlags::empty());
        *table.insert(7) = "seven".to_owned();
        table.insert_null(8);

        assert_eq!(table.get(&7).map(String::as_str), Some("seven"));
        assert_eq!(table.get(&8), None);
        assert!(table.contains_key(&8));
        assert!(!table.contains_key(&9));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn insert_replaces_existing_slot() {
        let mut table: ItemTable<u8, u32> = ItemTable::new(TableFlags::NULL_ENTITIES);
        *table.insert(1) = 100;
        table.insert_null(1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1), None);
    }
}
