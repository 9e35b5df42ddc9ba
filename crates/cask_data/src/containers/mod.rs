//! [`Managed`](crate::Managed) impls for the composite containers.

mod bidirectional_map;
mod directed_graph;
mod indexed_vector;
mod item_table;

use cask_types::{validation_error, ValidationFlags, Validator};

/// Key membership, for cross-container validation.
pub trait KeyLookup<K> {
    fn contains(&self, key: &K) -> bool;
}

impl<K: Ord + Clone, V: Ord + Clone> KeyLookup<K> for cask_types::BidirectionalMap<K, V> {
    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K: Ord + Clone, V> KeyLookup<K> for cask_types::ItemTable<K, V> {
    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

/// Check that every key in `keys` exists in `table`, reporting a
/// `MISSING_OBJECT` per absentee.
pub fn validate_keys_in<'k, K, L>(
    keys: impl IntoIterator<Item = &'k K>,
    table: &L,
    table_name: &str,
    validator: &mut Validator,
) where
    K: std::fmt::Debug + 'k,
    L: KeyLookup<K>,
{
    for key in keys {
        if !table.contains(key) {
            validation_error!(
                validator,
                ValidationFlags::MISSING_OBJECT,
                "the key {key:?} is missing in {table_name}"
            );
        }
    }
}

/// Check that every node appearing in the graph's edges exists in `table`,
/// reporting a `MISSING_OBJECT` per absentee (each node once).
pub fn validate_graph_nodes_in<T, L>(
    graph: &cask_types::DirectedGraph<T>,
    table: &L,
    table_name: &str,
    validator: &mut Validator,
) where
    T: Ord + Clone + std::fmt::Debug,
    L: KeyLookup<T>,
{
    let mut nodes = std::collections::BTreeSet::new();
    for (from, to) in graph.edges() {
        nodes.insert(from);
        nodes.insert(to);
    }
    validate_keys_in(nodes, table, table_name, validator);
}
