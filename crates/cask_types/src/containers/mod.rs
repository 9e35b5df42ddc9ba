//! Storage types for the composite containers.
//!
//! These are plain data structures: construction and mutation enforce
//! nothing beyond basic map/set semantics. The structural invariants
//! (acyclicity, rootedness, index bounds, key/slot nullability) are checked
//! by the `Managed::validate` impls in `cask_data`, and the policy flags
//! steering those checks live on the container values themselves.

mod bidirectional_map;
mod directed_graph;
mod indexed_vector;
mod item_table;

pub use self::{
    bidirectional_map::BidirectionalMap,
    directed_graph::{DirectedGraph, GraphFlags},
    indexed_vector::{IndexType, IndexedVector},
    item_table::{ItemTable, TableFlags},
};
