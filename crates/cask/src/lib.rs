//! A persistent data structure framework.
//!
//! Writers marshal typed, hierarchical records into a length-prefixed byte
//! stream; the stream is hashed, named by its digest and placed in a flat
//! on-disk store. Readers fetch records by digest, verify integrity and
//! rebuild the in-memory object graph.
//!
//! This umbrella crate re-exports the whole public surface; see the
//! `cask_types`, `cask_codec`, `cask_data` and `cask_store` crates for the
//! layers.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! # fn package_record() -> Arc<dyn cask::PackageRecord> { unimplemented!() }
//! # fn main() -> cask::Result<()> {
//! let store = cask::EntityStore::new();
//! store.initialize("/var/lib/my-store", vec![package_record()])?;
//!
//! let entity_ref: cask::EntityRef = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
//!     .parse::<cask::Hash>()
//!     .unwrap()
//!     .into();
//! store.load_entity(entity_ref)?;
//! let entity = store.get_loaded_entity(entity_ref);
//! # let _ = entity;
//! # Ok(())
//! # }
//! ```

pub use cask_codec::{
    ArrayItemReader, ArrayItemWriter, EntityReader, EntityWriter, ReadStream, SectionArrayReader,
    SectionArrayWriter, Value, WriteStream,
};
pub use cask_data::{
    equals, validate_graph_nodes_in, validate_keys_in, KeyLookup, Managed, Varying,
    VaryingPayload,
};
pub use cask_store::{compute_hash, Entity, EntityStore, HashAlgorithm, PackageRecord};
pub use cask_types::{
    validation_error, BidirectionalMap, Bounded, ContainerKind, DirectedGraph, Element,
    ElementKind, EntityRef, Error, GraphFlags, Hash, IdxVec, IndexType, IndexedVector, ItemRef,
    ItemTable, Result, TableFlags, ValidationFlags, ValidationIssue, Validator, WireTag,
    MAX_KEY_LENGTH,
};
