//! The content-addressed entity store.
//!
//! Entities are user records serialized atomically through their package's
//! [`PackageRecord`] and addressed by the digest of their serialized bytes:
//! equal content means equal name, so the on-disk store deduplicates by
//! construction. Loaded entities live in an in-memory cache keyed by
//! [`EntityRef`](cask_types::EntityRef) behind a reader/writer lock, shared
//! between the store and every caller holding an `Arc` to them.

mod entity;
mod hasher;
mod store;

pub use self::{
    entity::{Entity, PackageRecord},
    hasher::{compute_hash, HashAlgorithm},
    store::EntityStore,
};
