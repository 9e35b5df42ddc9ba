//! The value types of the cask persistent data structure framework.
//!
//! This crate is the leaf of the cask crate family. It defines:
//!
//! * the closed set of *element kinds* (scalars, vectors, matrices,
//!   quaternions, ids, refs, strings) and *container kinds* (plain,
//!   optional, vector, indexed vector, …) that the wire format can carry,
//! * the [`Hash`] digest value and the [`EntityRef`]/[`ItemRef`] reference
//!   types built on top of it,
//! * the composite container storage types ([`BidirectionalMap`],
//!   [`DirectedGraph`], [`ItemTable`], [`IndexedVector`]),
//! * the [`Validator`] error accumulator,
//! * the closed [`Error`] set shared by every cask crate.
//!
//! Serialization of these types lives in `cask_codec`; the management
//! function surface (clear/copy/write/read/validate) lives in `cask_data`.

mod element;
mod error;
mod hash;
mod idx_vec;
mod kinds;
mod refs;
mod validator;

mod containers;

pub use self::{
    containers::{
        BidirectionalMap, DirectedGraph, GraphFlags, IndexType, IndexedVector, ItemTable,
        TableFlags,
    },
    element::{Bounded, Element},
    error::{Error, Result},
    hash::{Hash, ParseHashError},
    idx_vec::IdxVec,
    kinds::{ContainerKind, ElementKind, WireTag, MAX_KEY_LENGTH},
    refs::{EntityRef, ItemRef},
    validator::{ValidationFlags, ValidationIssue, Validator},
};
