//! Composite containers and runtime-typed values.
//!
//! Every composite container of the framework exposes the same management
//! function surface, the [`Managed`] trait: clear, deep copy, equality,
//! write, read and validate. This crate implements it for
//! [`BidirectionalMap`](cask_types::BidirectionalMap),
//! [`DirectedGraph`](cask_types::DirectedGraph),
//! [`IndexedVector`](cask_types::IndexedVector),
//! [`ItemTable`](cask_types::ItemTable) and for [`Varying`], the
//! runtime-typed value carrier whose element and container kinds are data
//! rather than types.

mod containers;
mod dispatch;
mod managed;
mod varying;

pub use self::{
    containers::{validate_graph_nodes_in, validate_keys_in, KeyLookup},
    managed::{equals, Managed},
    varying::{Varying, VaryingPayload},
};
