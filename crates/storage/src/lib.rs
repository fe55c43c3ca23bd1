//! Storage layer for boxcache
//!
//! Holds normalized objects keyed by [`EntityId`](boxcache_core::EntityId),
//! sharded by type name, with a global write version and serializable
//! snapshots. Policy decisions (identity, pagination) live above this layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{EntityStore, Shard, StoreSnapshot, StoredObject};
