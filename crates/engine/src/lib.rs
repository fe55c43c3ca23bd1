//! Normalizing cache and operation client for boxcache
//!
//! - `Cache`: writes results into the entity store and reads them back
//! - `Client`: runs operations through a `Transport` with a fetch policy
//!
//! Storage lives in `boxcache-storage`, identity and merge rules in
//! `boxcache-policies`; this crate wires them together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod error;

pub use boxcache_reactive::Subscription;
pub use cache::{Cache, CacheEvent, WriteOptions};
pub use client::{
    Client, FetchPolicy, OperationResult, Request, Response, ResultSource, Transport,
};
pub use error::{ClientError, GraphqlError, TransportError};
