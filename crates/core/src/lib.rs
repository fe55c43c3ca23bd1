//! Core types for boxcache
//!
//! This crate defines what every other layer shares:
//! - Value / Object: JSON data as stored and returned
//! - EntityId, StoreFieldName: identities inside the normalized store
//! - Operation, SelectionSet, Field: operation documents
//! - ResponsePath: positions inside results, for error reporting
//! - CacheError, CacheConfig

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod path;
pub mod types;

pub use config::CacheConfig;
pub use document::{ArgValue, Field, Operation, OperationKind, SelectionSet, Variables};
pub use error::{CacheError, CacheResult};
pub use path::{PathSegment, ResponsePath};
pub use types::{
    as_reference, canonicalize, EntityId, Object, StoreFieldName, Value, REF_FIELD, ROOT_MUTATION,
    ROOT_QUERY, TYPENAME_FIELD,
};
