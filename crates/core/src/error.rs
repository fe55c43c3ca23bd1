//! Error types for the cache layer
//!
//! Data-shape problems in written results never produce errors: they are
//! logged and passed through. `CacheError` covers cache misses on read and
//! caller mistakes (unknown entities, bad snapshots, bad configuration).

use crate::path::ResponsePath;
use crate::types::EntityId;
use thiserror::Error;

/// Errors returned by cache operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A selected field has no value in the cache
    #[error("missing field '{field}' on {entity} at '{path}'")]
    MissingField {
        /// Object the field was looked up on
        entity: EntityId,
        /// Store field name that was missing
        field: String,
        /// Position in the result being built
        path: ResponsePath,
    },

    /// A reference points at an object that is not in the cache
    #[error("dangling reference to {entity} at '{path}'")]
    DanglingReference {
        /// Target of the reference
        entity: EntityId,
        /// Position in the result being built
        path: ResponsePath,
    },

    /// An entity addressed directly is not in the cache
    #[error("entity {0} is not in the cache")]
    EntityNotFound(EntityId),

    /// Snapshot could not be encoded or decoded
    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Check if this error is a cache miss (the data may be fetched instead)
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            CacheError::MissingField { .. }
                | CacheError::DanglingReference { .. }
                | CacheError::EntityNotFound(_)
        )
    }
}

/// Result type for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;
