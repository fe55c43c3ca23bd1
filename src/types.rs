//! Public types for the boxcache API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Data and identity
// ============================================================================

pub use boxcache_core::{EntityId, Object, StoreFieldName, Value, ROOT_MUTATION, ROOT_QUERY};

// Operation documents
pub use boxcache_core::{ArgValue, Field, Operation, OperationKind, SelectionSet, Variables};

// Errors, paths and configuration
pub use boxcache_core::{CacheConfig, CacheError, CacheResult, PathSegment, ResponsePath};

// ============================================================================
// Policies
// ============================================================================

pub use boxcache_policies::{
    inventory_policies, FieldPolicy, ItemKey, KeyArgs, KeyStrategy, LocalField, MergeStrategy,
    PageMerge, ReadStrategy, TypePolicies,
};

// ============================================================================
// Cache and client
// ============================================================================

pub use boxcache_engine::{
    Cache, CacheEvent, Client, ClientError, FetchPolicy, GraphqlError, OperationResult, Request,
    Response, ResultSource, Transport, TransportError, WriteOptions,
};

// Snapshots
pub use boxcache_storage::StoreSnapshot;

// ============================================================================
// Reactive state
// ============================================================================

pub use boxcache_reactive::{
    BoxReconciliationOverlay, Preferences, QrReaderOverlay, ReactiveVar, Subscription,
};
