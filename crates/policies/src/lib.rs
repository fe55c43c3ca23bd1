//! Cache policies for boxcache
//!
//! This crate decides *how* data is normalized, without touching storage:
//! - keys: type name -> identity strategy (business keys, composites, default `id`)
//! - field: key arguments, merge and read strategies per field
//! - pagination: the page merge primitive
//! - local: client-only root fields and their defaults
//! - registry: `TypePolicies`, the bundle the cache is built with
//! - inventory: the policy set of the inventory client

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod inventory;
pub mod keys;
pub mod local;
pub mod pagination;
pub mod registry;

pub use field::{FieldPolicy, KeyArgs, MergeStrategy, ReadStrategy};
pub use inventory::inventory_policies;
pub use keys::{KeyFn, KeyRegistry, KeyStrategy};
pub use local::LocalField;
pub use pagination::{merge_page, ItemKey, PageMerge};
pub use registry::{policy_typename, root_typename, TypePolicies, MUTATION_TYPE, QUERY_TYPE};
