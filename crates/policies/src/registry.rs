//! Policy registry
//!
//! `TypePolicies` bundles everything the cache consults while normalizing
//! and reading: key strategies per type, field policies per
//! `(type, field)`, and the client-only root fields.
//!
//! Root fields are registered under the type names `Query` and `Mutation`.
//!
//! # Example
//!
//! ```
//! use boxcache_policies::{FieldPolicy, KeyArgs, KeyStrategy, MergeStrategy, TypePolicies};
//!
//! let policies = TypePolicies::new()
//!     .key("Box", KeyStrategy::fields(["labelIdentifier"]))
//!     .field(
//!         "Query",
//!         "boxes",
//!         FieldPolicy::new()
//!             .key_args(KeyArgs::only(["baseId"]))
//!             .merge(MergeStrategy::paginated("elements")),
//!     );
//! assert!(policies.field_policy("Query", "boxes").is_some());
//! ```

use crate::field::FieldPolicy;
use crate::keys::{KeyRegistry, KeyStrategy};
use crate::local::LocalField;
use boxcache_core::{EntityId, Object, OperationKind, StoreFieldName, ROOT_MUTATION, ROOT_QUERY};
use rustc_hash::FxHashMap;

/// Type name used for root query field policies
pub const QUERY_TYPE: &str = "Query";

/// Type name used for root mutation field policies
pub const MUTATION_TYPE: &str = "Mutation";

static DEFAULT_FIELD_POLICY: FieldPolicy = FieldPolicy {
    key_args: crate::field::KeyArgs::All,
    merge: crate::field::MergeStrategy::Replace,
    read: crate::field::ReadStrategy::Stored,
};

/// All policies a cache is configured with
#[derive(Debug, Clone, Default)]
pub struct TypePolicies {
    keys: KeyRegistry,
    fields: FxHashMap<String, FxHashMap<String, FieldPolicy>>,
    local_fields: Vec<LocalField>,
}

impl TypePolicies {
    /// Create an empty policy set (default identity, replace merges)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key strategy for a type (builder pattern)
    pub fn key(mut self, typename: impl Into<String>, strategy: KeyStrategy) -> Self {
        self.keys.register(typename, strategy);
        self
    }

    /// Set the policy for a field of a type (builder pattern)
    pub fn field(
        mut self,
        typename: impl Into<String>,
        field: impl Into<String>,
        policy: FieldPolicy,
    ) -> Self {
        self.fields
            .entry(typename.into())
            .or_default()
            .insert(field.into(), policy);
        self
    }

    /// Declare a client-only root field (builder pattern)
    ///
    /// Declaring the same name twice keeps the later default.
    pub fn local_field(mut self, field: LocalField) -> Self {
        self.local_fields.retain(|f| f.name != field.name);
        self.local_fields.push(field);
        self
    }

    /// Key strategies
    pub fn keys(&self) -> &KeyRegistry {
        &self.keys
    }

    /// Identify an object by its `__typename` and key fields
    pub fn identify(&self, fields: &Object) -> Option<EntityId> {
        self.keys.identify(fields)
    }

    /// Identify an object as a given type
    pub fn identify_as(&self, typename: &str, fields: &Object) -> Option<EntityId> {
        self.keys.identify_as(typename, fields)
    }

    /// Registered policy for a field, if any
    pub fn field_policy(&self, typename: &str, field: &str) -> Option<&FieldPolicy> {
        self.fields.get(typename).and_then(|f| f.get(field))
    }

    /// Policy for a field, falling back to the default policy
    pub fn field_policy_or_default(&self, typename: &str, field: &str) -> &FieldPolicy {
        self.field_policy(typename, field)
            .unwrap_or(&DEFAULT_FIELD_POLICY)
    }

    /// Store name for `field` of `typename` called with resolved `args`
    pub fn store_field_name(&self, typename: &str, field: &str, args: &Object) -> StoreFieldName {
        self.field_policy_or_default(typename, field)
            .store_field_name(field, args)
    }

    /// Client-only root fields
    pub fn local_fields(&self) -> &[LocalField] {
        &self.local_fields
    }

    /// Local field definition by name
    pub fn local(&self, name: &str) -> Option<&LocalField> {
        self.local_fields.iter().find(|f| f.name == name)
    }
}

/// Type name policies use for an object id
///
/// Roots map to `Query` / `Mutation`; entities use their encoded type name.
pub fn policy_typename(id: &EntityId) -> &str {
    match id.as_str() {
        ROOT_QUERY => QUERY_TYPE,
        ROOT_MUTATION => MUTATION_TYPE,
        _ => id.typename(),
    }
}

/// Type name of the root an operation kind writes under
pub fn root_typename(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Query => QUERY_TYPE,
        OperationKind::Mutation => MUTATION_TYPE,
    }
}
