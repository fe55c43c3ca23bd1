//! Entity identity
//!
//! Each type name maps to a [`KeyStrategy`] that turns an object's fields
//! into a canonical [`EntityId`]. Inventory records are identified by
//! business keys (a box by its label, a QR code by its code) rather than
//! surrogate ids.
//!
//! A missing or null key field yields `None`: the object is stored inline
//! where it appears instead of being normalized. Partial responses must
//! never break the cache.

use boxcache_core::{EntityId, Object, Value, TYPENAME_FIELD};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Custom key extraction: `(typename, fields) -> id`
pub type KeyFn = Arc<dyn Fn(&str, &Object) -> Option<EntityId> + Send + Sync>;

/// How objects of one type are identified
#[derive(Clone)]
pub enum KeyStrategy {
    /// `Typename:<id>` from the `id` field
    Default,
    /// `Typename:{"f1":v1,"f2":v2}` from the listed fields, in order
    Fields(Vec<String>),
    /// Never normalized; always stored inline
    Anonymous,
    /// Caller-supplied extraction
    Custom(KeyFn),
}

impl KeyStrategy {
    /// Key on the given fields, in order
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyStrategy::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Key with a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &Object) -> Option<EntityId> + Send + Sync + 'static,
    {
        KeyStrategy::Custom(Arc::new(f))
    }

    /// Compute the id of an object of type `typename`
    pub fn identify(&self, typename: &str, fields: &Object) -> Option<EntityId> {
        match self {
            KeyStrategy::Default => present(fields, "id").map(|id| EntityId::from_id(typename, id)),
            KeyStrategy::Fields(names) => {
                let mut values = Vec::with_capacity(names.len());
                for name in names {
                    values.push((name.as_str(), present(fields, name)?));
                }
                Some(EntityId::from_key_fields(typename, values))
            }
            KeyStrategy::Anonymous => None,
            KeyStrategy::Custom(f) => f(typename, fields),
        }
    }
}

impl fmt::Debug for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStrategy::Default => f.write_str("Default"),
            KeyStrategy::Fields(names) => f.debug_tuple("Fields").field(names).finish(),
            KeyStrategy::Anonymous => f.write_str("Anonymous"),
            KeyStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

static DEFAULT_STRATEGY: KeyStrategy = KeyStrategy::Default;

fn present<'a>(fields: &'a Object, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

/// Registry from type name to key strategy
///
/// Types without an entry use [`KeyStrategy::Default`].
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    strategies: FxHashMap<String, KeyStrategy>,
}

impl KeyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the strategy for a type
    pub fn register(&mut self, typename: impl Into<String>, strategy: KeyStrategy) {
        self.strategies.insert(typename.into(), strategy);
    }

    /// Strategy used for a type
    pub fn strategy(&self, typename: &str) -> &KeyStrategy {
        self.strategies.get(typename).unwrap_or(&DEFAULT_STRATEGY)
    }

    /// Identify an object by its own `__typename`
    pub fn identify(&self, fields: &Object) -> Option<EntityId> {
        let typename = fields.get(TYPENAME_FIELD)?.as_str()?;
        self.identify_as(typename, fields)
    }

    /// Identify an object as a given type
    pub fn identify_as(&self, typename: &str, fields: &Object) -> Option<EntityId> {
        self.strategy(typename).identify(typename, fields)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if no types are registered
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
