//! Field policies
//!
//! A field policy decides three things for one `(type, field)` pair:
//! - which arguments scope the stored value (`KeyArgs`)
//! - how an incoming value combines with the stored one (`MergeStrategy`)
//! - where a read is served from (`ReadStrategy`)

use crate::pagination::PageMerge;
use boxcache_core::{Object, StoreFieldName, Value};

/// Arguments that identify "the same" stored field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyArgs {
    /// Every argument is part of the key
    #[default]
    All,
    /// Only the listed arguments are part of the key
    Only(Vec<String>),
    /// No argument is part of the key: one stored value for all calls
    None,
}

impl KeyArgs {
    /// Key on the listed arguments only
    pub fn only<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyArgs::Only(args.into_iter().map(Into::into).collect())
    }

    /// Subset of `args` that forms the key
    pub fn select(&self, args: &Object) -> Object {
        match self {
            KeyArgs::All => args.clone(),
            KeyArgs::Only(names) => {
                let mut selected = Object::new();
                for name in names {
                    if let Some(v) = args.get(name) {
                        selected.insert(name.clone(), v.clone());
                    }
                }
                selected
            }
            KeyArgs::None => Object::new(),
        }
    }
}

/// How an incoming field value combines with the stored value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Incoming value replaces the stored value
    #[default]
    Replace,
    /// Inline objects are merged shallowly, incoming fields winning
    MergeObjects,
    /// Paginated collection; see [`crate::pagination`]
    Paginated(PageMerge),
}

impl MergeStrategy {
    /// Paginate over `items_field` with reference-keyed items
    pub fn paginated(items_field: impl Into<String>) -> Self {
        MergeStrategy::Paginated(PageMerge::new(items_field))
    }

    /// Combine a stored and an incoming value
    pub fn merge(&self, existing: Option<&Value>, incoming: Value) -> Value {
        match self {
            MergeStrategy::Replace => incoming,
            MergeStrategy::MergeObjects => match (existing, incoming) {
                (Some(Value::Object(old)), Value::Object(new)) => {
                    let mut merged = old.clone();
                    for (k, v) in new {
                        merged.insert(k, v);
                    }
                    Value::Object(merged)
                }
                (_, incoming) => incoming,
            },
            MergeStrategy::Paginated(page) => page.merge(existing, incoming),
        }
    }
}

/// Where reads of a field are served from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// The value stored under the field's store name
    #[default]
    Stored,
    /// Fall back to an entity identified by the field's arguments
    ///
    /// Lets `box(labelIdentifier: "L100")` be answered from a box that
    /// arrived through any other query. `key_fields` maps each key field of
    /// `typename` to the argument carrying its value.
    ToReference {
        /// Type of the referenced entity
        typename: String,
        /// `(key field, argument name)` pairs
        key_fields: Vec<(String, String)>,
    },
}

impl ReadStrategy {
    /// Redirect to `typename`, with each key field read from the same-named argument
    pub fn to_reference<I, S>(typename: impl Into<String>, key_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReadStrategy::ToReference {
            typename: typename.into(),
            key_fields: key_fields
                .into_iter()
                .map(|f| {
                    let f: String = f.into();
                    (f.clone(), f)
                })
                .collect(),
        }
    }

    /// Type name and key fields of the redirect target, if this is a redirect
    /// and every argument it needs was supplied
    pub fn reference_fields(&self, args: &Object) -> Option<(String, Object)> {
        match self {
            ReadStrategy::Stored => None,
            ReadStrategy::ToReference {
                typename,
                key_fields,
            } => {
                let mut fields = Object::new();
                for (field, arg) in key_fields {
                    fields.insert(field.clone(), args.get(arg)?.clone());
                }
                Some((typename.clone(), fields))
            }
        }
    }
}

/// Policy for one `(type, field)` pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    /// Arguments that scope the stored value
    pub key_args: KeyArgs,
    /// How incoming values combine with stored ones
    pub merge: MergeStrategy,
    /// Where reads are served from
    pub read: ReadStrategy,
}

impl FieldPolicy {
    /// Policy with default behavior (all args key, replace, stored read)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set key arguments
    pub fn key_args(mut self, key_args: KeyArgs) -> Self {
        self.key_args = key_args;
        self
    }

    /// Set merge strategy
    pub fn merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Set read strategy
    pub fn read(mut self, read: ReadStrategy) -> Self {
        self.read = read;
        self
    }

    /// Store name for a call of `field` with resolved `args`
    pub fn store_field_name(&self, field: &str, args: &Object) -> StoreFieldName {
        StoreFieldName::new(field, &self.key_args.select(args))
    }
}
