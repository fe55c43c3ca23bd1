//! Core identifiers of the normalized store
//!
//! - EntityId: canonical identity of a normalized object (`Box:{"labelIdentifier":"L100"}`)
//! - StoreFieldName: field name plus the key arguments that scope it (`boxes({"baseId":"5"})`)
//! - References: `{"__ref": "<entity id>"}` links between normalized objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data values flowing through the cache
pub type Value = serde_json::Value;

/// A JSON object (field name -> value)
pub type Object = serde_json::Map<String, Value>;

/// Id of the root query object
pub const ROOT_QUERY: &str = "ROOT_QUERY";

/// Id of the root mutation object
pub const ROOT_MUTATION: &str = "ROOT_MUTATION";

/// Field carrying the concrete type of an object
pub const TYPENAME_FIELD: &str = "__typename";

/// Field carrying the target of a reference
pub const REF_FIELD: &str = "__ref";

/// Identity of a normalized object
///
/// Root objects use their bare name (`ROOT_QUERY`). Entities use
/// `Typename:<key>`, where `<key>` is either the compact JSON of the key
/// fields in declaration order or, for the default strategy, the raw `id`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an already-canonical id string
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    /// The root query object
    pub fn root_query() -> Self {
        EntityId(ROOT_QUERY.to_string())
    }

    /// The root mutation object
    pub fn root_mutation() -> Self {
        EntityId(ROOT_MUTATION.to_string())
    }

    /// Build an id from business-key fields, e.g. `Box:{"labelIdentifier":"L100"}`
    pub fn from_key_fields<'a>(
        typename: &str,
        fields: impl IntoIterator<Item = (&'a str, &'a Value)>,
    ) -> Self {
        let mut key = Object::new();
        for (name, value) in fields {
            key.insert(name.to_string(), canonicalize(value));
        }
        EntityId(format!("{}:{}", typename, Value::Object(key)))
    }

    /// Build an id from a scalar `id` field, e.g. `Shipment:12`
    pub fn from_id(typename: &str, id: &Value) -> Self {
        match id {
            Value::String(s) => EntityId(format!("{}:{}", typename, s)),
            other => EntityId(format!("{}:{}", typename, other)),
        }
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type name encoded in the id (the whole id for roots)
    pub fn typename(&self) -> &str {
        match self.0.split_once(':') {
            Some((typename, _)) => typename,
            None => &self.0,
        }
    }

    /// Check if this is one of the root objects
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_QUERY || self.0 == ROOT_MUTATION
    }

    /// The `{"__ref": id}` value linking to this object
    pub fn to_reference(&self) -> Value {
        let mut link = Object::new();
        link.insert(REF_FIELD.to_string(), Value::String(self.0.clone()));
        Value::Object(link)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Target of a `{"__ref": ...}` value, if it is one
pub fn as_reference(value: &Value) -> Option<EntityId> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get(REF_FIELD)
        .and_then(Value::as_str)
        .map(EntityId::new)
}

/// Field name as stored, scoped by its key arguments
///
/// Without key arguments this is the plain field name. With key arguments
/// the canonical (sorted-key) JSON of those arguments is appended, so
/// `boxes(baseId: "5", paginationInput: ...)` with key args `["baseId"]`
/// becomes `boxes({"baseId":"5"})` no matter which page was requested.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreFieldName(String);

impl StoreFieldName {
    /// Store name for a field and the arguments that scope it
    pub fn new(field: &str, key_args: &Object) -> Self {
        if key_args.is_empty() {
            StoreFieldName(field.to_string())
        } else {
            let args = canonicalize(&Value::Object(key_args.clone()));
            StoreFieldName(format!("{}({})", field, args))
        }
    }

    /// Store name for an argument-free field
    pub fn plain(field: &str) -> Self {
        StoreFieldName(field.to_string())
    }

    /// Get the full store name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The schema field name without arguments
    pub fn field_name(&self) -> &str {
        match self.0.find('(') {
            Some(pos) => &self.0[..pos],
            None => &self.0,
        }
    }
}

impl fmt::Display for StoreFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StoreFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreFieldName({})", self.0)
    }
}

/// Copy of `value` with every object's keys in sorted order
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            let mut sorted = Object::new();
            for k in keys {
                sorted.insert(k.clone(), canonicalize(&obj[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
