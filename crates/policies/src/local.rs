//! Client-only fields
//!
//! Local fields live on `ROOT_QUERY` next to server data and are read with
//! the same documents (selected with [`Field::client`](boxcache_core::Field::client)).
//! The cache writes every default when it is constructed, so reading a
//! local field never misses.

use boxcache_core::Value;

/// A client-only root field and its initial value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalField {
    /// Field name on the root query
    pub name: String,
    /// Value written at cache construction and on reset
    pub default: Value,
}

impl LocalField {
    /// Define a local field
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// Define a local list field starting empty
    pub fn empty_list(name: impl Into<String>) -> Self {
        Self::new(name, Value::Array(Vec::new()))
    }
}
