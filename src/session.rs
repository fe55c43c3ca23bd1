//! Per-user client state
//!
//! A `Session` owns what one signed-in user works with: the inventory
//! cache and the UI preferences. Screens receive it (or clones of its
//! parts) instead of reaching for globals.

use crate::types::{
    inventory_policies, Cache, CacheConfig, CacheResult, Preferences, Value,
};
use boxcache_policies::inventory::SCANNED_BOXES_FIELD;
use std::sync::Arc;
use tracing::debug;

/// Cache and preferences for one user
#[derive(Debug, Clone)]
pub struct Session {
    cache: Arc<Cache>,
    preferences: Preferences,
}

impl Session {
    /// Start a session with the inventory policies
    pub fn new(config: CacheConfig) -> Self {
        Self::with_cache(Arc::new(Cache::new(inventory_policies(), config)))
    }

    /// Start a session from a TOML cache configuration
    pub fn from_toml_str(config: &str) -> CacheResult<Self> {
        Ok(Self::new(CacheConfig::from_toml_str(config)?))
    }

    /// Start a session around an existing cache
    pub fn with_cache(cache: Arc<Cache>) -> Self {
        Self {
            cache,
            preferences: Preferences::new(),
        }
    }

    /// Shared cache
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// UI preferences
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Boxes scanned so far, oldest first
    pub fn scanned_boxes(&self) -> Vec<Value> {
        match self.cache.read_local(SCANNED_BOXES_FIELD) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }

    /// Add a scanned box record
    ///
    /// A record whose `labelIdentifier` is already in the list replaces the
    /// earlier one in place.
    pub fn add_scanned_box(&self, record: Value) {
        let label = record.get("labelIdentifier").cloned();
        self.cache.update_local(SCANNED_BOXES_FIELD, move |current| {
            let mut items = current.as_array().cloned().unwrap_or_default();
            let existing = label.as_ref().and_then(|label| {
                items
                    .iter()
                    .position(|item| item.get("labelIdentifier") == Some(label))
            });
            match existing {
                Some(pos) => items[pos] = record,
                None => items.push(record),
            }
            Value::Array(items)
        });
    }

    /// Remove every scanned box
    pub fn clear_scanned_boxes(&self) {
        debug!(target: "boxcache::session", "scanned boxes cleared");
        self.cache
            .write_local(SCANNED_BOXES_FIELD, Value::Array(Vec::new()));
    }

    /// Drop all cached data and reset preferences, e.g. on sign-out
    pub fn reset(&self) {
        self.cache.reset();
        self.preferences.reset_all();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
