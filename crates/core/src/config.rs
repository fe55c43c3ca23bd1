//! Cache configuration
//!
//! Use the builder methods or load from TOML:
//!
//! ```
//! use boxcache_core::CacheConfig;
//!
//! let cfg = CacheConfig::new().add_typename(false);
//! assert!(!cfg.add_typename);
//!
//! let cfg = CacheConfig::from_toml_str("warn_on_missing_key = true").unwrap();
//! assert!(cfg.warn_on_missing_key);
//! assert!(cfg.add_typename);
//! ```

use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};

/// Options controlling how the cache normalizes and maintains data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Select `__typename` on every object so results can be normalized
    pub add_typename: bool,
    /// Log objects whose key fields are missing at `warn` instead of `debug`
    pub warn_on_missing_key: bool,
    /// Run garbage collection after every eviction
    pub gc_after_evict: bool,
}

impl CacheConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether `__typename` is added to object selections
    pub fn add_typename(mut self, enabled: bool) -> Self {
        self.add_typename = enabled;
        self
    }

    /// Set the log level used for objects without key fields
    pub fn warn_on_missing_key(mut self, enabled: bool) -> Self {
        self.warn_on_missing_key = enabled;
        self
    }

    /// Set whether eviction triggers garbage collection
    pub fn gc_after_evict(mut self, enabled: bool) -> Self {
        self.gc_after_evict = enabled;
        self
    }

    /// Parse a config from TOML; absent keys keep their defaults
    pub fn from_toml_str(s: &str) -> CacheResult<Self> {
        toml::from_str(s).map_err(|e| CacheError::Config(e.to_string()))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            add_typename: true,
            warn_on_missing_key: false,
            gc_after_evict: false,
        }
    }
}
