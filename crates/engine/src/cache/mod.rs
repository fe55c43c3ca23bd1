//! Normalized cache
//!
//! `Cache` ties the store to the policies: results are flattened into
//! entities on write and re-assembled from them on read. Local fields are
//! written when the cache is built, so they can always be read.
//!
//! Writes are serialized by a single lock. Watchers are notified after the
//! lock is released, on the writing thread, with the ids that changed.
//!
//! # Example
//!
//! ```
//! use boxcache_core::{ArgValue, CacheConfig, Field, Operation, Variables};
//! use boxcache_engine::{Cache, WriteOptions};
//! use boxcache_policies::inventory_policies;
//! use serde_json::json;
//!
//! let cache = Cache::new(inventory_policies(), CacheConfig::default());
//! let op = Operation::query("Box").select(
//!     Field::new("box")
//!         .arg("labelIdentifier", ArgValue::var("label"))
//!         .select([Field::new("labelIdentifier"), Field::new("numberOfItems")]),
//! );
//! let mut vars = Variables::new();
//! vars.insert("label".into(), json!("L100"));
//!
//! cache.write_query(
//!     &op,
//!     &vars,
//!     &json!({"box": {"__typename": "Box", "labelIdentifier": "L100", "numberOfItems": 4}}),
//!     WriteOptions::default(),
//! );
//! let data = cache.read_query(&op, &vars).unwrap();
//! assert_eq!(data["box"]["numberOfItems"], json!(4));
//! ```

mod gc;
mod read;
mod write;

pub use write::WriteOptions;

use boxcache_core::{
    CacheConfig, CacheError, CacheResult, EntityId, Object, ResponsePath, StoreFieldName, Value,
};
use boxcache_policies::TypePolicies;
use boxcache_reactive::{ListenerSet, Subscription};
use boxcache_storage::{EntityStore, StoreSnapshot};
use parking_lot::{Mutex, ReentrantMutex};
use tracing::debug;

/// Notification sent to watchers after a write changed the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    /// Store version of the write
    pub version: u64,
    /// Ids of the objects that changed or were removed, sorted
    pub changed: Vec<EntityId>,
}

/// Normalized entity cache
pub struct Cache {
    store: EntityStore,
    policies: TypePolicies,
    config: CacheConfig,
    write_lock: Mutex<()>,
    local_updates: ReentrantMutex<()>,
    watchers: ListenerSet<CacheEvent>,
}

impl Cache {
    /// Create a cache and write every local field default
    pub fn new(policies: TypePolicies, config: CacheConfig) -> Self {
        let cache = Self {
            store: EntityStore::new(),
            policies,
            config,
            write_lock: Mutex::new(()),
            local_updates: ReentrantMutex::new(()),
            watchers: ListenerSet::new(),
        };
        cache.init_local_fields(false);
        cache
    }

    /// Policies the cache was built with
    pub fn policies(&self) -> &TypePolicies {
        &self.policies
    }

    /// Configuration the cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current store version
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// Number of stored objects, roots included
    pub fn entity_count(&self) -> usize {
        self.store.total_entries()
    }

    /// Check if an object is stored
    pub fn contains(&self, id: &EntityId) -> bool {
        self.store.contains(id)
    }

    /// Identity the cache would give a result object
    pub fn identify(&self, value: &Value) -> Option<EntityId> {
        value.as_object().and_then(|obj| self.policies.identify(obj))
    }

    /// Register a watcher called after every write that changed something
    pub fn watch<F>(&self, watcher: F) -> Subscription
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.watchers.add(watcher)
    }

    // ========================================================================
    // Local fields
    // ========================================================================

    /// Replace a local field's value
    pub fn write_local(&self, name: &str, value: Value) {
        let event = {
            let _guard = self.write_lock.lock();
            self.set_local_locked(name, value)
        };
        self.emit(event);
    }

    /// Current value of a local field
    pub fn read_local(&self, name: &str) -> CacheResult<Value> {
        let root = EntityId::root_query();
        self.store
            .get_field(&root, name)
            .ok_or_else(|| CacheError::MissingField {
                entity: root,
                field: name.to_string(),
                path: ResponsePath::root().field(name),
            })
    }

    /// Derive a local field's next value from its current one
    ///
    /// A field missing from the store starts from its declared default, or
    /// null if it was never declared. Updates are serialized against each
    /// other; `f` runs without the write lock, so it may read or write the
    /// cache on the same thread.
    pub fn update_local<F>(&self, name: &str, f: F)
    where
        F: FnOnce(&Value) -> Value,
    {
        let _turn = self.local_updates.lock();
        let current = self
            .store
            .get_field(&EntityId::root_query(), name)
            .or_else(|| self.policies.local(name).map(|l| l.default.clone()))
            .unwrap_or(Value::Null);
        let next = f(&current);
        let event = {
            let _guard = self.write_lock.lock();
            self.set_local_locked(name, next)
        };
        self.emit(event);
    }

    fn set_local_locked(&self, name: &str, value: Value) -> Option<CacheEvent> {
        let root = EntityId::root_query();
        let version = self.store.next_version();
        let field = StoreFieldName::plain(name);
        if self.store.set_field(&root, field.as_str(), value, version) {
            debug!(target: "boxcache::local", field = name, version, "local field written");
            Some(CacheEvent {
                version,
                changed: vec![root],
            })
        } else {
            None
        }
    }

    /// Write local field defaults; with `only_missing`, only fields that
    /// are not stored
    fn init_local_fields(&self, only_missing: bool) {
        let root = EntityId::root_query();
        let pending: Vec<_> = self
            .policies
            .local_fields()
            .iter()
            .filter(|l| !only_missing || self.store.get_field(&root, &l.name).is_none())
            .collect();
        if pending.is_empty() {
            return;
        }
        let version = self.store.next_version();
        for local in pending {
            self.store
                .set_field(&root, &local.name, local.default.clone(), version);
        }
    }

    // ========================================================================
    // Eviction
    // ========================================================================

    /// Remove an object
    ///
    /// References to it become dangling: lists skip them on read, single
    /// fields report a miss. Returns `false` if the object was not stored.
    pub fn evict(&self, id: &EntityId) -> bool {
        let event = {
            let _guard = self.write_lock.lock();
            if self.store.delete(id).is_none() {
                return false;
            }
            let mut changed = vec![id.clone()];
            if self.config.gc_after_evict {
                changed.extend(self.collect_garbage_locked());
            }
            self.init_local_fields(true);
            changed.sort();
            debug!(target: "boxcache::evict", entity = %id, removed = changed.len(), "evicted");
            Some(CacheEvent {
                version: self.store.next_version(),
                changed,
            })
        };
        self.emit(event);
        true
    }

    /// Remove every stored variant of a field, whatever its arguments
    ///
    /// Returns `false` if the object had no such field.
    pub fn evict_field(&self, id: &EntityId, field: &str) -> bool {
        let event = {
            let _guard = self.write_lock.lock();
            let Some(object) = self.store.get(id) else {
                return false;
            };
            let version = self.store.next_version();
            let names: Vec<String> = object
                .fields
                .keys()
                .filter(|name| is_variant_of(name, field))
                .cloned()
                .collect();
            if names.is_empty() {
                return false;
            }
            for name in &names {
                self.store.remove_field(id, name, version);
            }
            self.init_local_fields(true);
            debug!(target: "boxcache::evict", entity = %id, field, variants = names.len(), "field evicted");
            Some(CacheEvent {
                version: self.store.version(),
                changed: vec![id.clone()],
            })
        };
        self.emit(event);
        true
    }

    /// Remove every object that cannot be reached from a root
    ///
    /// Returns the removed ids, sorted.
    pub fn gc(&self) -> Vec<EntityId> {
        let (removed, event) = {
            let _guard = self.write_lock.lock();
            let removed = self.collect_garbage_locked();
            self.init_local_fields(true);
            let event = (!removed.is_empty()).then(|| CacheEvent {
                version: self.store.next_version(),
                changed: removed.clone(),
            });
            (removed, event)
        };
        self.emit(event);
        removed
    }

    /// Remove everything, then write local field defaults again
    pub fn reset(&self) {
        let event = {
            let _guard = self.write_lock.lock();
            let mut changed = self.store.ids();
            changed.sort();
            self.store.clear();
            self.init_local_fields(false);
            debug!(target: "boxcache::evict", removed = changed.len(), "cache reset");
            Some(CacheEvent {
                version: self.store.version(),
                changed,
            })
        };
        self.emit(event);
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Serializable image of every stored object
    pub fn extract(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Snapshot as JSON text
    pub fn extract_json(&self) -> CacheResult<String> {
        serde_json::to_string(&self.extract()).map_err(|e| CacheError::Snapshot(e.to_string()))
    }

    /// Replace the store's contents with a snapshot
    ///
    /// Local fields missing from the snapshot get their defaults.
    pub fn restore(&self, snapshot: StoreSnapshot) {
        let event = {
            let _guard = self.write_lock.lock();
            let mut changed: Vec<EntityId> = self.store.ids();
            changed.extend(snapshot.entities.keys().cloned());
            changed.sort();
            changed.dedup();
            self.store.restore(snapshot);
            self.init_local_fields(true);
            Some(CacheEvent {
                version: self.store.version(),
                changed,
            })
        };
        self.emit(event);
    }

    /// Restore from JSON text produced by [`extract_json`](Cache::extract_json)
    pub fn restore_json(&self, json: &str) -> CacheResult<()> {
        let snapshot: StoreSnapshot =
            serde_json::from_str(json).map_err(|e| CacheError::Snapshot(e.to_string()))?;
        self.restore(snapshot);
        Ok(())
    }

    fn emit(&self, event: Option<CacheEvent>) {
        if let Some(event) = event {
            if !event.changed.is_empty() {
                self.watchers.notify(&event);
            }
        }
    }

    pub(crate) fn stored_fields(&self, id: &EntityId) -> Option<Object> {
        self.store.get(id).map(|obj| obj.fields)
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("version", &self.store.version())
            .field("entities", &self.store.total_entries())
            .field("watchers", &self.watchers.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Check if a store field name is `field` called with any arguments
fn is_variant_of(store_name: &str, field: &str) -> bool {
    match store_name.strip_prefix(field) {
        Some(rest) => rest.is_empty() || rest.starts_with('('),
        None => false,
    }
}
