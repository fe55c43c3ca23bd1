//! Sharded normalized entity store
//!
//! Every normalized object lives in exactly one shard, chosen by the type
//! name encoded in its id. Root objects (`ROOT_QUERY`, `ROOT_MUTATION`) get
//! a shard of their own.
//!
//! # Design
//!
//! - DashMap: one shard per type name, reads never block other types
//! - FxHashMap: O(1) lookups by entity id inside a shard
//! - Version counter: bumped once per logical write, stamped on every object
//!   touched by that write
//!
//! Field-level merging (incoming wins) happens here; list and pagination
//! merging is decided by the policy layer before values reach the store.

use boxcache_core::{EntityId, Object, Value};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A normalized object and the write that last touched it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Field values by store field name
    pub fields: Object,
    /// Version of the last write that changed this object
    pub version: u64,
}

impl StoredObject {
    fn new(fields: Object, version: u64) -> Self {
        Self { fields, version }
    }
}

/// Objects of one type name
#[derive(Debug)]
pub struct Shard {
    /// HashMap with FxHash for O(1) lookups
    pub(crate) data: FxHashMap<EntityId, StoredObject>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self {
            data: FxHashMap::default(),
        }
    }

    /// Get number of objects in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Shard {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable image of the whole store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Store version when the snapshot was taken
    pub version: u64,
    /// Every object's fields, ordered by id for stable output
    pub entities: BTreeMap<EntityId, Object>,
}

/// Normalized entity store - DashMap by type name, HashMap within
///
/// # Thread Safety
///
/// All operations take `&self`. A single call is atomic for the object it
/// touches; there is no multi-object atomicity.
///
/// # Example
///
/// ```
/// use boxcache_core::EntityId;
/// use boxcache_storage::EntityStore;
/// use serde_json::json;
///
/// let store = EntityStore::new();
/// let id = EntityId::from(r#"Box:{"labelIdentifier":"L100"}"#);
/// let version = store.next_version();
/// let fields = json!({"labelIdentifier": "L100", "numberOfItems": 4});
/// store.merge_fields(&id, fields.as_object().unwrap().clone(), version);
///
/// assert_eq!(store.get_field(&id, "numberOfItems"), Some(json!(4)));
/// ```
pub struct EntityStore {
    /// Per-type shards using DashMap
    shards: DashMap<String, Shard>,
    /// Global write version
    version: AtomicU64,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Get current version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Increment version and return new value
    #[inline]
    pub fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Set version (used on restore)
    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::Release);
    }

    /// Get number of shards (type names)
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Get total number of objects across all shards
    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    // ========================================================================
    // Object operations
    // ========================================================================

    /// Get a copy of an object
    #[inline]
    pub fn get(&self, id: &EntityId) -> Option<StoredObject> {
        self.shards
            .get(id.typename())
            .and_then(|shard| shard.data.get(id).cloned())
    }

    /// Get a copy of one field of an object
    #[inline]
    pub fn get_field(&self, id: &EntityId, field: &str) -> Option<Value> {
        self.shards
            .get(id.typename())
            .and_then(|shard| shard.data.get(id).and_then(|obj| obj.fields.get(field).cloned()))
    }

    /// Check if an object exists
    #[inline]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.shards
            .get(id.typename())
            .map(|shard| shard.data.contains_key(id))
            .unwrap_or(false)
    }

    /// Merge fields into an object, creating it if needed
    ///
    /// Incoming fields overwrite existing ones with the same name; fields
    /// not mentioned are kept. Returns `true` if anything changed.
    pub fn merge_fields(&self, id: &EntityId, fields: Object, version: u64) -> bool {
        let mut shard = self
            .shards
            .entry(id.typename().to_string())
            .or_insert_with(Shard::new);

        match shard.data.get_mut(id) {
            Some(existing) => {
                let mut changed = false;
                for (name, value) in fields {
                    if existing.fields.get(&name) != Some(&value) {
                        existing.fields.insert(name, value);
                        changed = true;
                    }
                }
                if changed {
                    existing.version = version;
                }
                changed
            }
            None => {
                shard.data.insert(id.clone(), StoredObject::new(fields, version));
                true
            }
        }
    }

    /// Set a single field, creating the object if needed
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_field(&self, id: &EntityId, field: &str, value: Value, version: u64) -> bool {
        let mut fields = Object::new();
        fields.insert(field.to_string(), value);
        self.merge_fields(id, fields, version)
    }

    /// Replace an object's fields wholesale
    pub fn put(&self, id: EntityId, fields: Object, version: u64) {
        self.shards
            .entry(id.typename().to_string())
            .or_insert_with(Shard::new)
            .data
            .insert(id, StoredObject::new(fields, version));
    }

    /// Remove one field of an object, returning its value
    pub fn remove_field(&self, id: &EntityId, field: &str, version: u64) -> Option<Value> {
        let mut shard = self.shards.get_mut(id.typename())?;
        let obj = shard.data.get_mut(id)?;
        let removed = obj.fields.remove(field);
        if removed.is_some() {
            obj.version = version;
        }
        removed
    }

    /// Delete an object, returning it if it existed
    #[inline]
    pub fn delete(&self, id: &EntityId) -> Option<StoredObject> {
        self.shards
            .get_mut(id.typename())
            .and_then(|mut shard| shard.data.remove(id))
    }

    /// Ids of every stored object
    pub fn ids(&self) -> Vec<EntityId> {
        self.shards
            .iter()
            .flat_map(|shard| shard.value().data.keys().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// Remove every object; the version counter is kept
    pub fn clear(&self) {
        self.shards.clear();
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Take a serializable image of every object
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut entities = BTreeMap::new();
        for shard in self.shards.iter() {
            for (id, obj) in &shard.value().data {
                entities.insert(id.clone(), obj.fields.clone());
            }
        }
        StoreSnapshot {
            version: self.version(),
            entities,
        }
    }

    /// Replace the whole store with a snapshot's contents
    pub fn restore(&self, snapshot: StoreSnapshot) {
        self.clear();
        let count = snapshot.entities.len();
        for (id, fields) in snapshot.entities {
            self.put(id, fields, snapshot.version);
        }
        self.set_version(snapshot.version);
        tracing::debug!(
            target: "boxcache::storage",
            version = snapshot.version,
            entities = count,
            "store restored from snapshot"
        );
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("shard_count", &self.shard_count())
            .field("version", &self.version())
            .field("total_entries", &self.total_entries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    fn box_id(label: &str) -> EntityId {
        EntityId::from_key_fields("Box", [("labelIdentifier", &json!(label))])
    }

    #[test]
    fn test_store_creation() {
        let store = EntityStore::new();
        assert_eq!(store.shard_count(), 0);
        assert_eq!(store.version(), 0);
        assert_eq!(store.total_entries(), 0);
    }

    #[test]
    fn test_version_increment() {
        let store = EntityStore::new();
        assert_eq!(store.next_version(), 1);
        assert_eq!(store.next_version(), 2);
        assert_eq!(store.version(), 2);
        store.set_version(100);
        assert_eq!(store.version(), 100);
    }

    #[test]
    fn test_version_thread_safety() {
        use std::thread;
        let store = Arc::new(EntityStore::new());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.next_version();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.version(), 1000);
    }

    #[test]
    fn test_shard_creation() {
        let shard = Shard::new();
        assert!(shard.is_empty());
        assert_eq!(shard.len(), 0);
    }

    #[test]
    fn test_debug_impl() {
        let debug_str = format!("{:?}", EntityStore::new());
        assert!(debug_str.contains("EntityStore"));
        assert!(debug_str.contains("shard_count"));
    }

    #[test]
    fn test_merge_creates_then_merges() {
        let store = EntityStore::new();
        let id = box_id("L100");

        assert!(store.merge_fields(&id, obj(json!({"labelIdentifier": "L100", "state": "InStock"})), 1));
        assert!(store.merge_fields(&id, obj(json!({"numberOfItems": 10})), 2));

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.fields["state"], json!("InStock"));
        assert_eq!(stored.fields["numberOfItems"], json!(10));
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn test_merge_incoming_wins() {
        let store = EntityStore::new();
        let id = box_id("L100");
        store.merge_fields(&id, obj(json!({"state": "InStock"})), 1);
        store.merge_fields(&id, obj(json!({"state": "Lost"})), 2);
        assert_eq!(store.get_field(&id, "state"), Some(json!("Lost")));
    }

    #[test]
    fn test_merge_unchanged_keeps_version() {
        let store = EntityStore::new();
        let id = box_id("L100");
        store.merge_fields(&id, obj(json!({"state": "InStock"})), 1);
        assert!(!store.merge_fields(&id, obj(json!({"state": "InStock"})), 5));
        assert_eq!(store.get(&id).unwrap().version, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = EntityStore::new();
        assert!(store.get(&box_id("nope")).is_none());
        assert!(store.get_field(&box_id("nope"), "state").is_none());
        assert!(!store.contains(&box_id("nope")));
    }

    #[test]
    fn test_put_replaces() {
        let store = EntityStore::new();
        let id = box_id("L1");
        store.merge_fields(&id, obj(json!({"a": 1, "b": 2})), 1);
        store.put(id.clone(), obj(json!({"c": 3})), 2);
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.fields.len(), 1);
        assert_eq!(stored.fields["c"], json!(3));
    }

    #[test]
    fn test_set_and_remove_field() {
        let store = EntityStore::new();
        let root = EntityId::root_query();
        assert!(store.set_field(&root, "scannedBoxes", json!([]), 1));
        assert!(store.contains(&root));
        assert_eq!(store.remove_field(&root, "scannedBoxes", 2), Some(json!([])));
        assert_eq!(store.remove_field(&root, "scannedBoxes", 3), None);
        assert_eq!(store.get(&root).unwrap().version, 2);
    }

    #[test]
    fn test_delete() {
        let store = EntityStore::new();
        let id = box_id("L1");
        store.merge_fields(&id, obj(json!({"a": 1})), 1);
        assert!(store.delete(&id).is_some());
        assert!(store.delete(&id).is_none());
        assert!(!store.contains(&id));
    }

    #[test]
    fn test_types_are_sharded() {
        let store = EntityStore::new();
        store.merge_fields(&box_id("L1"), obj(json!({"a": 1})), 1);
        store.merge_fields(&box_id("L2"), obj(json!({"a": 1})), 1);
        store.merge_fields(&EntityId::from("QrCode:{\"code\":\"x\"}"), obj(json!({"a": 1})), 1);
        store.merge_fields(&EntityId::root_query(), obj(json!({"a": 1})), 1);

        assert_eq!(store.shard_count(), 3);
        assert_eq!(store.shards.get("Box").map(|s| s.len()), Some(2));
        assert!(store.shards.get("Missing").is_none());
        assert_eq!(store.total_entries(), 4);
        assert_eq!(store.ids().len(), 4);
    }

    #[test]
    fn test_snapshot_and_restore() {
        let store = EntityStore::new();
        let v = store.next_version();
        store.merge_fields(&box_id("L1"), obj(json!({"a": 1})), v);
        store.merge_fields(&EntityId::root_query(), obj(json!({"b": {"__ref": "Box:x"}})), v);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.entities.len(), 2);

        let other = EntityStore::new();
        other.merge_fields(&box_id("stale"), obj(json!({"a": 0})), 1);
        other.restore(snapshot.clone());
        assert_eq!(other.version(), 1);
        assert!(!other.contains(&box_id("stale")));
        assert_eq!(other.snapshot(), snapshot);
    }

    #[test]
    fn test_snapshot_serializes() {
        let store = EntityStore::new();
        store.merge_fields(&box_id("L1"), obj(json!({"a": 1})), 1);
        let encoded = serde_json::to_string(&store.snapshot()).unwrap();
        let decoded: StoreSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, store.snapshot());
    }

    #[test]
    fn test_concurrent_writes_different_types() {
        use std::thread;

        let store = Arc::new(EntityStore::new());

        let handles: Vec<_> = (0..10)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let id = EntityId::from(format!("Type{}:{}", t, i));
                        store.merge_fields(&id, obj(json!({"i": i})), 1);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.shard_count(), 10);
        assert_eq!(store.total_entries(), 1000);
    }
}
