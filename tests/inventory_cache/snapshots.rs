//! Snapshots, eviction and garbage collection

use crate::test_utils::*;
use boxcache::{CacheError, EntityId, Session, WriteOptions};
use serde_json::json;

fn seeded() -> Session {
    let session = session();
    session.cache().write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L100", "L101"], 2),
        WriteOptions::default(),
    );
    session.add_scanned_box(json!({"labelIdentifier": "L100"}));
    session
}

#[test]
fn restored_cache_answers_like_the_original() {
    let original = seeded();
    let json = original.cache().extract_json().unwrap();

    let restored = session();
    restored.cache().restore_json(&json).unwrap();

    let a = original.cache().read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    let b = restored.cache().read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    assert_eq!(a, b);
    assert_eq!(restored.scanned_boxes().len(), 1);
    assert_eq!(restored.cache().extract(), original.cache().extract());
}

#[test]
fn bad_snapshot_is_rejected_and_cache_kept() {
    let session = seeded();
    let err = session.cache().restore_json("[1, 2").unwrap_err();
    assert!(matches!(err, CacheError::Snapshot(_)));
    assert!(session
        .cache()
        .read_query(&boxes_query(), &base_vars("5", None))
        .is_ok());
}

#[test]
fn dropping_the_list_orphans_its_boxes() {
    let session = seeded();
    let cache = session.cache();
    let entities_before = cache.entity_count();

    assert!(cache.evict_field(&EntityId::root_query(), "boxes"));
    let removed = cache.gc();
    // two boxes and the product they share
    assert_eq!(removed.len(), 3);
    assert_eq!(cache.entity_count(), entities_before - 3);
    assert_eq!(session.scanned_boxes().len(), 1);
}

#[test]
fn watchers_hear_about_evictions() {
    let session = seeded();
    let cache = session.cache();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    let _sub = cache.watch(move |e| sink.lock().extend(e.changed.clone()));

    let l100 = cache.identify(&a_box("L100", 1)).unwrap();
    assert!(cache.evict(&l100));
    assert_eq!(*seen.lock(), vec![l100]);
}
