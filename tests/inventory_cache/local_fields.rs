//! Client-only scanned boxes

use crate::test_utils::*;
use boxcache::{EntityId, Field, Operation, Variables};
use serde_json::json;

fn scanned_query() -> Operation {
    Operation::query("ScannedBoxes").select(
        Field::new("scannedBoxes")
            .client()
            .select([Field::new("labelIdentifier"), Field::new("state")]),
    )
}

#[test]
fn scanned_boxes_start_empty() {
    let session = session();
    let data = session
        .cache()
        .read_query(&scanned_query(), &Variables::new())
        .unwrap();
    assert_eq!(data, json!({"scannedBoxes": []}));
}

#[test]
fn later_write_wins() {
    let session = session();
    let cache = session.cache();
    cache.write_local("scannedBoxes", json!([{"labelIdentifier": "L1", "state": "InStock"}]));
    cache.write_local("scannedBoxes", json!([{"labelIdentifier": "L2", "state": "Lost"}]));

    let data = cache.read_query(&scanned_query(), &Variables::new()).unwrap();
    assert_eq!(
        data,
        json!({"scannedBoxes": [{"labelIdentifier": "L2", "state": "Lost"}]})
    );
}

#[test]
fn add_and_clear_through_session() {
    let session = session();
    session.add_scanned_box(json!({"labelIdentifier": "L1", "state": "InStock"}));
    session.add_scanned_box(json!({"labelIdentifier": "L2", "state": "InStock"}));
    assert_eq!(session.scanned_boxes().len(), 2);

    session.clear_scanned_boxes();
    let data = session
        .cache()
        .read_query(&scanned_query(), &Variables::new())
        .unwrap();
    assert_eq!(data["scannedBoxes"], json!([]));
}

#[test]
fn local_and_server_fields_in_one_query() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &box_query(),
        &label_vars("L1"),
        &json!({"box": a_box("L1", 3)}),
        boxcache::WriteOptions::default(),
    );
    session.add_scanned_box(json!({"labelIdentifier": "L1", "state": "InStock"}));

    let mut op = box_query();
    for field in scanned_query().selection() {
        op = op.select(field.clone());
    }
    let data = cache.read_query(&op, &label_vars("L1")).unwrap();
    assert_eq!(data["box"]["numberOfItems"], json!(3));
    assert_eq!(data["scannedBoxes"][0]["labelIdentifier"], json!("L1"));
    assert!(op.has_client_fields());
    assert!(!op.without_client_fields().has_client_fields());
}

#[test]
fn scanned_boxes_survive_root_eviction() {
    let session = session();
    session.add_scanned_box(json!({"labelIdentifier": "L100"}));
    let root = EntityId::root_query();

    assert!(session.cache().evict_field(&root, "scannedBoxes"));
    assert!(session.scanned_boxes().is_empty());

    session.add_scanned_box(json!({"labelIdentifier": "L101"}));
    assert!(session.cache().evict(&root));
    assert!(session.scanned_boxes().is_empty());
    assert_eq!(
        session.cache().read_local("scannedBoxes").unwrap(),
        json!([])
    );
}
