//! Business-key identity

use crate::test_utils::*;
use boxcache::{EntityId, Field, Operation, SelectionSet, Variables, WriteOptions};
use serde_json::json;

#[test]
fn box_is_identified_by_label_not_id() {
    let session = session();
    let cache = session.cache();
    let a = cache.identify(&json!({"__typename": "Box", "id": "1", "labelIdentifier": "L100"}));
    let b = cache.identify(&json!({"__typename": "Box", "id": "2", "labelIdentifier": "L100"}));
    assert_eq!(a, b);
    assert_eq!(a.unwrap().as_str(), r#"Box:{"labelIdentifier":"L100"}"#);
}

#[test]
fn same_box_from_two_queries_is_one_entity() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L100"], 1),
        WriteOptions::default(),
    );
    cache.write_query(
        &box_query(),
        &label_vars("L100"),
        &json!({"box": a_box("L100", 30)}),
        WriteOptions::default(),
    );

    let list = cache.read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    assert_eq!(list["boxes"]["elements"][0]["numberOfItems"], json!(30));
    assert_eq!(cache.policies().keys().len(), 8);
}

#[test]
fn dimension_infos_need_id_and_name() {
    let session = session();
    let cache = session.cache();
    let kids = cache.identify(&json!({"__typename": "TagDimensionInfo", "id": 3, "name": "Kids"}));
    let winter = cache.identify(&json!({"__typename": "TagDimensionInfo", "id": 3, "name": "Winter"}));
    assert_ne!(kids, winter);
    assert!(cache
        .identify(&json!({"__typename": "TagDimensionInfo", "id": 3}))
        .is_none());
}

#[test]
fn object_without_key_is_stored_inline() {
    let session = session();
    let cache = session.cache();
    let op = Operation::query("Q").select(Field::new("box").select([
        Field::new("labelIdentifier"),
        Field::new("numberOfItems"),
    ]));
    let changed = cache.write_query(
        &op,
        &Variables::new(),
        &json!({"box": {"__typename": "Box", "numberOfItems": 2}}),
        WriteOptions::default(),
    );
    assert_eq!(changed, vec![EntityId::root_query()]);

    let op = Operation::query("Q").select(Field::new("box").select([Field::new("numberOfItems")]));
    let data = cache.read_query(&op, &Variables::new()).unwrap();
    assert_eq!(data["box"]["numberOfItems"], json!(2));
}

#[test]
fn fragments_address_entities_directly() {
    let session = session();
    let cache = session.cache();
    let id = cache
        .identify(&json!({"__typename": "QrCode", "code": "abc"}))
        .unwrap();
    let sel = SelectionSet::from_fields([Field::new("code"), Field::new("box").select([Field::new("labelIdentifier")])]);
    cache.write_fragment(
        &id,
        &sel,
        &json!({"__typename": "QrCode", "code": "abc", "box": {"__typename": "Box", "labelIdentifier": "L5"}}),
        WriteOptions::default(),
    );

    let data = cache.read_fragment(&id, &sel).unwrap();
    assert_eq!(data["box"]["labelIdentifier"], json!("L5"));
    assert!(cache.contains(&EntityId::new(r#"Box:{"labelIdentifier":"L5"}"#)));
}
