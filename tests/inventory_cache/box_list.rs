//! Paginated box lists

use crate::test_utils::*;
use boxcache::{ArgValue, Field, Operation, Variables, WriteOptions};
use serde_json::json;

#[test]
fn container_pages_accumulate_and_update_in_place() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L100", "L101"], 50),
        WriteOptions::default(),
    );
    cache.write_query(
        &boxes_query(),
        &base_vars("5", Some("L101")),
        &boxes_page(&["L102", "L103"], 50),
        WriteOptions::default(),
    );

    let data = cache.read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    assert_eq!(labels(&data), vec!["L100", "L101", "L102", "L103"]);
    assert_eq!(data["boxes"]["totalCount"], json!(50));

    let mutation = Operation::mutation("UpdateState").select(
        Field::new("updateBox")
            .arg("labelIdentifier", ArgValue::literal("L101"))
            .arg("state", ArgValue::literal("Lost"))
            .select([Field::new("labelIdentifier"), Field::new("state")]),
    );
    cache.write_query(
        &mutation,
        &Variables::new(),
        &json!({"updateBox": {"__typename": "Box", "labelIdentifier": "L101", "state": "Lost"}}),
        WriteOptions::default(),
    );

    let data = cache.read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    assert_eq!(labels(&data), vec!["L100", "L101", "L102", "L103"]);
    assert_eq!(data["boxes"]["elements"][1]["state"], json!("Lost"));
    // fields the mutation did not select are kept
    assert_eq!(data["boxes"]["elements"][1]["numberOfItems"], json!(1));
}

#[test]
fn scopes_differ_only_by_base() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &boxes_query(),
        &base_vars("1", None),
        &boxes_page(&["A1"], 1),
        WriteOptions::default(),
    );
    let mut filtered = base_vars("1", Some("A1"));
    filtered.insert("filterInput".into(), json!({"productIds": ["p1"]}));
    cache.write_query(
        &boxes_query(),
        &filtered,
        &boxes_page(&["A2"], 2),
        WriteOptions::default(),
    );
    cache.write_query(
        &boxes_query(),
        &base_vars("2", None),
        &boxes_page(&["B1"], 1),
        WriteOptions::default(),
    );

    let base1 = cache.read_query(&boxes_query(), &base_vars("1", None)).unwrap();
    let base2 = cache.read_query(&boxes_query(), &base_vars("2", None)).unwrap();
    assert_eq!(labels(&base1), vec!["A1", "A2"]);
    assert_eq!(labels(&base2), vec!["B1"]);
}

#[test]
fn box_lookup_is_served_from_the_list() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L100", "L101"], 2),
        WriteOptions::default(),
    );

    let data = cache.read_query(&box_query(), &label_vars("L101")).unwrap();
    assert_eq!(data["box"]["labelIdentifier"], json!("L101"));
    assert_eq!(data["box"]["product"]["name"], json!("Jackets"));
    assert!(cache.read_query(&box_query(), &label_vars("L999")).is_err());
}

#[test]
fn overwrite_starts_the_list_over() {
    let session = session();
    let cache = session.cache();
    cache.write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L1", "L2"], 2),
        WriteOptions::default(),
    );
    cache.write_query(
        &boxes_query(),
        &base_vars("5", None),
        &boxes_page(&["L2"], 1),
        WriteOptions::new().overwrite(true),
    );
    let data = cache.read_query(&boxes_query(), &base_vars("5", None)).unwrap();
    assert_eq!(labels(&data), vec!["L2"]);
    assert_eq!(data["boxes"]["totalCount"], json!(1));
}
