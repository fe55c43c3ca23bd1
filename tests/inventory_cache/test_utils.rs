//! Shared fixtures for the inventory cache tests

use boxcache::{ArgValue, Field, Operation, Session, Value, Variables};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Session with logging routed to the test writer
pub fn session() -> Session {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Session::default()
}

pub fn box_fields() -> Vec<Field> {
    vec![
        Field::new("labelIdentifier"),
        Field::new("state"),
        Field::new("numberOfItems"),
        Field::new("product").select([Field::new("id"), Field::new("name")]),
    ]
}

/// `boxes(baseId, paginationInput, filterInput)` with one page of elements
pub fn boxes_query() -> Operation {
    Operation::query("BoxesForBase").select(
        Field::new("boxes")
            .arg("baseId", ArgValue::var("baseId"))
            .arg("paginationInput", ArgValue::var("paginationInput"))
            .arg("filterInput", ArgValue::var("filterInput"))
            .select([
                Field::new("totalCount"),
                Field::new("elements").select(box_fields()),
            ]),
    )
}

/// `box(labelIdentifier)` lookup
pub fn box_query() -> Operation {
    Operation::query("BoxByLabel").select(
        Field::new("box")
            .arg("labelIdentifier", ArgValue::var("labelIdentifier"))
            .select(box_fields()),
    )
}

pub fn base_vars(base: &str, after: Option<&str>) -> Variables {
    let mut vars = Variables::new();
    vars.insert("baseId".into(), json!(base));
    match after {
        Some(cursor) => vars.insert("paginationInput".into(), json!({"first": 2, "after": cursor})),
        None => vars.insert("paginationInput".into(), json!({"first": 2})),
    };
    vars
}

pub fn label_vars(label: &str) -> Variables {
    let mut vars = Variables::new();
    vars.insert("labelIdentifier".into(), json!(label));
    vars
}

pub fn a_box(label: &str, items: u32) -> Value {
    json!({
        "__typename": "Box",
        "labelIdentifier": label,
        "state": "InStock",
        "numberOfItems": items,
        "product": {"__typename": "Product", "id": "p1", "name": "Jackets"},
    })
}

pub fn boxes_page(labels: &[&str], total: u32) -> Value {
    json!({"boxes": {
        "__typename": "BoxPage",
        "totalCount": total,
        "elements": labels.iter().map(|l| a_box(l, 1)).collect::<Vec<_>>(),
    }})
}

pub fn labels(data: &Value) -> Vec<String> {
    data["boxes"]["elements"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|b| b["labelIdentifier"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
