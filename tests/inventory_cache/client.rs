//! Client fetch policies and request lifecycle

use crate::test_utils::*;
use boxcache::{
    Client, ClientError, FetchPolicy, GraphqlError, Request, Response, ResultSource,
    TransportError, Value,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

/// Server stub answering box list pages from a fixed catalog
fn catalog_server(
    requests: Arc<Mutex<Vec<Request>>>,
) -> impl Fn(&Request) -> Result<Response, TransportError> + Send + Sync {
    move |request: &Request| {
        requests.lock().push(request.clone());
        let after = request.variables["paginationInput"]
            .get("after")
            .and_then(Value::as_str)
            .map(str::to_string);
        let page = match after.as_deref() {
            None => boxes_page(&["L100", "L101"], 4),
            Some("L101") => boxes_page(&["L102", "L103"], 4),
            Some(other) => {
                return Ok(Response::errors(vec![GraphqlError::new(format!(
                    "unknown cursor {}",
                    other
                ))]))
            }
        };
        Ok(Response::data(page))
    }
}

#[test]
fn network_only_returns_the_merged_list() {
    let session = session();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let client = Client::new(Arc::clone(session.cache()), catalog_server(Arc::clone(&requests)));

    let first = client.query(&boxes_query(), &base_vars("5", None), FetchPolicy::NetworkOnly);
    assert_eq!(labels(first.data.as_ref().unwrap()), vec!["L100", "L101"]);

    let more = client.query(
        &boxes_query(),
        &base_vars("5", Some("L101")),
        FetchPolicy::NetworkOnly,
    );
    assert_eq!(more.source, ResultSource::Network);
    assert_eq!(
        labels(more.data.as_ref().unwrap()),
        vec!["L100", "L101", "L102", "L103"]
    );
    assert_eq!(requests.lock().len(), 2);
}

#[test]
fn cache_first_answers_from_cache_after_fetch() {
    let session = session();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let client = Client::new(Arc::clone(session.cache()), catalog_server(Arc::clone(&requests)));

    client.query(&boxes_query(), &base_vars("5", None), FetchPolicy::CacheFirst);
    let again = client.query(&boxes_query(), &base_vars("5", None), FetchPolicy::CacheFirst);
    assert_eq!(again.source, ResultSource::Cache);
    assert_eq!(requests.lock().len(), 1);

    let sent = &requests.lock()[0];
    let boxes = &sent.operation.selection().fields()[0];
    assert!(boxes.selection().unwrap().selects_typename());
}

#[test]
fn server_errors_leave_the_cache_alone() {
    let session = session();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let client = Client::new(Arc::clone(session.cache()), catalog_server(requests));

    let result = client.query(
        &boxes_query(),
        &base_vars("5", Some("nope")),
        FetchPolicy::NetworkOnly,
    );
    match result.error {
        Some(ClientError::Graphql(errors)) => {
            assert_eq!(errors[0].message, "unknown cursor nope")
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(session
        .cache()
        .read_query(&boxes_query(), &base_vars("5", None))
        .is_err());
}

#[test]
fn transport_failure_is_a_network_error() {
    let session = session();
    let client = Client::new(Arc::clone(session.cache()), |_: &Request| -> Result<Response, TransportError> {
        Err(TransportError::Connection("offline".into()))
    });
    let result = client.query(&box_query(), &label_vars("L1"), FetchPolicy::CacheFirst);
    assert!(result.error.unwrap().is_network());
}

#[test]
fn responses_merge_in_completion_order() {
    let session = session();
    let client = Client::new(Arc::clone(session.cache()), |_: &Request| -> Result<Response, TransportError> {
        Err(TransportError::Timeout)
    });

    let page_one = base_vars("5", None);
    let page_two = base_vars("5", Some("L101"));
    let _first = client.prepare(&boxes_query(), &page_one);
    let _second = client.prepare(&boxes_query(), &page_two);

    // second page answers first; the first request was abandoned but still completes
    client.complete(&boxes_query(), &page_two, Response::data(boxes_page(&["L102", "L103"], 4)));
    let done = client.complete(&boxes_query(), &page_one, Response::data(boxes_page(&["L100", "L101"], 4)));

    assert_eq!(
        labels(done.data.as_ref().unwrap()),
        vec!["L102", "L103", "L100", "L101"]
    );
}

#[test]
fn mutation_result_updates_listed_box() {
    let session = session();
    let client = Client::new(Arc::clone(session.cache()), |request: &Request| -> Result<Response, TransportError> {
        if request.operation.name() == "BoxesForBase" {
            Ok(Response::data(boxes_page(&["L100", "L101"], 2)))
        } else {
            Ok(Response::data(json!({"updateBox": {
                "__typename": "Box", "labelIdentifier": "L100", "numberOfItems": 40
            }})))
        }
    });
    client.query(&boxes_query(), &base_vars("5", None), FetchPolicy::NetworkOnly);

    let mutation = boxcache::Operation::mutation("UpdateNumberOfItems").select(
        boxcache::Field::new("updateBox")
            .arg("labelIdentifier", boxcache::ArgValue::literal("L100"))
            .select([boxcache::Field::new("labelIdentifier"), boxcache::Field::new("numberOfItems")]),
    );
    let result = client.mutate(&mutation, &boxcache::Variables::new());
    assert!(result.error.is_none());

    let list = client.query(&boxes_query(), &base_vars("5", None), FetchPolicy::CacheOnly);
    let data = list.data.unwrap();
    assert_eq!(labels(&data), vec!["L100", "L101"]);
    assert_eq!(data["boxes"]["elements"][0]["numberOfItems"], json!(40));
}
