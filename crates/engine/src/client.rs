//! Operation client
//!
//! `Client` runs operations against a [`Transport`] and keeps the cache in
//! sync with what the server returns. Callers that drive I/O themselves use
//! [`Client::prepare`] to get the request and [`Client::complete`] to merge
//! the response; completing is valid at any time, also for requests the
//! caller no longer waits on.
//!
//! Results merge in the order they are completed, not the order they were
//! requested.

use crate::cache::{Cache, WriteOptions};
use crate::error::{ClientError, GraphqlError, TransportError};
use boxcache_core::{Operation, OperationKind, PathSegment, ResponsePath, Value, Variables};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a query may be answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Cache if complete, otherwise the server
    #[default]
    CacheFirst,
    /// Always the server; the result is written to the cache
    NetworkOnly,
    /// Only the cache
    CacheOnly,
    /// Always the server; the cache is neither read nor written
    NoCache,
}

/// Which side produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Answered from the cache
    Cache,
    /// Answered by the server
    Network,
}

/// A request ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Client-assigned id, for correlating logs
    pub id: u64,
    /// Operation as the server sees it: client fields removed, type names added
    pub operation: Operation,
    /// Variables sent with the operation
    pub variables: Variables,
}

/// What the server answered
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// Result data, absent when the operation failed as a whole
    pub data: Option<Value>,
    /// Errors reported by the server
    pub errors: Vec<GraphqlError>,
}

impl Response {
    /// Successful response
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Failed response
    pub fn errors(errors: Vec<GraphqlError>) -> Self {
        Self { data: None, errors }
    }

    /// Decode a `{"data": ..., "errors": [...]}` body
    pub fn from_json(body: &Value) -> Result<Self, TransportError> {
        let obj = body
            .as_object()
            .ok_or_else(|| TransportError::Malformed("body is not an object".into()))?;
        let data = obj.get("data").filter(|d| !d.is_null()).cloned();
        let errors = match obj.get("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(decode_error)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(TransportError::Malformed("errors is not a list".into())),
        };
        if data.is_none() && errors.is_empty() {
            return Err(TransportError::Malformed("neither data nor errors".into()));
        }
        Ok(Self { data, errors })
    }
}

fn decode_error(item: &Value) -> Result<GraphqlError, TransportError> {
    let message = item
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| TransportError::Malformed("error without message".into()))?;
    let path = item.get("path").and_then(Value::as_array).map(|segments| {
        ResponsePath::from_segments(
            segments
                .iter()
                .filter_map(|s| match s {
                    Value::String(key) => Some(PathSegment::Field(key.clone())),
                    Value::Number(n) => n.as_u64().map(|i| PathSegment::Index(i as usize)),
                    _ => None,
                })
                .collect(),
        )
    });
    Ok(GraphqlError {
        message: message.to_string(),
        path,
    })
}

/// Sends requests to a server
pub trait Transport: Send + Sync {
    /// Execute one request
    fn execute(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync,
{
    fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        self(request)
    }
}

/// Outcome of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    /// Result data, if any was produced
    pub data: Option<Value>,
    /// Why no data was produced
    pub error: Option<ClientError>,
    /// Which side answered
    pub source: ResultSource,
}

impl OperationResult {
    fn ok(data: Value, source: ResultSource) -> Self {
        Self {
            data: Some(data),
            error: None,
            source,
        }
    }

    fn failed(error: ClientError, source: ResultSource) -> Self {
        Self {
            data: None,
            error: Some(error),
            source,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<Value, ClientError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ClientError::Graphql(Vec::new())),
        }
    }
}

/// Runs operations through the cache and a transport
pub struct Client<T> {
    cache: Arc<Cache>,
    transport: T,
    next_request: AtomicU64,
}

impl<T: Transport> Client<T> {
    /// Create a client over a shared cache
    pub fn new(cache: Arc<Cache>, transport: T) -> Self {
        Self {
            cache,
            transport,
            next_request: AtomicU64::new(1),
        }
    }

    /// The cache results are written to
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Run a query
    pub fn query(&self, op: &Operation, variables: &Variables, policy: FetchPolicy) -> OperationResult {
        match policy {
            FetchPolicy::CacheOnly => match self.cache.read_query(op, variables) {
                Ok(data) => OperationResult::ok(data, ResultSource::Cache),
                Err(e) => OperationResult::failed(e.into(), ResultSource::Cache),
            },
            FetchPolicy::CacheFirst => match self.cache.read_query(op, variables) {
                Ok(data) => OperationResult::ok(data, ResultSource::Cache),
                Err(e) if e.is_miss() => {
                    debug!(target: "boxcache::client", operation = op.name(), reason = %e, "cache miss");
                    self.fetch(op, variables, true)
                }
                Err(e) => OperationResult::failed(e.into(), ResultSource::Cache),
            },
            FetchPolicy::NetworkOnly => self.fetch(op, variables, true),
            FetchPolicy::NoCache => self.fetch(op, variables, false),
        }
    }

    /// Run a mutation and write its result
    pub fn mutate(&self, op: &Operation, variables: &Variables) -> OperationResult {
        if op.kind() != OperationKind::Mutation {
            warn!(target: "boxcache::client", operation = op.name(), "mutate called with a query");
        }
        self.fetch(op, variables, true)
    }

    /// Build the request for an operation without sending it
    pub fn prepare(&self, op: &Operation, variables: &Variables) -> Request {
        Request {
            id: self.next_request.fetch_add(1, Ordering::Relaxed),
            operation: self.server_operation(op),
            variables: variables.clone(),
        }
    }

    fn server_operation(&self, op: &Operation) -> Operation {
        let operation = op.without_client_fields();
        if self.cache.config().add_typename {
            operation.with_typenames()
        } else {
            operation
        }
    }

    /// Merge a response obtained for `op` and build its result
    pub fn complete(&self, op: &Operation, variables: &Variables, response: Response) -> OperationResult {
        self.finish(op, variables, response, true)
    }

    fn fetch(&self, op: &Operation, variables: &Variables, write: bool) -> OperationResult {
        let request = self.prepare(op, variables);
        debug!(target: "boxcache::client", request = request.id, operation = op.name(), "sending request");
        match self.transport.execute(&request) {
            Ok(response) => self.finish(op, variables, response, write),
            Err(e) => {
                warn!(target: "boxcache::client", request = request.id, error = %e, "request failed");
                OperationResult::failed(e.into(), ResultSource::Network)
            }
        }
    }

    fn finish(&self, op: &Operation, variables: &Variables, response: Response, write: bool) -> OperationResult {
        if !response.errors.is_empty() {
            warn!(
                target: "boxcache::client",
                operation = op.name(),
                errors = response.errors.len(),
                "server reported errors, result not cached"
            );
            return OperationResult::failed(ClientError::Graphql(response.errors), ResultSource::Network);
        }
        let Some(data) = response.data else {
            return OperationResult::failed(
                TransportError::Malformed("response has no data".into()).into(),
                ResultSource::Network,
            );
        };
        if !write {
            return OperationResult::ok(data, ResultSource::Network);
        }

        let server_op = self.server_operation(op);
        self.cache
            .write_query(&server_op, variables, &data, WriteOptions::default());

        if op.kind() == OperationKind::Mutation {
            return OperationResult::ok(data, ResultSource::Network);
        }
        // Read back so merged fields (paginated lists) come out whole.
        match self.cache.read_query(op, variables) {
            Ok(merged) => OperationResult::ok(merged, ResultSource::Network),
            Err(e) => {
                debug!(target: "boxcache::client", operation = op.name(), reason = %e, "read-back incomplete, returning response data");
                OperationResult::ok(data, ResultSource::Network)
            }
        }
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("cache", &self.cache)
            .field("next_request", &self.next_request.load(Ordering::Relaxed))
            .finish()
    }
}
