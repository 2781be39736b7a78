use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{OriginalUri, Path, State},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use autowire::{BoundEndpoint, EndpointRegistry};

use crate::problem::Problem;

#[derive(Debug, Serialize)]
pub(crate) struct EndpointInfo {
    pub path: String,
    pub operations: Vec<&'static str>,
}

impl From<&BoundEndpoint> for EndpointInfo {
    fn from(ep: &BoundEndpoint) -> Self {
        Self {
            path: ep.path.to_string(),
            operations: ep.operations().to_vec(),
        }
    }
}

pub(crate) fn build(registry: Arc<EndpointRegistry>, root: &str) -> Router {
    let api = Router::new()
        .route("/", get(list_endpoints))
        .route("/{*rest}", get(describe_endpoint).post(invoke_operation))
        .with_state(registry);

    let app = if root.is_empty() {
        api
    } else {
        Router::new().nest(root, api)
    };
    app.layer(TraceLayer::new_for_http())
}

/// Split `{endpoint}/{op}` at the last slash; a bare `{op}` addresses `/`.
fn split_call(rest: &str) -> (String, &str) {
    match rest.rsplit_once('/') {
        Some((endpoint, op)) => (format!("/{endpoint}"), op),
        None => ("/".to_owned(), rest),
    }
}

async fn list_endpoints(State(registry): State<Arc<EndpointRegistry>>) -> Json<Vec<EndpointInfo>> {
    Json(registry.endpoints().iter().map(EndpointInfo::from).collect())
}

async fn describe_endpoint(
    State(registry): State<Arc<EndpointRegistry>>,
    Path(rest): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<EndpointInfo>, Problem> {
    let path = format!("/{rest}");
    registry
        .get(&path)
        .map(|ep| Json(EndpointInfo::from(&ep)))
        .ok_or_else(|| Problem::endpoint_not_found(&path).with_instance(uri.path()))
}

async fn invoke_operation(
    State(registry): State<Arc<EndpointRegistry>>,
    Path(rest): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<Json<Value>, Problem> {
    let (path, operation) = split_call(&rest);

    let endpoint = registry
        .get(&path)
        .ok_or_else(|| Problem::endpoint_not_found(&path).with_instance(uri.path()))?;

    if !endpoint.service.supports(operation) {
        let fault = autowire::ServiceFault::UnknownOperation(operation.to_owned());
        return Err(Problem::from(fault).with_instance(uri.path()));
    }

    let input = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| Problem::invalid_payload(e.to_string()).with_instance(uri.path()))?
    };

    tracing::debug!(path = %path, operation, "dispatching call");

    endpoint
        .service
        .invoke(operation, input)
        .await
        .map(Json)
        .map_err(|fault| {
            tracing::warn!(path = %path, operation, error = %fault, "call failed");
            Problem::from(fault).with_instance(uri.path())
        })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn split_call_uses_last_segment_as_operation() {
        assert_eq!(split_call("Foo/echo"), ("/Foo".to_owned(), "echo"));
        assert_eq!(split_call("a/b/op"), ("/a/b".to_owned(), "op"));
        assert_eq!(split_call("echo"), ("/".to_owned(), "echo"));
        assert_eq!(split_call("Foo/"), ("/Foo".to_owned(), ""));
    }
}
