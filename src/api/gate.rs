//! Edge Cache Gate
//!
//! Middleware that serves repeated requests straight from the edge cache and,
//! on a miss, finishes the assembled response and stores it.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::handlers::{AppState, Unrouted};
use crate::cache::CachedResponse;
use crate::error::ProxyError;

/// Largest response body buffered for the edge cache (texture images are small).
const MAX_BUFFERED_BODY: usize = 8 * 1024 * 1024;

/// Full request URL used as the edge cache key.
///
/// Absolute request URIs are used as-is; otherwise the URL is rebuilt from the
/// `Host` header. The query string is part of the key, the method is not.
pub fn cache_key(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    format!("http://{host}{path_and_query}")
}

/// Whether a response is one the endpoints assembled on purpose: a success or
/// a texture `404`. Unknown paths, rejected requests and faults are returned
/// untouched.
fn is_assembled(response: &Response) -> bool {
    let status = response.status();
    if status.is_success() {
        return true;
    }
    status == StatusCode::NOT_FOUND && response.extensions().get::<Unrouted>().is_none()
}

/// Edge cache middleware wrapped around the whole router.
pub async fn edge_cache_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = cache_key(&request);

    if let Some(hit) = state.edge.lookup(&key).await {
        debug!(url = %key, "Edge cache hit");
        return hit.into_response();
    }
    debug!(url = %key, "Edge cache miss");

    let origin = request.headers().get(header::ORIGIN).cloned();
    let response = next.run(request).await;

    if !is_assembled(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(body) => body,
        Err(e) => {
            return ProxyError::Internal(format!("failed to buffer response: {e}")).into_response()
        }
    };

    let assembled = CachedResponse {
        status: parts.status,
        headers: state.policy.apply(parts.headers, origin.as_ref()),
        body,
    };

    state.edge.put(&key, assembled.clone()).await;

    assembled.into_response()
}
