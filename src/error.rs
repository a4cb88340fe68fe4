//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Faults that abort a single request.
///
/// Lookups that find nothing are not errors; they surface as `None`.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Network-level failure talking to an upstream service
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream answered with a success status but an unparseable body
    #[error("Invalid upstream body: {0}")]
    UpstreamBody(String),

    /// Profile texture property could not be decoded
    #[error("Malformed textures payload: {0}")]
    MalformedTextures(String),

    /// A cache store rejected a write
    #[error("Cache error: {0}")]
    Cache(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Request aborted");

        let body = Json(ErrorResponse::new(self.to_string()));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
