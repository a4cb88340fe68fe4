//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

/// Body of `/uuid/{user}`.
///
/// `id` and `uuid` are omitted when the username could not be resolved;
/// the response is still a 200.
#[derive(Debug, Clone, Serialize)]
pub struct UuidResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// The requested user, echoed
    pub user: String,
    /// The requested user, echoed
    pub name: String,
}

impl UuidResponse {
    pub fn new(user: impl Into<String>, uuid: Option<String>) -> Self {
        let user = user.into();
        Self {
            id: uuid.clone(),
            uuid,
            name: user.clone(),
            user,
        }
    }
}

/// Error response body for aborted requests
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
