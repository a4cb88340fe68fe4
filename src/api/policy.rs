//! Response header policy
//!
//! CORS, `Vary` and default `Cache-Control` applied to every assembled
//! response before it is handed to the edge cache.

use axum::http::{header, HeaderMap, HeaderValue};

/// Builds a `public, max-age=<seconds>` value.
pub fn public_max_age(seconds: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={seconds}"))
        .unwrap_or_else(|_| HeaderValue::from_static("public"))
}

/// Cross-cutting header rules shared by all endpoints.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    /// Allowed origins; empty allows every origin
    origin_whitelist: Vec<String>,
    /// `max-age` used when a handler set no `Cache-Control`
    default_max_age: u64,
}

impl HeaderPolicy {
    pub fn new(origin_whitelist: Vec<String>, default_max_age: u64) -> Self {
        Self {
            origin_whitelist,
            default_max_age,
        }
    }

    /// Whether `origin` may be echoed back in `Access-Control-Allow-Origin`.
    pub fn allows(&self, origin: &str) -> bool {
        self.origin_whitelist.is_empty() || self.origin_whitelist.iter().any(|o| o == origin)
    }

    /// Returns `headers` with the policy applied for a request from `origin`.
    ///
    /// `Vary: Origin` is appended next to any existing `Vary` values, and
    /// `Cache-Control` is only filled in when absent.
    pub fn apply(&self, mut headers: HeaderMap, origin: Option<&HeaderValue>) -> HeaderMap {
        if let Some(origin) = origin {
            if origin.to_str().map(|o| self.allows(o)).unwrap_or(false) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            }
        }

        headers.append(header::VARY, HeaderValue::from_static("Origin"));

        if !headers.contains_key(header::CACHE_CONTROL) {
            headers.insert(header::CACHE_CONTROL, public_max_age(self.default_max_age));
        }

        headers
    }
}
