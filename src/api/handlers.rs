//! API Handlers
//!
//! Response Assembler: one handler per endpoint, each producing a complete
//! response with its own `Cache-Control`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::api::policy::{public_max_age, HeaderPolicy};
use crate::cache::{DurableCache, EdgeCache};
use crate::config::Config;
use crate::error::Result;
use crate::identity::{IdentityResolver, ResolverSettings};
use crate::models::{TextureKind, UuidResponse};

/// Application state shared across all handlers.
///
/// Both cache tiers are injected; nothing is reached through globals.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IdentityResolver>,
    pub edge: Arc<dyn EdgeCache>,
    pub policy: Arc<HeaderPolicy>,
    /// Lifetime in seconds of skin and cape responses
    pub skin_ttl: u64,
}

impl AppState {
    pub fn new(
        resolver: IdentityResolver,
        edge: Arc<dyn EdgeCache>,
        policy: HeaderPolicy,
        skin_ttl: u64,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            edge,
            policy: Arc::new(policy),
            skin_ttl,
        }
    }

    /// Wires the resolver and header policy from configuration around the
    /// given cache handles.
    pub fn from_config(
        config: &Config,
        durable: Arc<dyn DurableCache>,
        edge: Arc<dyn EdgeCache>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skin_proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let resolver = IdentityResolver::new(client, durable, ResolverSettings::from(config));
        let policy = HeaderPolicy::new(config.origin_whitelist.clone(), config.skin_ttl);

        Ok(Self::new(resolver, edge, policy, config.skin_ttl))
    }
}

/// Marks a response produced for a path no endpoint handles.
///
/// Such responses skip the header policy and the edge cache.
#[derive(Debug, Clone, Copy)]
pub struct Unrouted;

/// Plain `404 Not found`.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Fallback for unknown paths.
pub async fn unrouted_handler() -> Response {
    let mut response = not_found();
    response.extensions_mut().insert(Unrouted);
    response
}

/// First segment after the endpoint prefix, if non-empty.
///
/// Read from the raw request path, so it stays percent-encoded exactly as the
/// client sent it: `/uuid/a%20b` yields `a%20b`.
fn user_segment(path: &str) -> Option<&str> {
    path.split('/').nth(2).filter(|segment| !segment.is_empty())
}

fn json_response<T: serde::Serialize>(body: &T, max_age: u64) -> Response {
    ([(header::CACHE_CONTROL, public_max_age(max_age))], Json(body)).into_response()
}

/// Like [`json_response`] for a body that is already JSON text.
fn raw_json_response(body: String, max_age: u64) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::CACHE_CONTROL, public_max_age(max_age)),
        ],
        body,
    )
        .into_response()
}

/// Handler for `/uuid/{user}`
///
/// Unresolvable users still get a 200, without `id`/`uuid`.
pub async fn uuid_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let Some(user) = user_segment(uri.path()) else {
        return Ok(unrouted_handler().await);
    };

    let uuid = state.resolver.resolve_uuid(user).await?;
    debug!(user, resolved = uuid.is_some(), "UUID request");

    Ok(json_response(
        &UuidResponse::new(user, uuid),
        state.resolver.settings().username_ttl,
    ))
}

/// Handler for `/profile/{user}`
///
/// The upstream profile body is re-served verbatim. Unresolvable users get a
/// 200 with a JSON `null` body.
pub async fn profile_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let Some(user) = user_segment(uri.path()) else {
        return Ok(unrouted_handler().await);
    };

    let profile = state.resolver.resolve_user_profile(user).await?;
    debug!(user, resolved = profile.is_some(), "Profile request");

    let body = match profile {
        Some(profile) => profile.raw().to_string(),
        None => "null".to_string(),
    };

    Ok(raw_json_response(body, state.resolver.settings().profile_ttl))
}

/// Handler for `/skin/{user}`
pub async fn skin_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    texture_response(&state, uri.path(), TextureKind::Skin).await
}

/// Handler for `/cape/{user}`
pub async fn cape_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    texture_response(&state, uri.path(), TextureKind::Cape).await
}

/// Re-serves a texture image with only a `Cache-Control` header.
async fn texture_response(state: &AppState, path: &str, kind: TextureKind) -> Result<Response> {
    let Some(user) = user_segment(path) else {
        return Ok(unrouted_handler().await);
    };

    let textures = state.resolver.resolve_textures(user).await?;
    let Some(url) = textures.url(kind) else {
        debug!(user, ?kind, "No texture");
        return Ok(not_found());
    };

    let image = state.resolver.fetch_texture(url).await?;

    let mut response = Response::new(Body::from(image));
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, public_max_age(state.skin_ttl));
    Ok(response)
}
