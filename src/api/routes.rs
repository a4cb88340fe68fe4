//! API Routes
//!
//! Path dispatch for the four endpoints, wrapped by the edge cache gate.

use axum::{middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

use super::gate::edge_cache_gate;
use super::handlers::{
    cape_handler, profile_handler, skin_handler, unrouted_handler, uuid_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `/uuid/{user}` - Resolved UUID as JSON
/// - `/profile/{user}` - Profile JSON
/// - `/skin/{user}` - Skin image bytes
/// - `/cape/{user}` - Cape image bytes
///
/// Every method is accepted; anything else is a plain 404.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/uuid/*user", any(uuid_handler))
        .route("/profile/*user", any(profile_handler))
        .route("/skin/*user", any(skin_handler))
        .route("/cape/*user", any(cape_handler))
        .fallback(unrouted_handler)
        .layer(middleware::from_fn_with_state(state.clone(), edge_cache_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
