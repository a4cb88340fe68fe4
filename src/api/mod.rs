//! API Module
//!
//! HTTP surface of the proxy: endpoint handlers, header policy and the
//! edge cache gate.
//!
//! # Endpoints
//! - `/uuid/{user}` - Resolve a username to a UUID
//! - `/profile/{user}` - Full player profile
//! - `/skin/{user}` - Skin image
//! - `/cape/{user}` - Cape image

pub mod gate;
pub mod handlers;
pub mod policy;
pub mod routes;

pub use handlers::{AppState, Unrouted};
pub use policy::HeaderPolicy;
pub use routes::create_router;
