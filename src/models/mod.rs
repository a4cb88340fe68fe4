//! Data models for the proxy
//!
//! Upstream profile documents and the JSON bodies the proxy emits.

pub mod profile;
pub mod responses;

// Re-export commonly used types
pub use profile::{
    Profile, ProfileProperty, TextureKind, TextureRef, TextureSet, Textures, TexturesPayload,
};
pub use responses::{ErrorResponse, UuidResponse};
