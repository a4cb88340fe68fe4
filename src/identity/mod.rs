//! Identity Module
//!
//! Player resolution pipeline: username -> UUID -> profile -> texture URLs.

mod resolver;
mod textures;

pub use resolver::{looks_like_uuid, IdentityResolver, ResolverSettings};
pub use textures::{decode_textures, extract_textures};
