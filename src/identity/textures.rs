//! Texture Extractor
//!
//! Decodes the base64 `textures` property of a profile into skin/cape URLs.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::error::{ProxyError, Result};
use crate::models::{Profile, ProfileProperty, Textures, TexturesPayload};

/// Reads the texture URLs out of a profile's first property.
///
/// A profile without properties has no textures. A first property without a
/// string `value`, or whose value is not valid base64 JSON, aborts the request.
pub fn extract_textures(profile: &Profile) -> Result<Textures> {
    let Some(first) = profile.first_property() else {
        return Ok(Textures::default());
    };

    let property = ProfileProperty::deserialize(first)
        .map_err(|e| ProxyError::MalformedTextures(format!("invalid property: {e}")))?;

    decode_textures(&property.value)
}

/// Decodes a base64-encoded [`TexturesPayload`].
pub fn decode_textures(encoded: &str) -> Result<Textures> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ProxyError::MalformedTextures(format!("invalid base64: {e}")))?;

    let payload: TexturesPayload = serde_json::from_slice(&bytes)
        .map_err(|e| ProxyError::MalformedTextures(format!("invalid JSON: {e}")))?;

    Ok(payload.textures.into())
}
