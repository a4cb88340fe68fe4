//! Player profile models
//!
//! Shapes of the upstream profile document and the base64 textures blob
//! carried inside its first property.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Player profile exactly as the session server sent it.
///
/// The raw body is what gets cached and re-served; only the first property
/// is ever given a typed view, by the texture extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    raw: String,
    document: Value,
}

impl Profile {
    /// Parses an upstream body, keeping the original text.
    pub fn parse(raw: impl Into<String>) -> serde_json::Result<Self> {
        let raw = raw.into();
        let document = serde_json::from_str(&raw)?;
        Ok(Self { raw, document })
    }

    /// The body as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// First entry of `properties`; a missing, null or empty list has none.
    pub fn first_property(&self) -> Option<&Value> {
        self.document
            .get("properties")
            .and_then(Value::as_array)
            .and_then(|properties| properties.first())
    }
}

/// A signed profile property; `textures` is the only one in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileProperty {
    #[serde(default)]
    pub name: String,
    /// Base64-encoded JSON payload
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Decoded contents of a `textures` property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    pub textures: TextureSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureSet {
    #[serde(rename = "SKIN", default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<TextureRef>,
    #[serde(rename = "CAPE", default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<TextureRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

// == Textures ==
/// Texture URLs of a player; both keys are always serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Textures {
    pub skin: Option<String>,
    pub cape: Option<String>,
}

/// Which texture an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Skin,
    Cape,
}

impl Textures {
    pub fn url(&self, kind: TextureKind) -> Option<&str> {
        match kind {
            TextureKind::Skin => self.skin.as_deref(),
            TextureKind::Cape => self.cape.as_deref(),
        }
    }
}

impl From<TextureSet> for Textures {
    fn from(set: TextureSet) -> Self {
        Self {
            skin: set.skin.map(|t| t.url),
            cape: set.cape.map(|t| t.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_keeps_raw_body() {
        let raw = r#"{"name":"Notch","id":"069a79f444e94726a5befca90e38aeec","properties":null,"profileActions":[]}"#;

        let profile = Profile::parse(raw).unwrap();
        assert_eq!(profile.raw(), raw);
        assert_eq!(profile.id(), Some("069a79f444e94726a5befca90e38aeec"));
        assert_eq!(profile.name(), Some("Notch"));
        assert!(profile.first_property().is_none());
        assert_eq!(profile.document()["profileActions"], json!([]));
    }

    #[test]
    fn test_profile_without_name_or_properties() {
        let profile = Profile::parse(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(profile.name(), None);
        assert!(profile.first_property().is_none());
    }

    #[test]
    fn test_first_property() {
        let profile =
            Profile::parse(r#"{"id":"abc","properties":[{"name":"textures","value":"e30="}]}"#)
                .unwrap();
        let property: ProfileProperty =
            serde_json::from_value(profile.first_property().unwrap().clone()).unwrap();
        assert_eq!(property.value, "e30=");
        assert!(property.signature.is_none());
    }

    #[test]
    fn test_profile_rejects_invalid_json() {
        assert!(Profile::parse("{not json").is_err());
    }

    #[test]
    fn test_textures_serialize_both_keys() {
        let json = serde_json::to_value(Textures::default()).unwrap();
        assert_eq!(json, json!({"skin": null, "cape": null}));
    }

    #[test]
    fn test_texture_set_optional_entries() {
        let payload: TexturesPayload = serde_json::from_value(json!({
            "timestamp": 1,
            "profileId": "abc",
            "profileName": "Steve",
            "textures": {"SKIN": {"url": "http://textures.example/skin"}}
        }))
        .unwrap();

        let textures = Textures::from(payload.textures);
        assert_eq!(textures.url(TextureKind::Skin), Some("http://textures.example/skin"));
        assert_eq!(textures.url(TextureKind::Cape), None);
    }
}
