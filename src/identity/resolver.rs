//! Identity Resolver
//!
//! Username -> UUID and UUID -> profile lookups against the upstream
//! services, each fronted by the durable cache.

use std::borrow::Cow;
use std::sync::Arc;

use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::cache::{DurableCache, PROFILE_NAMESPACE, USERNAME_NAMESPACE};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{Profile, Textures};

use super::textures::extract_textures;

/// Upstream endpoints and per-kind cache lifetimes.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub mojang_api_url: String,
    pub session_server_url: String,
    pub username_ttl: u64,
    pub profile_ttl: u64,
}

impl From<&Config> for ResolverSettings {
    fn from(config: &Config) -> Self {
        Self {
            mojang_api_url: config.mojang_api_url.clone(),
            session_server_url: config.session_server_url.clone(),
            username_ttl: config.username_ttl,
            profile_ttl: config.profile_ttl,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsernameLookup {
    id: String,
}

/// Resolves players through the durable cache, falling back to upstream.
///
/// Concurrent misses for the same key each go upstream; nothing is
/// coalesced or retried.
pub struct IdentityResolver {
    client: Client,
    cache: Arc<dyn DurableCache>,
    settings: ResolverSettings,
}

/// Heuristic: 32 (undashed) or 36 (dashed) UTF-16 code units is treated as
/// a UUID. Nothing else about the input is checked.
pub fn looks_like_uuid(input: &str) -> bool {
    matches!(input.encode_utf16().count(), 32 | 36)
}

/// Places a user segment into an upstream URL path.
///
/// Segments taken from a request path are already percent-encoded and go
/// through as-is. Anything holding characters that are not valid in a path
/// segment is encoded.
fn upstream_segment(input: &str) -> Cow<'_, str> {
    let is_path_safe = |c: char| {
        c.is_ascii_alphanumeric() || "-._~%!$&'()*+,;=:@".contains(c)
    };

    if input.chars().all(is_path_safe) {
        Cow::Borrowed(input)
    } else {
        urlencoding::encode(input)
    }
}

impl IdentityResolver {
    pub fn new(client: Client, cache: Arc<dyn DurableCache>, settings: ResolverSettings) -> Self {
        Self {
            client,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    // == Resolve UUID ==
    /// Resolves a username to a UUID.
    ///
    /// Inputs that look like a UUID are returned unchanged without any lookup.
    /// `Ok(None)` means upstream has no such player.
    pub async fn resolve_uuid(&self, user: &str) -> Result<Option<String>> {
        if looks_like_uuid(user) {
            return Ok(Some(user.to_string()));
        }

        let key = format!("{USERNAME_NAMESPACE}{user}");
        if let Some(uuid) = self.cache.get(&key).await? {
            return Ok(Some(uuid));
        }

        let url = format!(
            "{}/users/profiles/minecraft/{}",
            self.settings.mojang_api_url,
            upstream_segment(user)
        );
        let Some(response) = self.lookup(&url).await? else {
            return Ok(None);
        };

        let UsernameLookup { id } = response.json().await?;
        debug!(user, uuid = %id, "Resolved username upstream");

        self.cache
            .put(&key, id.clone(), self.settings.username_ttl)
            .await?;

        Ok(Some(id))
    }

    // == Resolve Profile ==
    /// Fetches the profile of a UUID. `Ok(None)` means upstream has none.
    ///
    /// The upstream body is cached and returned verbatim; any JSON document
    /// is accepted.
    pub async fn resolve_profile(&self, uuid: &str) -> Result<Option<Profile>> {
        let key = format!("{PROFILE_NAMESPACE}{uuid}");
        if let Some(cached) = self.cache.get(&key).await? {
            let profile = Profile::parse(cached).map_err(|e| {
                ProxyError::Internal(format!("corrupt cached profile {key}: {e}"))
            })?;
            return Ok(Some(profile));
        }

        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.settings.session_server_url,
            upstream_segment(uuid)
        );
        let Some(response) = self.lookup(&url).await? else {
            return Ok(None);
        };

        let profile = Profile::parse(response.text().await?)
            .map_err(|e| ProxyError::UpstreamBody(format!("profile {uuid}: {e}")))?;

        self.cache
            .put(&key, profile.raw().to_string(), self.settings.profile_ttl)
            .await?;

        Ok(Some(profile))
    }

    /// Resolves a user's profile, looking the username up first when needed.
    pub async fn resolve_user_profile(&self, user: &str) -> Result<Option<Profile>> {
        match self.resolve_uuid(user).await? {
            Some(uuid) => self.resolve_profile(&uuid).await,
            None => Ok(None),
        }
    }

    /// Texture URLs of a user; an unknown user has none.
    pub async fn resolve_textures(&self, user: &str) -> Result<Textures> {
        match self.resolve_user_profile(user).await? {
            Some(profile) => extract_textures(&profile),
            None => Ok(Textures::default()),
        }
    }

    // == Fetch Texture ==
    /// Downloads texture image bytes. Any non-success status is a fault.
    pub async fn fetch_texture(&self, url: &str) -> Result<Bytes> {
        debug!(url, "Fetching texture image");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }

    /// Performs an upstream lookup, mapping "no such player" statuses to `None`.
    async fn lookup(&self, url: &str) -> Result<Option<reqwest::Response>> {
        debug!(url, "Upstream lookup");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() || status == StatusCode::NO_CONTENT {
            debug!(url, %status, "Upstream has no record");
            return Ok(None);
        }

        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryDurableCache;
    use base64::{engine::general_purpose, Engine as _};
    use proptest::prelude::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NOTCH_UUID: &str = "069a79f444e94726a5befca90e38aeec";

    fn resolver_for(server_uri: &str, cache: MemoryDurableCache) -> IdentityResolver {
        IdentityResolver::new(
            Client::new(),
            Arc::new(cache),
            ResolverSettings {
                mojang_api_url: server_uri.to_string(),
                session_server_url: server_uri.to_string(),
                username_ttl: 60,
                profile_ttl: 30,
            },
        )
    }

    fn notch_profile(skin_url: &str) -> serde_json::Value {
        let textures = json!({
            "profileId": NOTCH_UUID,
            "profileName": "Notch",
            "textures": {"SKIN": {"url": skin_url}}
        });
        json!({
            "id": NOTCH_UUID,
            "name": "Notch",
            "properties": [{
                "name": "textures",
                "value": general_purpose::STANDARD.encode(textures.to_string())
            }]
        })
    }

    #[test]
    fn test_looks_like_uuid() {
        assert!(looks_like_uuid(NOTCH_UUID));
        assert!(looks_like_uuid("069a79f4-44e9-4726-a5be-fca90e38aeec"));
        assert!(!looks_like_uuid("Notch"));
        assert!(!looks_like_uuid(""));
        // Counted in UTF-16 units: 16 astral characters are 32 units.
        assert!(looks_like_uuid(&"\u{1F600}".repeat(16)));
        assert!(!looks_like_uuid(&"é".repeat(16)));
    }

    #[test]
    fn test_upstream_segment() {
        assert_eq!(upstream_segment("Notch"), "Notch");
        assert_eq!(upstream_segment("a%20b"), "a%20b");
        assert_eq!(upstream_segment("%FF"), "%FF");
        assert_eq!(upstream_segment("a b"), "a%20b");
        assert_eq!(upstream_segment("a/b?c"), "a%2Fb%3Fc");
    }

    #[tokio::test]
    async fn test_username_lookup_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/Notch"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": NOTCH_UUID, "name": "Notch"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cache = MemoryDurableCache::new(100);
        let resolver = resolver_for(&server.uri(), cache.clone());

        assert_eq!(resolver.resolve_uuid("Notch").await.unwrap().as_deref(), Some(NOTCH_UUID));
        assert_eq!(resolver.resolve_uuid("Notch").await.unwrap().as_deref(), Some(NOTCH_UUID));

        let store = cache.store();
        let ttl = store.read().await.ttl_remaining("username:Notch").unwrap();
        assert!(ttl <= 60 && ttl >= 59);
    }

    #[tokio::test]
    async fn test_uuid_input_skips_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri(), MemoryDurableCache::new(10));
        let dashed = "069a79f4-44e9-4726-a5be-fca90e38aeec";

        assert_eq!(resolver.resolve_uuid(dashed).await.unwrap().as_deref(), Some(dashed));
    }

    #[tokio::test]
    async fn test_unknown_username_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/nobody"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let cache = MemoryDurableCache::new(10);
        let resolver = resolver_for(&server.uri(), cache.clone());

        assert!(resolver.resolve_uuid("nobody").await.unwrap().is_none());
        assert!(resolver.resolve_uuid("missing").await.unwrap().is_none());
        assert!(cache.store().read().await.is_empty(), "Misses must not be cached");
    }

    #[tokio::test]
    async fn test_profile_lookup_is_cached() {
        let server = MockServer::start().await;
        let body = notch_profile("http://textures.example/skin");
        Mock::given(method("GET"))
            .and(path(format!("/session/minecraft/profile/{NOTCH_UUID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = MemoryDurableCache::new(10);
        let resolver = resolver_for(&server.uri(), cache.clone());

        let first = resolver.resolve_profile(NOTCH_UUID).await.unwrap().unwrap();
        let second = resolver.resolve_profile(NOTCH_UUID).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.raw(), body.to_string());

        let key = format!("profile:{NOTCH_UUID}");
        let stored = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(stored, body.to_string());

        let ttl = cache.store().read().await.ttl_remaining(&key).unwrap();
        assert!(ttl <= 30 && ttl >= 29);
    }

    #[tokio::test]
    async fn test_profile_is_kept_verbatim() {
        let server = MockServer::start().await;
        let raw = format!(r#"{{"id":"{NOTCH_UUID}","properties":[]}}"#);
        Mock::given(method("GET"))
            .and(path(format!("/session/minecraft/profile/{NOTCH_UUID}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(raw.clone()))
            .mount(&server)
            .await;

        let cache = MemoryDurableCache::new(10);
        let resolver = resolver_for(&server.uri(), cache.clone());

        let profile = resolver.resolve_profile(NOTCH_UUID).await.unwrap().unwrap();
        assert_eq!(profile.raw(), raw);
        assert_eq!(profile.name(), None);
        assert_eq!(
            cache.get(&format!("profile:{NOTCH_UUID}")).await.unwrap(),
            Some(raw)
        );
        assert_eq!(resolver.resolve_textures(NOTCH_UUID).await.unwrap(), Textures::default());
    }

    #[tokio::test]
    async fn test_unparseable_profile_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/session/minecraft/profile/{NOTCH_UUID}")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let cache = MemoryDurableCache::new(10);
        let resolver = resolver_for(&server.uri(), cache.clone());

        assert!(matches!(
            resolver.resolve_profile(NOTCH_UUID).await,
            Err(ProxyError::UpstreamBody(_))
        ));
        assert!(cache.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_encoded_username_is_not_encoded_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri(), MemoryDurableCache::new(10));
        assert!(resolver.resolve_uuid("a%20b").await.unwrap().is_none());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/users/profiles/minecraft/a%20b");
    }

    #[tokio::test]
    async fn test_missing_username_entry_does_not_block_uuid_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/session/minecraft/profile/{NOTCH_UUID}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(notch_profile("http://t.example/s")),
            )
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri(), MemoryDurableCache::new(10));

        let textures = resolver.resolve_textures(NOTCH_UUID).await.unwrap();
        assert_eq!(textures.skin.as_deref(), Some("http://t.example/s"));
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_textures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri(), MemoryDurableCache::new(10));

        assert_eq!(
            resolver.resolve_textures("nobody").await.unwrap(),
            Textures::default()
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        // Nothing listens on port 9 of localhost.
        let resolver = IdentityResolver::new(
            Client::new(),
            Arc::new(MemoryDurableCache::new(10)),
            ResolverSettings {
                mojang_api_url: "http://127.0.0.1:9".to_string(),
                session_server_url: "http://127.0.0.1:9".to_string(),
                username_ttl: 60,
                profile_ttl: 60,
            },
        );

        assert!(matches!(
            resolver.resolve_uuid("Notch").await,
            Err(ProxyError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_texture_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/texture/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = resolver_for(&server.uri(), MemoryDurableCache::new(10));
        let result = resolver
            .fetch_texture(&format!("{}/texture/gone", server.uri()))
            .await;

        assert!(matches!(result, Err(ProxyError::Upstream(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_uuid_shaped_input_passes_through(
            input in prop_oneof!["[ -~]{32}", "[ -~]{36}"]
        ) {
            // Unroutable upstream: any lookup would fail the test.
            let resolver = IdentityResolver::new(
                Client::new(),
                Arc::new(MemoryDurableCache::new(10)),
                ResolverSettings {
                    mojang_api_url: "http://127.0.0.1:9".to_string(),
                    session_server_url: "http://127.0.0.1:9".to_string(),
                    username_ttl: 60,
                    profile_ttl: 60,
                },
            );

            let resolved = tokio_test::block_on(resolver.resolve_uuid(&input)).unwrap();
            prop_assert_eq!(resolved, Some(input));
        }
    }
}
