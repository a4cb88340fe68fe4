//! Configuration Module
//!
//! Loads proxy configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default username lookup base URL.
pub const DEFAULT_MOJANG_API_URL: &str = "https://api.mojang.com";
/// Default profile lookup base URL.
pub const DEFAULT_SESSION_SERVER_URL: &str = "https://sessionserver.mojang.com";

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origins allowed to receive `Access-Control-Allow-Origin`; empty allows all
    pub origin_whitelist: Vec<String>,
    /// Lifetime in seconds of cached username -> UUID lookups
    pub username_ttl: u64,
    /// Lifetime in seconds of cached profiles
    pub profile_ttl: u64,
    /// Lifetime in seconds of skin and cape responses
    pub skin_ttl: u64,
    /// Base URL of the username -> UUID service
    pub mojang_api_url: String,
    /// Base URL of the UUID -> profile service
    pub session_server_url: String,
    /// Maximum number of entries each in-process store can hold
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORIGIN_WHITELIST` - Comma-separated allowed origins (default: empty, allow all)
    /// - `USERNAME_TTL` - Username cache lifetime in seconds (default: 86400)
    /// - `PROFILE_TTL` - Profile cache lifetime in seconds (default: 3600)
    /// - `SKIN_TTL` - Skin/cape response lifetime in seconds (default: 3600)
    /// - `MOJANG_API_URL` - Username lookup base URL
    /// - `SESSION_SERVER_URL` - Profile lookup base URL
    /// - `MAX_ENTRIES` - Capacity of each in-process store (default: 10000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            origin_whitelist: env::var("ORIGIN_WHITELIST")
                .map(|v| parse_whitelist(&v))
                .unwrap_or_default(),
            username_ttl: parsed_var("USERNAME_TTL").unwrap_or(defaults.username_ttl),
            profile_ttl: parsed_var("PROFILE_TTL").unwrap_or(defaults.profile_ttl),
            skin_ttl: parsed_var("SKIN_TTL").unwrap_or(defaults.skin_ttl),
            mojang_api_url: base_url_var("MOJANG_API_URL").unwrap_or(defaults.mojang_api_url),
            session_server_url: base_url_var("SESSION_SERVER_URL")
                .unwrap_or(defaults.session_server_url),
            max_entries: parsed_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            origin_whitelist: Vec::new(),
            username_ttl: 86_400,
            profile_ttl: 3_600,
            skin_ttl: 3_600,
            mojang_api_url: DEFAULT_MOJANG_API_URL.to_string(),
            session_server_url: DEFAULT_SESSION_SERVER_URL.to_string(),
            max_entries: 10_000,
            cleanup_interval: 60,
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn base_url_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a comma-separated origin list, dropping blank entries.
pub fn parse_whitelist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(config.origin_whitelist.is_empty());
        assert_eq!(config.username_ttl, 86_400);
        assert_eq!(config.profile_ttl, 3_600);
        assert_eq!(config.skin_ttl, 3_600);
        assert_eq!(config.mojang_api_url, DEFAULT_MOJANG_API_URL);
        assert_eq!(config.session_server_url, DEFAULT_SESSION_SERVER_URL);
    }

    #[test]
    fn test_parse_whitelist() {
        let origins = parse_whitelist("https://a.example, https://b.example,,  ");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_parse_whitelist_empty() {
        assert!(parse_whitelist("").is_empty());
        assert!(parse_whitelist(" , ").is_empty());
    }
}
