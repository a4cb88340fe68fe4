//! Skin Proxy - A caching edge proxy for Minecraft player data
//!
//! Resolves usernames to UUIDs, UUIDs to profiles and profiles to skin/cape
//! textures, keeping the upstream identity services behind two cache tiers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
