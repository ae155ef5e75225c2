//! Session middleware configuration.
//!
//! Sessions live in process memory and die with the process; login state is
//! deliberately not persisted across restarts. Each request gets its own
//! session object through the layer - authentication state is never a
//! process-wide flag.

use tower_sessions::{MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vc_session";

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &ServerConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Secure cookies only when served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
