//! Session middleware configuration.
//!
//! Sets up sessions using tower-sessions over [`MokaSessionStore`]. The cookie
//! carries only the session ID and is signed with the configured session
//! secret.

use secrecy::ExposeSecret;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};

use super::session_store::MokaSessionStore;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tidepool_session";

/// Session expiry time in seconds (7 days).
pub const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer type produced by [`create_session_layer`].
pub type StorefrontSessionLayer = SessionManagerLayer<MokaSessionStore, SignedCookie>;

/// Error building the session layer.
#[derive(Debug, thiserror::Error)]
#[error("invalid session signing key: {0}")]
pub struct SessionKeyError(String);

/// Create the session layer with an expiring in-memory store.
///
/// # Arguments
///
/// * `config` - Storefront configuration (for session secret and cookie security)
///
/// # Errors
///
/// Returns an error if the session secret cannot be used as a signing key.
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> Result<StorefrontSessionLayer, SessionKeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionKeyError(e.to_string()))?;

    Ok(SessionManagerLayer::new(MokaSessionStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
