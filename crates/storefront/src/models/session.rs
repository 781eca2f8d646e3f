//! Session-related types.
//!
//! The session holds only the visitor's [`CartKey`]; the cart itself lives in
//! the cart store.

use tower_sessions::Session;

use crate::cart_store::CartKey;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart key.
    pub const CART_KEY: &str = "cart_key";
}

/// Read the cart key from the session, if one has been issued.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn cart_key(
    session: &Session,
) -> Result<Option<CartKey>, tower_sessions::session::Error> {
    session.get::<CartKey>(keys::CART_KEY).await
}

/// Read the cart key from the session, issuing a new one if absent.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn cart_key_or_insert(
    session: &Session,
) -> Result<CartKey, tower_sessions::session::Error> {
    if let Some(key) = cart_key(session).await? {
        return Ok(key);
    }

    let key = CartKey::generate();
    session.insert(keys::CART_KEY, key).await?;
    Ok(key)
}
