//! Cart storage.
//!
//! The visitor's session only carries an opaque [`CartKey`]; the cart itself
//! lives behind the [`CartStore`] trait. Handlers never touch a concrete
//! store, so the backend can be swapped without changing routes.
//!
//! # Backends
//!
//! - [`MemoryCartStore`] - process-local, idle carts evicted after the
//!   session inactivity expiry

mod memory;

pub use memory::MemoryCartStore;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tidepool_core::{Cart, PriceId};
use uuid::Uuid;

/// Errors raised by a cart store backend.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The backend could not complete the operation.
    #[error("Cart store backend error: {0}")]
    Backend(String),
}

/// Identifier naming one visitor's cart in a [`CartStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(Uuid);

impl CartKey {
    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Storage for carts keyed by [`CartKey`].
///
/// A key with no stored cart behaves as an empty cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Current contents of the cart.
    async fn load(&self, key: &CartKey) -> Result<Cart, CartStoreError>;

    /// Append a price identifier, creating the cart if absent.
    ///
    /// Returns the cart after the append.
    async fn add(&self, key: &CartKey, price_id: PriceId) -> Result<Cart, CartStoreError>;

    /// Remove the first entry matching `price_id`.
    ///
    /// Returns `true` if an entry was removed.
    async fn remove(&self, key: &CartKey, price_id: &PriceId) -> Result<bool, CartStoreError>;

    /// Remove one stored entry for each identifier in `entries`.
    ///
    /// Applied under the same ordering as `add`, so an entry added after
    /// `entries` was read survives.
    async fn remove_entries(
        &self,
        key: &CartKey,
        entries: &[PriceId],
    ) -> Result<(), CartStoreError>;
}
