//! In-memory cart store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tidepool_core::{Cart, PriceId};
use tokio::sync::Mutex;

use super::{CartKey, CartStore, CartStoreError};

/// Upper bound on carts held at once; least recently used carts go first.
const MAX_CARTS: u64 = 100_000;

/// Process-local cart store backed by a `moka` cache.
///
/// Each cart sits behind its own mutex so that concurrent requests from one
/// visitor apply in order while other visitors are unaffected. Carts not
/// touched for `idle_expiry` are evicted, matching session expiry.
#[derive(Clone)]
pub struct MemoryCartStore {
    carts: Cache<CartKey, Arc<Mutex<Cart>>>,
}

impl MemoryCartStore {
    /// Create a store that evicts carts idle longer than `idle_expiry`.
    #[must_use]
    pub fn new(idle_expiry: Duration) -> Self {
        let carts = Cache::builder()
            .max_capacity(MAX_CARTS)
            .time_to_idle(idle_expiry)
            .build();

        Self { carts }
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, key: &CartKey) -> Result<Cart, CartStoreError> {
        match self.carts.get(key).await {
            Some(cart) => Ok(cart.lock().await.clone()),
            None => Ok(Cart::new()),
        }
    }

    async fn add(&self, key: &CartKey, price_id: PriceId) -> Result<Cart, CartStoreError> {
        let cart = self
            .carts
            .get_with(*key, async { Arc::new(Mutex::new(Cart::new())) })
            .await;

        let mut cart = cart.lock().await;
        cart.add(price_id);
        Ok(cart.clone())
    }

    async fn remove(&self, key: &CartKey, price_id: &PriceId) -> Result<bool, CartStoreError> {
        let Some(cart) = self.carts.get(key).await else {
            return Ok(false);
        };

        let removed = cart.lock().await.remove_first(price_id);
        Ok(removed)
    }

    async fn remove_entries(
        &self,
        key: &CartKey,
        entries: &[PriceId],
    ) -> Result<(), CartStoreError> {
        // An emptied cart stays cached until idle; invalidating it here could
        // strand an add that already holds its handle.
        if let Some(cart) = self.carts.get(key).await {
            cart.lock().await.remove_entries(entries);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> MemoryCartStore {
        MemoryCartStore::new(Duration::from_secs(60))
    }

    fn price(id: &str) -> PriceId {
        PriceId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_key_is_empty_cart() {
        let cart = store().load(&CartKey::generate()).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_creates_and_appends() {
        let store = store();
        let key = CartKey::generate();

        store.add(&key, price("price_a")).await.unwrap();
        let cart = store.add(&key, price("price_a")).await.unwrap();

        assert_eq!(cart.items(), &[price("price_a"), price("price_a")]);
        assert_eq!(store.load(&key).await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_carts_are_isolated_by_key() {
        let store = store();
        let alice = CartKey::generate();
        let bob = CartKey::generate();

        store.add(&alice, price("price_a")).await.unwrap();

        assert_eq!(store.load(&alice).await.unwrap().len(), 1);
        assert!(store.load(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_cart_unchanged() {
        let store = store();
        let key = CartKey::generate();
        store.add(&key, price("price_a")).await.unwrap();

        assert!(!store.remove(&key, &price("price_b")).await.unwrap());
        assert_eq!(store.load(&key).await.unwrap().items(), &[price("price_a")]);

        // Removing from a cart that was never created is also a no-op
        assert!(!store.remove(&CartKey::generate(), &price("price_a")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_entries_empties_loaded_cart() {
        let store = store();
        let key = CartKey::generate();
        store.add(&key, price("price_a")).await.unwrap();
        store.add(&key, price("price_a")).await.unwrap();

        let loaded = store.load(&key).await.unwrap();
        store.remove_entries(&key, loaded.items()).await.unwrap();

        assert!(store.load(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_after_load_survives_remove_entries() {
        let store = store();
        let key = CartKey::generate();
        store.add(&key, price("price_a")).await.unwrap();

        let loaded = store.load(&key).await.unwrap();
        store.add(&key, price("price_b")).await.unwrap();
        store.remove_entries(&key, loaded.items()).await.unwrap();

        assert_eq!(store.load(&key).await.unwrap().items(), &[price("price_b")]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let store = store();
        let key = CartKey::generate();

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.add(&key, price(&format!("price_{i}"))).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.load(&key).await.unwrap().len(), 20);
    }
}
