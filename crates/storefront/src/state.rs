//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart_store::CartStore;
use crate::config::StorefrontConfig;
use crate::services::checkout::CheckoutSettings;
use crate::stripe::PaymentProvider;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// payment provider, the cart store, and checkout settings.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    provider: Arc<dyn PaymentProvider>,
    carts: Arc<dyn CartStore>,
    checkout: CheckoutSettings,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration, read for checkout settings
    /// * `provider` - Payment provider backing the catalog and checkout
    /// * `carts` - Store holding each visitor's cart
    #[must_use]
    pub fn new(
        config: &StorefrontConfig,
        provider: Arc<dyn PaymentProvider>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        let checkout = CheckoutSettings {
            mode: config.stripe.checkout_mode,
            success_url: config.success_url(),
            cancel_url: config.cancel_url(),
        };

        Self {
            inner: Arc::new(AppStateInner {
                provider,
                carts,
                checkout,
            }),
        }
    }

    /// Get a reference to the payment provider.
    #[must_use]
    pub fn provider(&self) -> &dyn PaymentProvider {
        self.inner.provider.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.carts.as_ref()
    }

    /// Checkout mode and return URLs derived from configuration.
    #[must_use]
    pub fn checkout_settings(&self) -> &CheckoutSettings {
        &self.inner.checkout
    }
}
