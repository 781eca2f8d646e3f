//! Stripe catalog and Checkout API access.
//!
//! # Architecture
//!
//! - Stripe is the source of truth for products and prices - NO local sync,
//!   direct API calls on every page view
//! - Plain `reqwest` against the REST API (form-encoded bodies, bearer auth)
//! - Handlers depend on the [`PaymentProvider`] trait, not on the client, so
//!   they can run against an in-process fake
//!
//! # API surface
//!
//! - `GET  /v1/products` - list active products (paginated)
//! - `GET  /v1/prices/{id}` - retrieve a price
//! - `GET  /v1/products/{id}` - retrieve a product
//! - `POST /v1/checkout/sessions` - create a hosted checkout session
//!
//! # Example
//!
//! ```rust,ignore
//! use tidepool_storefront::stripe::{PaymentProvider, StripeClient};
//!
//! let client = StripeClient::new(&config.stripe)?;
//! let products = client.list_products().await?;
//! ```

mod client;
pub mod types;

pub use client::StripeClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tidepool_core::{PriceId, ProductId};

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error response.
    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Requested object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Stripe.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Checkout session was created without a redirect URL.
    #[error("Checkout session {0} has no URL")]
    MissingCheckoutUrl(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Operations the storefront needs from the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// List every active product in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, StripeError>;

    /// Retrieve a single price.
    async fn retrieve_price(&self, id: &PriceId) -> Result<Price, StripeError>;

    /// Retrieve a single product.
    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, StripeError>;

    /// Create a hosted checkout session.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, StripeError>;
}
