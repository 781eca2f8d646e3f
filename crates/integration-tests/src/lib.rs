//! Live integration tests for the Tidepool storefront.
//!
//! These tests drive a running storefront over HTTP and are ignored by
//! default. The storefront must be configured with a Stripe test-mode key.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p tidepool-storefront &
//! STOREFRONT_TEST_PRICE_ID=price_... cargo test -p tidepool-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` - storefront under test (default `http://127.0.0.1:3000`)
//! - `STOREFRONT_TEST_PRICE_ID` - an active test-mode price to add to carts

use reqwest::Client;
use reqwest::redirect::Policy;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
}

/// Price ID used when a test needs a real cart entry.
#[must_use]
pub fn test_price_id() -> Option<String> {
    std::env::var("STOREFRONT_TEST_PRICE_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
}

/// A client that keeps the session cookie and does not follow redirects,
/// so tests can assert on `303` responses and their `Location`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn session_client() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
}
