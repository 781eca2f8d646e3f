//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Catalog listing
//! GET  /health                    - Health check (mounted in `app`)
//!
//! # Cart
//! POST /add_to_cart               - Append a price ID, redirect to /
//! POST /remove_from_cart          - Remove first matching price ID, redirect to /cart
//! GET  /cart                      - Cart page with resolved lines and total
//!
//! # Checkout
//! POST /create-checkout-session   - Redirect to hosted checkout
//! GET  /success                   - Post-payment landing page
//! GET  /cancelled                 - Abandoned checkout landing page
//! ```

pub mod cart;
pub mod home;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/add_to_cart", post(cart::add))
        .route("/remove_from_cart", post(cart::remove))
        .route("/cart", get(cart::show))
        .route("/create-checkout-session", post(cart::checkout))
        .route("/success", get(pages::success))
        .route("/cancelled", get(pages::cancelled))
}
