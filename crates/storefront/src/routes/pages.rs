//! Checkout landing page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;

/// Shown after Stripe Checkout completes.
#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct SuccessTemplate;

/// Shown when the visitor backs out of Stripe Checkout.
#[derive(Template, WebTemplate)]
#[template(path = "cancelled.html")]
pub struct CancelledTemplate;

/// Display the thank-you page.
#[instrument]
pub async fn success() -> impl IntoResponse {
    SuccessTemplate
}

/// Display the cancellation page.
///
/// The cart was not cleared, so the page links back to it.
#[instrument]
pub async fn cancelled() -> impl IntoResponse {
    CancelledTemplate
}
