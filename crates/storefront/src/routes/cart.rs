//! Cart route handlers.
//!
//! Cart keys are stored in the session and name a cart in the cart store.
//! Mutations answer with `303 See Other` so a browser refresh never resubmits
//! the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tidepool_core::PriceId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::services::cart::{CartSummary, summarize_cart};
use crate::services::checkout::{CheckoutOutcome, begin_checkout};
use crate::state::AppState;

/// Form body shared by add and remove.
#[derive(Debug, Deserialize)]
pub struct PriceForm {
    #[serde(default)]
    pub price_id: String,
}

impl PriceForm {
    fn price_id(self) -> Result<PriceId> {
        PriceId::parse(&self.price_id)
            .map_err(|_| AppError::BadRequest("price_id is required".to_string()))
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub cart: CartSummary,
    /// Stored entries, resolved or not, as the catalog badge counts them.
    pub cart_count: usize,
}

/// Display cart page.
///
/// Entries that can no longer be resolved are left out of the page.
///
/// # Errors
///
/// Returns an error if the session or cart store cannot be read.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let (cart, cart_count) = match session::cart_key(&session).await? {
        Some(key) => {
            let stored = state.carts().load(&key).await?;
            (summarize_cart(state.provider(), &stored).await, stored.len())
        }
        None => (CartSummary::empty(), 0),
    };

    Ok(CartShowTemplate { cart, cart_count })
}

/// Add a price ID to the cart, then return to the catalog.
///
/// Issues a cart key on first add.
///
/// # Errors
///
/// Returns 400 if `price_id` is missing or blank, or 500 if the session or
/// cart store fails.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PriceForm>,
) -> Result<Redirect> {
    let price_id = form.price_id()?;
    let key = session::cart_key_or_insert(&session).await?;

    let cart = state.carts().add(&key, price_id.clone()).await?;
    tracing::info!(price_id = %price_id, entries = cart.len(), "Added to cart");
    add_breadcrumb("cart", "Added to cart", Some(&[("price_id", price_id.as_str())]));

    Ok(Redirect::to("/"))
}

/// Remove the first matching price ID, then return to the cart.
///
/// Removing an ID that is not in the cart is a no-op.
///
/// # Errors
///
/// Returns 400 if `price_id` is missing or blank, or 500 if the session or
/// cart store fails.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PriceForm>,
) -> Result<Redirect> {
    let price_id = form.price_id()?;

    if let Some(key) = session::cart_key(&session).await? {
        let removed = state.carts().remove(&key, &price_id).await?;
        tracing::info!(price_id = %price_id, removed, "Remove from cart");
    }

    Ok(Redirect::to("/cart"))
}

/// Hand the cart off to hosted checkout.
///
/// An empty cart goes back to the cart page without contacting the provider.
/// A provider failure answers `502` with the provider's error message as
/// plain text and leaves the cart as it was.
///
/// # Errors
///
/// Returns 500 if the session or cart store fails.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let key = session::cart_key(&session).await?;

    let outcome = begin_checkout(
        state.provider(),
        state.carts(),
        key,
        state.checkout_settings(),
    )
    .await?;

    Ok(match outcome {
        CheckoutOutcome::EmptyCart => Redirect::to("/cart").into_response(),
        CheckoutOutcome::Redirect(url) => {
            add_breadcrumb("checkout", "Redirected to hosted checkout", None);
            Redirect::to(&url).into_response()
        }
        CheckoutOutcome::Failed(message) => (StatusCode::BAD_GATEWAY, message).into_response(),
    })
}
