//! Hand the cart off to hosted checkout.

use tracing::{error, info, instrument};

use crate::cart_store::{CartKey, CartStore, CartStoreError};
use crate::stripe::{CheckoutMode, CheckoutRequest, LineItem, PaymentProvider, StripeError};

/// Where the visitor goes after a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to buy; the provider was not contacted.
    EmptyCart,
    /// Session created and checked-out entries removed; send the visitor here.
    Redirect(String),
    /// The provider rejected the request. Carries the raw error message.
    Failed(String),
}

/// Return addresses and mode for the hosted checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
}

/// Create a hosted checkout session for the visitor's cart.
///
/// Every stored identifier becomes its own line item with quantity 1. The
/// checked-out entries are removed only once the provider has returned a
/// checkout URL; entries added meanwhile stay in the cart. On failure the
/// cart is left as it was.
///
/// # Errors
///
/// Returns `CartStoreError` if the cart cannot be read. Provider failures
/// are reported through [`CheckoutOutcome::Failed`] instead.
#[instrument(skip(provider, carts, settings))]
pub async fn begin_checkout(
    provider: &dyn PaymentProvider,
    carts: &dyn CartStore,
    key: Option<CartKey>,
    settings: &CheckoutSettings,
) -> Result<CheckoutOutcome, CartStoreError> {
    let Some(key) = key else {
        return Ok(CheckoutOutcome::EmptyCart);
    };

    let cart = carts.load(&key).await?;
    if cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let request = CheckoutRequest {
        line_items: cart
            .items()
            .iter()
            .map(|price| LineItem {
                price: price.clone(),
                quantity: 1,
            })
            .collect(),
        mode: settings.mode,
        success_url: settings.success_url.clone(),
        cancel_url: settings.cancel_url.clone(),
    };

    let session = match provider.create_checkout_session(&request).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to create checkout session");
            return Ok(CheckoutOutcome::Failed(e.to_string()));
        }
    };

    let Some(url) = session.url else {
        let e = StripeError::MissingCheckoutUrl(session.id.to_string());
        error!(error = %e, "Checkout session unusable");
        return Ok(CheckoutOutcome::Failed(e.to_string()));
    };

    // The session exists at this point, so the visitor is sent on even if
    // clearing fails.
    if let Err(e) = carts.remove_entries(&key, cart.items()).await {
        error!(error = %e, "Failed to clear cart after checkout handoff");
    }

    info!(session_id = %session.id, lines = request.line_items.len(), "Checkout handoff");
    Ok(CheckoutOutcome::Redirect(url))
}
