//! Catalog listing.

use tidepool_core::PriceId;
use tracing::{debug, instrument};

use crate::stripe::{PaymentProvider, StripeError};

/// One product as shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub description: String,
    pub price_id: PriceId,
    pub image_url: Option<String>,
    /// Formatted unit amount, absent for prices without a fixed amount.
    pub unit_price: Option<String>,
    /// Billing cycle for recurring prices, e.g. "month".
    pub interval: Option<String>,
}

/// Fetch every active product and resolve its default price.
///
/// Products without a default price are left out since they cannot be added
/// to a cart. Any provider error discards the whole listing: the error is
/// logged and an empty list is returned.
#[instrument(skip(provider))]
pub async fn list_catalog(provider: &dyn PaymentProvider) -> Vec<CatalogItem> {
    match fetch_catalog(provider).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            Vec::new()
        }
    }
}

async fn fetch_catalog(provider: &dyn PaymentProvider) -> Result<Vec<CatalogItem>, StripeError> {
    let products = provider.list_products().await?;
    let mut items = Vec::with_capacity(products.len());

    for product in products.into_iter().filter(|p| p.active) {
        let Some(price_id) = product.default_price.clone() else {
            debug!(product_id = %product.id, "Skipping product without default price");
            continue;
        };

        let price = provider.retrieve_price(&price_id).await?;

        items.push(CatalogItem {
            image_url: product.primary_image().map(str::to_owned),
            name: product.name,
            description: product.description.unwrap_or_default(),
            price_id,
            unit_price: price.unit_money().map(|money| money.display()),
            interval: price.recurring.as_ref().map(|r| r.label()),
        });
    }

    Ok(items)
}
