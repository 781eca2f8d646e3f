//! Cart contents resolved against the payment provider.

use tidepool_core::{Cart, CurrencyCode, Money, PriceId};
use tracing::{instrument, warn};

use crate::stripe::{PaymentProvider, StripeError};

/// One resolved cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub price_id: PriceId,
    pub name: String,
    pub unit_price: Money,
}

impl CartLine {
    #[must_use]
    pub fn unit_price_display(&self) -> String {
        self.unit_price.display()
    }
}

/// Cart as shown on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Resolved entries in cart order; unresolvable entries are absent.
    pub lines: Vec<CartLine>,
    /// Sum of the lines sharing the first line's currency.
    pub total: Money,
}

impl CartSummary {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Money::zero(CurrencyCode::USD),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        self.total.display()
    }
}

/// Resolve every stored price identifier to a name and unit price.
///
/// Each entry costs one price lookup and one product lookup. Entries whose
/// lookup fails, or whose price has no fixed amount, are skipped without
/// telling the visitor. Lines in a different currency from the first line
/// are listed but left out of the total.
#[instrument(skip(provider, cart), fields(entries = cart.len()))]
pub async fn summarize_cart(provider: &dyn PaymentProvider, cart: &Cart) -> CartSummary {
    let mut lines = Vec::with_capacity(cart.len());

    for price_id in cart.items() {
        match resolve_line(provider, price_id).await {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => warn!(price_id = %price_id, "Skipping cart entry without a unit amount"),
            Err(e) => warn!(price_id = %price_id, error = %e, "Skipping unresolvable cart entry"),
        }
    }

    let total = total_of(&lines);
    CartSummary { lines, total }
}

async fn resolve_line(
    provider: &dyn PaymentProvider,
    price_id: &PriceId,
) -> Result<Option<CartLine>, StripeError> {
    let price = provider.retrieve_price(price_id).await?;
    let Some(unit_price) = price.unit_money() else {
        return Ok(None);
    };
    let product = provider.retrieve_product(&price.product).await?;

    Ok(Some(CartLine {
        price_id: price_id.clone(),
        name: product.name,
        unit_price,
    }))
}

fn total_of(lines: &[CartLine]) -> Money {
    let Some(first) = lines.first() else {
        return Money::zero(CurrencyCode::USD);
    };

    lines
        .iter()
        .fold(Money::zero(first.unit_price.currency.clone()), |total, line| {
            total.checked_add(&line.unit_price).unwrap_or_else(|| {
                warn!(
                    price_id = %line.price_id,
                    currency = %line.unit_price.currency,
                    "Cart line excluded from total"
                );
                total
            })
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::FakeProvider;

    fn cart(ids: &[&str]) -> Cart {
        ids.iter().map(|id| PriceId::parse(id).unwrap()).collect()
    }

    fn provider() -> FakeProvider {
        FakeProvider::new()
            .with_product("prod_box", "Monthly Box", Some("price_box"), 1500)
            .with_product("prod_mug", "Mug Club", Some("price_mug"), 900)
    }

    #[tokio::test]
    async fn test_summary_keeps_duplicates_and_totals() {
        let summary =
            summarize_cart(&provider(), &cart(&["price_box", "price_mug", "price_box"])).await;

        let names: Vec<_> = summary.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Monthly Box", "Mug Club", "Monthly Box"]);
        assert_eq!(summary.lines.len(), 3);
        assert_eq!(summary.total_display(), "$39.00");
    }

    #[tokio::test]
    async fn test_summary_skips_failed_lookups() {
        let provider = provider().failing_product("prod_mug");

        let summary =
            summarize_cart(&provider, &cart(&["price_box", "price_mug", "price_unknown"])).await;

        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].price_id.as_str(), "price_box");
        assert_eq!(summary.total_display(), "$15.00");
    }

    #[tokio::test]
    async fn test_summary_of_empty_cart() {
        let summary = summarize_cart(&provider(), &Cart::new()).await;
        assert_eq!(summary, CartSummary::empty());
        assert_eq!(summary.total_display(), "$0.00");
    }

    #[tokio::test]
    async fn test_summary_excludes_other_currency_from_total() {
        let provider = provider().with_price("price_box_eur", "prod_box", 1400, CurrencyCode::EUR);

        let summary = summarize_cart(&provider, &cart(&["price_box", "price_box_eur"])).await;

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[1].unit_price_display(), "€14.00");
        assert_eq!(summary.total_display(), "$15.00");
    }
}
