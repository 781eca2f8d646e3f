//! Stripe object types consumed by the storefront.
//!
//! Only the fields the storefront reads are modelled; serde ignores the rest
//! of each payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tidepool_core::{CheckoutSessionId, CurrencyCode, Money, PriceId, ProductId};

// =============================================================================
// Catalog
// =============================================================================

/// A product from the Stripe catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price shown for the product. Unexpanded, so only the identifier.
    #[serde(default)]
    pub default_price: Option<PriceId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Product {
    /// Best available image: the first image attached to the product.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .find(|url| !url.trim().is_empty())
    }
}

const fn default_true() -> bool {
    true
}

/// A price from the Stripe catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: PriceId,
    /// Amount in minor units. Absent for custom or tiered pricing.
    #[serde(default)]
    pub unit_amount: Option<i64>,
    pub currency: CurrencyCode,
    /// Owning product. Unexpanded, so only the identifier.
    pub product: ProductId,
    #[serde(default)]
    pub recurring: Option<Recurring>,
}

impl Price {
    /// Unit amount as money, if the price has a fixed amount.
    #[must_use]
    pub fn unit_money(&self) -> Option<Money> {
        self.unit_amount
            .map(|amount| Money::new(amount, self.currency.clone()))
    }
}

/// Billing cycle of a recurring price.
#[derive(Debug, Clone, Deserialize)]
pub struct Recurring {
    pub interval: String,
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
}

impl Recurring {
    /// Human readable cycle, e.g. "month" or "3 months".
    #[must_use]
    pub fn label(&self) -> String {
        if self.interval_count <= 1 {
            self.interval.clone()
        } else {
            format!("{} {}s", self.interval_count, self.interval)
        }
    }
}

const fn default_interval_count() -> u32 {
    1
}

/// A page of a Stripe list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

// =============================================================================
// Checkout
// =============================================================================

/// Stripe Checkout `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// Recurring prices, creates a subscription.
    #[default]
    Subscription,
    /// One-time prices, creates a payment.
    Payment,
}

impl CheckoutMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for CheckoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subscription" => Ok(Self::Subscription),
            "payment" => Ok(Self::Payment),
            other => Err(format!(
                "unknown checkout mode '{other}' (expected 'subscription' or 'payment')"
            )),
        }
    }
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub price: PriceId,
    pub quantity: u32,
}

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub line_items: Vec<LineItem>,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Encode as Stripe form parameters (`line_items[0][price]=...`).
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), self.mode.to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];

        for (index, item) in self.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{index}][price]"),
                item.price.to_string(),
            ));
            params.push((
                format!("line_items[{index}][quantity]"),
                item.quantity.to_string(),
            ));
        }

        params
    }
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: CheckoutSessionId,
    /// Hosted checkout page. Absent once the session is complete or expired.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialize_minimal() {
        let json = r#"{
            "id": "prod_123",
            "object": "product",
            "name": "Monthly Box",
            "description": null,
            "default_price": "price_abc",
            "images": [],
            "metadata": {}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "prod_123");
        assert_eq!(product.default_price.as_ref().unwrap().as_str(), "price_abc");
        assert!(product.description.is_none());
        assert!(product.primary_image().is_none());
        assert!(product.active);
    }

    #[test]
    fn test_product_without_default_price() {
        let json = r#"{"id": "prod_1", "name": "Draft", "default_price": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.default_price.is_none());
    }

    #[test]
    fn test_primary_image_skips_blank() {
        let json = r#"{"id": "prod_1", "name": "Box", "images": ["", "https://files.stripe.com/a.png"]}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.primary_image(), Some("https://files.stripe.com/a.png"));
    }

    #[test]
    fn test_price_deserialize_recurring() {
        let json = r#"{
            "id": "price_abc",
            "object": "price",
            "currency": "usd",
            "unit_amount": 1500,
            "product": "prod_123",
            "recurring": {"interval": "month", "interval_count": 3}
        }"#;
        let price: Price = serde_json::from_str(json).unwrap();

        assert_eq!(price.unit_money().unwrap().display(), "$15.00");
        assert_eq!(price.recurring.unwrap().label(), "3 months");
    }

    #[test]
    fn test_price_without_unit_amount() {
        let json = r#"{"id": "price_x", "currency": "eur", "unit_amount": null, "product": "prod_1"}"#;
        let price: Price = serde_json::from_str(json).unwrap();
        assert!(price.unit_money().is_none());
    }

    #[test]
    fn test_checkout_mode_parse() {
        assert_eq!(
            "Subscription".parse::<CheckoutMode>().unwrap(),
            CheckoutMode::Subscription
        );
        assert_eq!("payment".parse::<CheckoutMode>().unwrap(), CheckoutMode::Payment);
        assert!("setup".parse::<CheckoutMode>().is_err());
    }

    #[test]
    fn test_checkout_request_form_encoding() {
        let request = CheckoutRequest {
            line_items: vec![
                LineItem {
                    price: PriceId::parse("price_a").unwrap(),
                    quantity: 1,
                },
                LineItem {
                    price: PriceId::parse("price_a").unwrap(),
                    quantity: 1,
                },
            ],
            mode: CheckoutMode::Subscription,
            success_url: "http://localhost:3000/success".to_string(),
            cancel_url: "http://localhost:3000/cancelled".to_string(),
        };
        let form = request.to_form();

        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("mode"), Some("subscription"));
        assert_eq!(get("success_url"), Some("http://localhost:3000/success"));
        assert_eq!(get("cancel_url"), Some("http://localhost:3000/cancelled"));
        assert_eq!(get("line_items[0][price]"), Some("price_a"));
        assert_eq!(get("line_items[1][price]"), Some("price_a"));
        assert_eq!(get("line_items[1][quantity]"), Some("1"));
        assert_eq!(get("line_items[2][price]"), None);
    }
}
