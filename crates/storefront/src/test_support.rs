//! In-process fake of the payment provider for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tidepool_core::{CheckoutSessionId, CurrencyCode, PriceId, ProductId};

use crate::stripe::{
    CheckoutRequest, CheckoutSession, PaymentProvider, Price, Product, Recurring, StripeError,
};

/// Catalog held in memory, with switchable failures.
#[derive(Default)]
pub struct FakeProvider {
    products: Vec<Product>,
    prices: HashMap<String, Price>,
    fail_list: bool,
    failing_prices: HashSet<String>,
    failing_products: HashSet<String>,
    fail_checkout: bool,
    checkout_requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with a monthly USD price.
    pub fn with_product(
        mut self,
        product_id: &str,
        name: &str,
        price_id: Option<&str>,
        unit_amount: i64,
    ) -> Self {
        let product_id = ProductId::parse(product_id).unwrap();
        let default_price = price_id.map(|id| PriceId::parse(id).unwrap());

        if let Some(price_id) = &default_price {
            self.prices.insert(
                price_id.to_string(),
                Price {
                    id: price_id.clone(),
                    unit_amount: Some(unit_amount),
                    currency: CurrencyCode::USD,
                    product: product_id.clone(),
                    recurring: Some(Recurring {
                        interval: "month".to_string(),
                        interval_count: 1,
                    }),
                },
            );
        }

        self.products.push(Product {
            images: vec![format!("https://files.stripe.com/{product_id}.png")],
            id: product_id,
            name: name.to_string(),
            description: Some(format!("{name} description")),
            default_price,
            active: true,
        });
        self
    }

    /// Add a standalone price for an existing product in another currency.
    pub fn with_price(
        mut self,
        price_id: &str,
        product_id: &str,
        unit_amount: i64,
        currency: CurrencyCode,
    ) -> Self {
        let id = PriceId::parse(price_id).unwrap();
        self.prices.insert(
            id.to_string(),
            Price {
                id,
                unit_amount: Some(unit_amount),
                currency,
                product: ProductId::parse(product_id).unwrap(),
                recurring: None,
            },
        );
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_price(mut self, price_id: &str) -> Self {
        self.failing_prices.insert(price_id.to_string());
        self
    }

    pub fn failing_product(mut self, product_id: &str) -> Self {
        self.failing_products.insert(product_id.to_string());
        self
    }

    pub fn failing_checkout(mut self) -> Self {
        self.fail_checkout = true;
        self
    }

    /// Checkout requests received so far.
    pub fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.checkout_requests.lock().unwrap().clone()
    }
}

fn unavailable() -> StripeError {
    StripeError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn list_products(&self) -> Result<Vec<Product>, StripeError> {
        if self.fail_list {
            return Err(unavailable());
        }
        Ok(self.products.clone())
    }

    async fn retrieve_price(&self, id: &PriceId) -> Result<Price, StripeError> {
        if self.failing_prices.contains(id.as_str()) {
            return Err(unavailable());
        }
        self.prices
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StripeError::NotFound(format!("No such price: '{id}'")))
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, StripeError> {
        if self.failing_products.contains(id.as_str()) {
            return Err(unavailable());
        }
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| StripeError::NotFound(format!("No such product: '{id}'")))
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let mut requests = self.checkout_requests.lock().unwrap();
        requests.push(request.clone());
        if self.fail_checkout {
            return Err(StripeError::Api {
                status: 400,
                message: "No such price: 'price_gone'".to_string(),
            });
        }
        let id = format!("cs_test_{}", requests.len());
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.stripe.com/c/pay/{id}")),
            id: CheckoutSessionId::parse(id).unwrap(),
        })
    }
}
