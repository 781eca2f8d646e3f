//! Shared harness for router tests.
//!
//! Builds the full storefront router around an in-memory catalog and drives
//! it with `oneshot`, carrying the session cookie between requests.

#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use tidepool_core::{CheckoutSessionId, CurrencyCode, PriceId, ProductId};
use tidepool_storefront::cart_store::MemoryCartStore;
use tidepool_storefront::config::StorefrontConfig;
use tidepool_storefront::middleware::create_session_layer;
use tidepool_storefront::state::AppState;
use tidepool_storefront::stripe::{
    CheckoutRequest, CheckoutSession, PaymentProvider, Price, Product, Recurring, StripeError,
};
use tower::ServiceExt;

pub const SESSION_SECRET: &str =
    "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";
pub const STRIPE_KEY: &str = "sk_test_51HqLyjWDarjtT1zdp7dcVbN3m";

/// Stripe stand-in with a fixed catalog.
#[derive(Default)]
pub struct StubStripe {
    products: Vec<Product>,
    prices: HashMap<String, Price>,
    reject_checkout: bool,
    checkouts: Mutex<Vec<CheckoutRequest>>,
}

impl StubStripe {
    /// Two monthly plans: `price_basic` ($9.00) and `price_pro` ($25.00).
    pub fn catalog() -> Self {
        Self::default()
            .plan("prod_basic", "Basic Plan", "price_basic", 900)
            .plan("prod_pro", "Pro Plan", "price_pro", 2500)
    }

    pub fn plan(mut self, product: &str, name: &str, price: &str, amount: i64) -> Self {
        let product_id = ProductId::parse(product).unwrap();
        let price_id = PriceId::parse(price).unwrap();
        self.prices.insert(
            price.to_string(),
            Price {
                id: price_id.clone(),
                unit_amount: Some(amount),
                currency: CurrencyCode::USD,
                product: product_id.clone(),
                recurring: Some(Recurring {
                    interval: "month".to_string(),
                    interval_count: 1,
                }),
            },
        );
        self.products.push(Product {
            id: product_id,
            name: name.to_string(),
            description: None,
            default_price: Some(price_id),
            images: Vec::new(),
            active: true,
        });
        self
    }

    pub fn rejecting_checkout(mut self) -> Self {
        self.reject_checkout = true;
        self
    }

    pub fn checkouts(&self) -> Vec<CheckoutRequest> {
        self.checkouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for StubStripe {
    async fn list_products(&self) -> Result<Vec<Product>, StripeError> {
        Ok(self.products.clone())
    }

    async fn retrieve_price(&self, id: &PriceId) -> Result<Price, StripeError> {
        self.prices
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StripeError::NotFound(format!("No such price: '{id}'")))
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, StripeError> {
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
        self.checkouts.lock().unwrap().push(request.clone());
        if self.reject_checkout {
            return Err(StripeError::Api {
                status: 400,
                message: "This price is not active".to_string(),
            });
        }
        Ok(CheckoutSession {
            id: CheckoutSessionId::parse("cs_test_stub").unwrap(),
            url: Some("https://checkout.stripe.com/c/pay/cs_test_stub".to_string()),
        })
    }
}

pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_SESSION_SECRET" => Some(SESSION_SECRET.to_string()),
        "STRIPE_SECRET_KEY" => Some(STRIPE_KEY.to_string()),
        "STOREFRONT_BASE_URL" => Some("http://shop.test".to_string()),
        _ => None,
    })
    .unwrap()
}

/// A storefront router plus the stub behind it.
pub struct TestApp {
    router: Router,
    pub stripe: Arc<StubStripe>,
    cookie: Option<String>,
}

impl TestApp {
    pub fn new(stripe: StubStripe) -> Self {
        let config = test_config();
        let stripe = Arc::new(stripe);
        let session_layer = create_session_layer(&config).unwrap();
        let carts = Arc::new(MemoryCartStore::new(Duration::from_secs(600)));
        let state = AppState::new(&config, stripe.clone(), carts);

        Self {
            router: tidepool_storefront::app(state, session_layer),
            stripe,
            cookie: None,
        }
    }

    /// Send a request, remembering any session cookie the response sets.
    pub async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let mut request = request;
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn add(&mut self, price_id: &str) -> TestResponse {
        self.post_form("/add_to_cart", &format!("price_id={price_id}"))
            .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Number of cart rows rendered on the cart page.
    pub fn cart_rows(&self) -> usize {
        self.body.matches("action=\"/remove_from_cart\"").count()
    }

    /// Count shown in the header cart badge, if one is rendered.
    pub fn badge(&self) -> Option<usize> {
        let (_, rest) = self.body.split_once("<span class=\"badge\">")?;
        let (count, _) = rest.split_once("</span>")?;
        count.trim().parse().ok()
    }
}
