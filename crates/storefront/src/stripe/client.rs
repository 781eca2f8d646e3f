//! Stripe REST API client.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tidepool_core::{PriceId, ProductId};
use tracing::{debug, instrument};

use super::types::{CheckoutRequest, CheckoutSession, List, Price, Product};
use super::{PaymentProvider, StripeError};
use crate::config::StripeConfig;

/// Pinned API version so payload shapes don't drift with account defaults.
const API_VERSION: &str = "2024-06-20";

/// Maximum page size accepted by Stripe list endpoints.
const PAGE_LIMIT: u32 = 100;

/// Error envelope returned by Stripe on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Client for the Stripe REST API.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns error if the secret key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.secret_key.expose_secret()))
                .map_err(|e| StripeError::Config(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        headers.insert("stripe-version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    /// Send a request and decode a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StripeError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StripeError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Stripe response"
            );
            StripeError::Parse(e)
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.api_base)
    }
}

/// Build a `StripeError` from a non-success response body.
fn api_error(status: reqwest::StatusCode, body: &str) -> StripeError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let code = envelope.as_ref().and_then(|e| e.error.code.clone());
    let message = envelope
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    if status == reqwest::StatusCode::NOT_FOUND || code.as_deref() == Some("resource_missing") {
        return StripeError::NotFound(message);
    }

    tracing::error!(
        status = %status,
        code = code.as_deref().unwrap_or(""),
        message = %message,
        "Stripe API returned non-success status"
    );
    StripeError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, StripeError> {
        let mut products = Vec::new();
        let mut starting_after: Option<String> = None;

        loop {
            let mut url = format!("{}?active=true&limit={PAGE_LIMIT}", self.url("products"));
            if let Some(cursor) = &starting_after {
                url.push_str("&starting_after=");
                url.push_str(&urlencoding::encode(cursor));
            }

            let page: List<Product> = self.send(self.client.get(&url)).await?;
            debug!(count = page.data.len(), has_more = page.has_more, "Fetched product page");

            starting_after = page.data.last().map(|p| p.id.to_string());
            products.extend(page.data);

            if !page.has_more || starting_after.is_none() {
                break;
            }
        }

        Ok(products)
    }

    #[instrument(skip(self), fields(price_id = %id))]
    async fn retrieve_price(&self, id: &PriceId) -> Result<Price, StripeError> {
        let url = self.url(&format!("prices/{}", urlencoding::encode(id.as_str())));
        self.send(self.client.get(&url)).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, StripeError> {
        let url = self.url(&format!("products/{}", urlencoding::encode(id.as_str())));
        self.send(self.client.get(&url)).await
    }

    #[instrument(skip(self, request), fields(mode = %request.mode, lines = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let url = self.url("checkout/sessions");
        let session: CheckoutSession = self
            .send(self.client.post(&url).form(&request.to_form()))
            .await?;
        debug!(session_id = %session.id, "Created checkout session");
        Ok(session)
    }
}
