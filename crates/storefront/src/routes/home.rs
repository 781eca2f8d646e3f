//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::session;
use crate::services::catalog::{CatalogItem, list_catalog};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub products: Vec<CatalogItem>,
    pub cart_count: usize,
}

/// Display the catalog with add-to-cart buttons.
///
/// Catalog failures render an empty listing rather than an error page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let products = list_catalog(state.provider()).await;

    HomeTemplate {
        products,
        cart_count: cart_count(&state, &session).await,
    }
}

/// Number of entries in the visitor's cart, for the header badge.
///
/// Falls back to zero; the badge is never worth failing a page over.
pub(crate) async fn cart_count(state: &AppState, session: &Session) -> usize {
    let key = match session::cart_key(session).await {
        Ok(Some(key)) => key,
        Ok(None) => return 0,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart key from session");
            return 0;
        }
    };

    match state.carts().load(&key).await {
        Ok(cart) => cart.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart for badge");
            0
        }
    }
}
