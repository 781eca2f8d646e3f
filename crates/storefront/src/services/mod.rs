//! Business logic services for storefront.
//!
//! Services sit between the route handlers and the two seams of the
//! application: the [`PaymentProvider`](crate::stripe::PaymentProvider) and
//! the [`CartStore`](crate::cart_store::CartStore). They take those as trait
//! objects so they can be exercised without HTTP or network access.
//!
//! # Services
//!
//! - `catalog` - Product listing resolved against the provider
//! - `cart` - Cart contents resolved to names, unit prices, and a total
//! - `checkout` - Cart to hosted checkout session handoff
//!
//! Remote failures are logged and degraded here (empty listing, skipped
//! lines, error string); they are never surfaced as structured errors.

pub mod cart;
pub mod catalog;
pub mod checkout;
