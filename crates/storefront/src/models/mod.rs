//! Domain models for storefront.
//!
//! Catalog and cart types live in `tidepool-core` and the Stripe module;
//! this module holds what the storefront keeps in the visitor's session.

pub mod session;

