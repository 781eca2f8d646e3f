//! Tidepool Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront binary and its
//! tests:
//! - identifiers for the payment provider's prices and products
//! - money amounts in minor currency units
//! - the visitor's cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session handling. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype identifiers, money, and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
