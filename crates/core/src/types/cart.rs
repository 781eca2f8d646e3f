//! The visitor's cart.
//!
//! A cart is an ordered list of price identifiers. There is no quantity
//! field: adding the same price twice stores it twice, and each entry
//! becomes one checkout line item with quantity 1.

use serde::{Deserialize, Serialize};

use crate::types::id::PriceId;

/// Ordered sequence of price identifiers awaiting checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<PriceId>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a price identifier.
    pub fn add(&mut self, price_id: PriceId) {
        self.items.push(price_id);
    }

    /// Remove the first entry matching `price_id`.
    ///
    /// Returns `true` if an entry was removed. Later duplicates are kept.
    pub fn remove_first(&mut self, price_id: &PriceId) -> bool {
        match self.items.iter().position(|item| item == price_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove one entry for each identifier in `entries`.
    ///
    /// Entries not listed, including duplicates beyond the listed count,
    /// are kept in order.
    pub fn remove_entries(&mut self, entries: &[PriceId]) {
        for price_id in entries {
            self.remove_first(price_id);
        }
    }

    /// Stored identifiers in insertion order.
    #[must_use]
    pub fn items(&self) -> &[PriceId] {
        &self.items
    }

    /// Number of stored entries, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<PriceId> for Cart {
    fn from_iter<I: IntoIterator<Item = PriceId>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
