use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lamoon_core::{Money, ProductId};

/// One product line of a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketEntry {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: u32,
    /// Always `unit_price × quantity`; re-derived on every quantity change.
    pub item_sales: Money,
}

/// Basket keyed by product id: at most one entry per product.
///
/// Adding an already-present product merges into its entry; decrementing to
/// zero removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    entries: BTreeMap<ProductId, BasketEntry>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product_id` at `unit_price`.
    ///
    /// A merge keeps the unit price recorded on the existing entry.
    pub fn add(&mut self, product_id: ProductId, unit_price: Money, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self
            .entries
            .entry(product_id.clone())
            .or_insert_with(|| BasketEntry {
                product_id,
                unit_price,
                quantity: 0,
                item_sales: Money::ZERO,
            });
        entry.quantity += quantity;
        entry.item_sales = entry.unit_price.times(entry.quantity);
    }

    /// Remove one unit of `product_id`. Returns `false` if it was absent.
    pub fn decrement(&mut self, product_id: &ProductId) -> bool {
        let Some(entry) = self.entries.get_mut(product_id) else {
            return false;
        };
        entry.quantity -= 1;
        if entry.quantity == 0 {
            self.entries.remove(product_id);
        } else {
            entry.item_sales = entry.unit_price.times(entry.quantity);
        }
        true
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Option<BasketEntry> {
        self.entries.remove(product_id)
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&BasketEntry> {
        self.entries.get(product_id)
    }

    pub fn quantity(&self, product_id: &ProductId) -> u32 {
        self.entries.get(product_id).map_or(0, |e| e.quantity)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.contains_key(product_id)
    }

    pub fn total_units(&self) -> u32 {
        self.entries.values().map(|e| e.quantity).sum()
    }

    pub fn total_sales(&self) -> Money {
        self.entries.values().map(|e| e.item_sales).sum()
    }

    /// Entries in product-id order.
    pub fn iter(&self) -> impl Iterator<Item = &BasketEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
