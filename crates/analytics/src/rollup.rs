//! Product-level rollups.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use lamoon_core::Money;
use lamoon_sales::OrderItem;

/// Rows kept in each top list.
pub const TOP_N: usize = 8;

/// Reporting key of an item: its base name, so size variants and bundles
/// collapse together. Base names shared across categories get the category
/// as a prefix (`Skincare Silk Mist`).
pub fn product_key(item: &OrderItem, ambiguous: &BTreeSet<String>) -> String {
    if ambiguous.contains(&item.base_name) {
        format!("{} {}", item.category, item.base_name)
    } else {
        item.base_name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRollup {
    pub key: String,
    pub sales: Money,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRollups {
    pub top_by_sales: Vec<ProductRollup>,
    pub top_by_quantity: Vec<ProductRollup>,
}

impl ProductRollups {
    pub fn compute(items: &[&OrderItem], ambiguous: &BTreeSet<String>) -> Self {
        let mut totals: HashMap<String, (Money, u64)> = HashMap::new();
        for item in items {
            let (sales, quantity) = totals.entry(product_key(item, ambiguous)).or_default();
            *sales += item.item_sales;
            *quantity += u64::from(item.quantity);
        }
        let rows: Vec<ProductRollup> = totals
            .into_iter()
            .map(|(key, (sales, quantity))| ProductRollup { key, sales, quantity })
            .collect();

        let mut top_by_sales = rows.clone();
        top_by_sales.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.key.cmp(&b.key)));
        top_by_sales.truncate(TOP_N);

        let mut top_by_quantity = rows;
        top_by_quantity
            .sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.key.cmp(&b.key)));
        top_by_quantity.truncate(TOP_N);

        Self {
            top_by_sales,
            top_by_quantity,
        }
    }
}
