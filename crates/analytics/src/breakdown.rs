use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use lamoon_catalog::Category;
use lamoon_core::{Channel, Money};
use lamoon_sales::Order;

/// Sales for one channel or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow<K> {
    pub key: K,
    pub sales: Money,
}

/// Sales per channel, largest first.
pub fn channel_series(orders: &[&Order]) -> Vec<BreakdownRow<Channel>> {
    breakdown(orders, |o| o.channel)
}

/// Sales per dominant category, largest first.
pub fn category_series(orders: &[&Order]) -> Vec<BreakdownRow<Category>> {
    breakdown(orders, |o| o.dominant_category)
}

/// Only keys that have orders appear; ties are ordered by key.
fn breakdown<K, F>(orders: &[&Order], key_of: F) -> Vec<BreakdownRow<K>>
where
    K: Copy + Ord + Hash,
    F: Fn(&Order) -> K,
{
    let mut totals: HashMap<K, Money> = HashMap::new();
    for order in orders {
        *totals.entry(key_of(order)).or_default() += order.sales;
    }
    let mut rows: Vec<BreakdownRow<K>> = totals
        .into_iter()
        .map(|(key, sales)| BreakdownRow { key, sales })
        .collect();
    rows.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.key.cmp(&b.key)));
    rows
}
