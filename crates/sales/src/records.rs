use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use lamoon_catalog::Category;
use lamoon_core::{Channel, OrderId, index_by_id};

use crate::order::{Order, OrderItem};

/// The flat order and order-item record sets.
///
/// Built once, then only read. Every accessor hands out shared borrows, so
/// one `RecordSet` (typically behind an `Arc`) can serve any number of
/// concurrent aggregation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordSetParts")]
pub struct RecordSet {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    /// Catalog base names shared by more than one category.
    ambiguous_base_names: BTreeSet<String>,
    #[serde(skip)]
    order_index: HashMap<OrderId, usize>,
}

#[derive(Deserialize)]
struct RecordSetParts {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    #[serde(default)]
    ambiguous_base_names: BTreeSet<String>,
}

impl From<RecordSetParts> for RecordSet {
    fn from(parts: RecordSetParts) -> Self {
        RecordSet::new(parts.orders, parts.items).with_ambiguous_base_names(parts.ambiguous_base_names)
    }
}

impl RecordSet {
    pub fn new(orders: Vec<Order>, items: Vec<OrderItem>) -> Self {
        let order_index = index_by_id(&orders);
        Self {
            orders,
            items,
            ambiguous_base_names: BTreeSet::new(),
            order_index,
        }
    }

    /// Attach the catalog's shared base names (see
    /// `Catalog::ambiguous_base_names`), so product keys do not depend on
    /// which items happened to be drawn.
    pub fn with_ambiguous_base_names(mut self, names: BTreeSet<String>) -> Self {
        self.ambiguous_base_names = names;
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.order_index.get(order_id).map(|&i| &self.orders[i])
    }

    pub fn items_of<'a>(&'a self, order_id: &'a OrderId) -> impl Iterator<Item = &'a OrderItem> + 'a {
        self.items.iter().filter(move |i| &i.order_id == order_id)
    }

    /// Earliest and latest order date.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.orders.iter().map(Order::date).min()?;
        let max = self.orders.iter().map(Order::date).max()?;
        Some((min, max))
    }

    /// Channels present in the orders, alphabetically.
    pub fn channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.orders.iter().map(|o| o.channel).collect();
        channels.sort_by_key(|c| c.as_str());
        channels.dedup();
        channels
    }

    /// Dominant categories present in the orders, alphabetically.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> =
            self.orders.iter().map(|o| o.dominant_category).collect();
        categories.sort_by_key(|c| c.as_str());
        categories.dedup();
        categories
    }

    /// Calendar years covered by the orders, ascending.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.orders.iter().map(|o| o.date().year()).collect();
        set.into_iter().collect()
    }

    /// Base names reported with a category prefix.
    pub fn ambiguous_base_names(&self) -> &BTreeSet<String> {
        &self.ambiguous_base_names
    }
}
