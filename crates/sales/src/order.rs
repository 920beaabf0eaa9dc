use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use lamoon_catalog::{Catalog, Category};
use lamoon_core::{Channel, DomainError, DomainResult, Entity, Money, OrderId, ProductId};

use crate::basket::Basket;

/// Whether the customer had ordered before.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    New,
    Returning,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 2] = [CustomerStatus::New, CustomerStatus::Returning];

    pub fn as_str(self) -> &'static str {
        match self {
            CustomerStatus::New => "New",
            CustomerStatus::Returning => "Returning",
        }
    }
}

impl core::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header. Immutable once synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub timestamp: NaiveDateTime,
    pub channel: Channel,
    pub customer_status: CustomerStatus,
    /// Sum of the order's item sales after bundle conversion.
    pub sales: Money,
    /// Category with the largest item-sales contribution.
    pub dominant_category: Category,
}

impl Order {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Turn a finished basket into an order header plus its items.
    ///
    /// Product name, base name and category are copied onto each item so the
    /// records can be aggregated without the catalog.
    pub fn from_basket(
        order_id: OrderId,
        timestamp: NaiveDateTime,
        channel: Channel,
        customer_status: CustomerStatus,
        basket: &Basket,
        catalog: &Catalog,
    ) -> DomainResult<(Order, Vec<OrderItem>)> {
        let mut items = Vec::with_capacity(basket.len());
        for entry in basket.iter() {
            let product = catalog.get(&entry.product_id).ok_or_else(|| {
                DomainError::invalid_configuration(format!(
                    "basket references unknown product {}",
                    entry.product_id
                ))
            })?;
            items.push(OrderItem {
                order_id: order_id.clone(),
                product_id: entry.product_id.clone(),
                product_name: product.name().to_string(),
                base_name: product.base_name().to_string(),
                category: product.category(),
                quantity: entry.quantity,
                item_sales: entry.item_sales,
            });
        }

        let dominant_category = dominant_category(&items, &catalog.categories())
            .ok_or_else(|| DomainError::invalid_configuration("order has no items"))?;

        let order = Order {
            order_id,
            timestamp,
            channel,
            customer_status,
            sales: items.iter().map(|i| i.item_sales).sum(),
            dominant_category,
        };
        Ok((order, items))
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.order_id
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub base_name: String,
    pub category: Category,
    pub quantity: u32,
    /// `quantity × unit price` at synthesis time.
    pub item_sales: Money,
}

/// Category with the largest summed item sales.
///
/// Ties go to the category that comes first in `category_order` (catalog
/// iteration order). Returns `None` for an empty item list.
pub fn dominant_category(items: &[OrderItem], category_order: &[Category]) -> Option<Category> {
    let mut totals: HashMap<Category, Money> = HashMap::new();
    for item in items {
        *totals.entry(item.category).or_default() += item.item_sales;
    }

    let mut best: Option<(Category, Money)> = None;
    for category in category_order {
        if let Some(&total) = totals.get(category) {
            if best.is_none_or(|(_, b)| total > b) {
                best = Some((*category, total));
            }
        }
    }
    best.map(|(category, _)| category)
}
