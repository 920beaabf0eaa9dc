//! Month-by-month comparison tables.
//!
//! Both tables are dense: every (month, key) combination on the axes has a
//! row, zero when nothing was sold.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lamoon_catalog::Category;
use lamoon_core::Money;
use lamoon_sales::{CustomerStatus, Order, OrderItem};

use crate::calendar::Month;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerMonthRow {
    pub month: Month,
    pub status: CustomerStatus,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMonthRow {
    pub month: Month,
    pub category: Category,
    pub sales: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyComparisons {
    pub customers: Vec<CustomerMonthRow>,
    pub categories: Vec<CategoryMonthRow>,
}

impl MonthlyComparisons {
    /// `items` must be paired with the order they belong to.
    pub fn compute(months: &[Month], orders: &[&Order], items: &[(&Order, &OrderItem)]) -> Self {
        let mut order_counts: HashMap<(Month, CustomerStatus), u64> = HashMap::new();
        for order in orders {
            *order_counts
                .entry((Month::of(order.date()), order.customer_status))
                .or_default() += 1;
        }

        let mut item_sales: HashMap<(Month, Category), Money> = HashMap::new();
        for (order, item) in items {
            *item_sales
                .entry((Month::of(order.date()), item.category))
                .or_default() += item.item_sales;
        }

        let customers = months
            .iter()
            .flat_map(|&month| {
                CustomerStatus::ALL.into_iter().map(move |status| (month, status))
            })
            .map(|(month, status)| CustomerMonthRow {
                month,
                status,
                orders: order_counts.get(&(month, status)).copied().unwrap_or(0),
            })
            .collect();

        let categories = months
            .iter()
            .flat_map(|&month| Category::ALL.into_iter().map(move |category| (month, category)))
            .map(|(month, category)| CategoryMonthRow {
                month,
                category,
                sales: item_sales.get(&(month, category)).copied().unwrap_or_default(),
            })
            .collect();

        Self {
            customers,
            categories,
        }
    }
}
