//! KPI scalars and their display strings.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use lamoon_core::Money;
use lamoon_sales::{CustomerStatus, Order};

/// Headline numbers over a filtered order set.
///
/// Every field is `None` only in the no-data view; an empty but valid
/// selection yields zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: Option<Money>,
    pub order_count: Option<u64>,
    /// Mean of the per-calendar-month (sales / orders) ratios.
    pub average_order_value: Option<Money>,
    pub new_customers: Option<u64>,
    /// Percentage of orders placed by new customers, 0..=100.
    pub new_customer_share: Option<f64>,
}

impl Kpis {
    pub fn not_applicable() -> Self {
        Self {
            total_sales: None,
            order_count: None,
            average_order_value: None,
            new_customers: None,
            new_customer_share: None,
        }
    }

    pub fn compute(orders: &[&Order]) -> Self {
        let total_sales: Money = orders.iter().map(|o| o.sales).sum();
        let order_count = orders.len() as u64;
        let new_customers = orders
            .iter()
            .filter(|o| o.customer_status == CustomerStatus::New)
            .count() as u64;
        let new_customer_share = if order_count == 0 {
            0.0
        } else {
            new_customers as f64 * 100.0 / order_count as f64
        };

        Self {
            total_sales: Some(total_sales),
            order_count: Some(order_count),
            average_order_value: Some(monthly_average_order_value(orders)),
            new_customers: Some(new_customers),
            new_customer_share: Some(new_customer_share),
        }
    }
}

/// Average of each (year, month)'s own order value, not total / count.
fn monthly_average_order_value(orders: &[&Order]) -> Money {
    let mut months: BTreeMap<(i32, u32), (u64, u64)> = BTreeMap::new();
    for order in orders {
        let date = order.date();
        let (sales, count) = months.entry((date.year(), date.month())).or_default();
        *sales += order.sales.minor();
        *count += 1;
    }
    if months.is_empty() {
        return Money::ZERO;
    }
    let ratios: f64 = months
        .values()
        .map(|(sales, count)| *sales as f64 / *count as f64)
        .sum();
    Money::from_minor((ratios / months.len() as f64).round() as u64)
}

/// KPI values rendered for display cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCards {
    pub total_sales: String,
    pub order_count: String,
    pub average_order_value: String,
    pub new_customers: String,
}

const NOT_APPLICABLE: &str = "N/A";

impl From<&Kpis> for KpiCards {
    fn from(kpis: &Kpis) -> Self {
        let new_customers = match (kpis.new_customers, kpis.new_customer_share) {
            (Some(count), Some(share)) => format!("{} ({share:.0}%)", thousands(count)),
            _ => NOT_APPLICABLE.to_string(),
        };
        Self {
            total_sales: kpis.total_sales.map_or_else(|| NOT_APPLICABLE.to_string(), thb),
            order_count: kpis
                .order_count
                .map_or_else(|| NOT_APPLICABLE.to_string(), thousands),
            average_order_value: kpis
                .average_order_value
                .map_or_else(|| NOT_APPLICABLE.to_string(), thb),
            new_customers,
        }
    }
}

/// Whole baht, half-up, with thousands separators.
fn thb(amount: Money) -> String {
    format!("THB {}", thousands((amount.minor() + 50) / 100))
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
