//! Period bucketing and canonical reindexing.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use lamoon_sales::{CustomerStatus, Order};

use crate::calendar::{self, Month, WEEK};
use crate::filter::{Filters, PeriodMode};

/// One value on a period axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint<V> {
    pub label: String,
    pub value: V,
}

/// Order count for one (period, customer status) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixPoint {
    pub label: String,
    pub status: CustomerStatus,
    pub orders: u64,
}

/// Explicit, ordered list of period labels.
///
/// Series are always reindexed onto an axis rather than emitted in grouping
/// order, so a chart never reorders its bars as data changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAxis {
    mode: PeriodMode,
    labels: Vec<String>,
}

impl PeriodAxis {
    /// `Mon` .. `Sun`.
    pub fn weekdays() -> Self {
        Self {
            mode: PeriodMode::Daily,
            labels: WEEK.iter().map(|d| calendar::weekday_label(*d).to_string()).collect(),
        }
    }

    /// The given months, in the order given.
    pub fn months(months: &[Month]) -> Self {
        Self {
            mode: PeriodMode::Monthly,
            labels: months.iter().map(|m| m.label().to_string()).collect(),
        }
    }

    /// Distinct dates in chronological order.
    pub fn dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            mode: PeriodMode::Custom,
            labels: dates.into_iter().map(calendar::date_label).collect(),
        }
    }

    /// Axis for the filters' period mode. Custom axes list only the dates
    /// that have orders.
    pub fn for_orders(filters: &Filters, orders: &[&Order]) -> Self {
        match filters.period_mode {
            PeriodMode::Daily => Self::weekdays(),
            PeriodMode::Monthly => Self::months(&filters.months()),
            PeriodMode::Custom => Self::dates(orders.iter().map(|o| o.date())),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Bucket label of `timestamp` under this axis' mode.
    pub fn label_of(&self, timestamp: NaiveDateTime) -> String {
        match self.mode {
            PeriodMode::Daily => calendar::weekday_label(timestamp.weekday()).to_string(),
            PeriodMode::Monthly => Month::of(timestamp.date()).label().to_string(),
            PeriodMode::Custom => calendar::date_label(timestamp.date()),
        }
    }

    /// Lay `values` out along the axis, filling absent labels with the
    /// default value. Labels not on the axis are dropped.
    pub fn reindex<V: Copy + Default>(&self, values: &HashMap<String, V>) -> Vec<SeriesPoint<V>> {
        self.labels
            .iter()
            .map(|label| SeriesPoint {
                label: label.clone(),
                value: values.get(label).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Sum `value` per bucket, then reindex.
    pub fn series<V, F>(&self, orders: &[&Order], value: F) -> Vec<SeriesPoint<V>>
    where
        V: Copy + Default + core::ops::AddAssign,
        F: Fn(&Order) -> V,
    {
        let mut totals: HashMap<String, V> = HashMap::new();
        for order in orders {
            *totals.entry(self.label_of(order.timestamp)).or_default() += value(order);
        }
        self.reindex(&totals)
    }

    /// Order counts for every (label, status) pair on the axis.
    pub fn customer_mix(&self, orders: &[&Order]) -> Vec<MixPoint> {
        let mut counts: HashMap<(String, CustomerStatus), u64> = HashMap::new();
        for order in orders {
            *counts
                .entry((self.label_of(order.timestamp), order.customer_status))
                .or_default() += 1;
        }
        self.labels
            .iter()
            .flat_map(|label| {
                CustomerStatus::ALL.into_iter().map(|status| MixPoint {
                    label: label.clone(),
                    status,
                    orders: counts.get(&(label.clone(), status)).copied().unwrap_or(0),
                })
            })
            .collect()
    }
}
