use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use lamoon_catalog::Category;
use lamoon_core::Channel;
use lamoon_sales::Order;

use crate::calendar::Month;

/// How orders are bucketed into periods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    /// Day-of-week buckets, Mon..Sun.
    Daily,
    /// Month buckets, Jan..Dec (or the selected months).
    Monthly,
    /// One bucket per calendar date that has data.
    Custom,
}

impl core::str::FromStr for PeriodMode {
    type Err = lamoon_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PeriodMode::Daily),
            "monthly" => Ok(PeriodMode::Monthly),
            "custom" => Ok(PeriodMode::Custom),
            _ => Err(lamoon_core::DomainError::invalid_id(format!("PeriodMode: {s:?}"))),
        }
    }
}

/// One aggregation request.
///
/// Date bounds are inclusive calendar dates. An empty `channels` or
/// `categories` set selects nothing; it does not fall back to "all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_mode: PeriodMode,
    pub channels: BTreeSet<Channel>,
    pub categories: BTreeSet<Category>,
    /// Monthly mode only; `None` or an empty set means all twelve months.
    pub selected_months: Option<BTreeSet<Month>>,
    /// "Today" for the reference KPI cards (previous calendar month).
    pub reference_date: NaiveDate,
}

impl Filters {
    /// Explicit date range, all channels and categories.
    pub fn custom(start_date: NaiveDate, end_date: NaiveDate, reference_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            period_mode: PeriodMode::Custom,
            channels: Channel::ALL.into_iter().collect(),
            categories: Category::ALL.into_iter().collect(),
            selected_months: None,
            reference_date,
        }
    }

    /// Monday-to-Sunday week containing `latest`, moved back `week_offset` weeks.
    pub fn latest_week(latest: NaiveDate, week_offset: u32, reference_date: NaiveDate) -> Self {
        let monday = latest - Duration::days(i64::from(latest.weekday().num_days_from_monday()));
        let start = monday - Duration::weeks(i64::from(week_offset));
        let end = start + Duration::days(6);
        Self {
            period_mode: PeriodMode::Daily,
            ..Self::custom(start, end, reference_date)
        }
    }

    /// January 1st to December 31st of `year`, optionally limited to `months`.
    ///
    /// `None` when `year` is outside the supported calendar range.
    pub fn calendar_year(
        year: i32,
        months: Option<BTreeSet<Month>>,
        reference_date: NaiveDate,
    ) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self {
            period_mode: PeriodMode::Monthly,
            selected_months: months,
            ..Self::custom(start, end, reference_date)
        })
    }

    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Whether the channel or category selection is empty.
    pub fn selects_nothing(&self) -> bool {
        self.channels.is_empty() || self.categories.is_empty()
    }

    /// Canonical month list: the selected months in calendar order (monthly
    /// mode with a non-empty selection), otherwise Jan..Dec.
    pub fn months(&self) -> Vec<Month> {
        match (&self.period_mode, &self.selected_months) {
            (PeriodMode::Monthly, Some(selected)) if !selected.is_empty() => {
                Month::ALL.into_iter().filter(|m| selected.contains(m)).collect()
            }
            _ => Month::ALL.to_vec(),
        }
    }

    /// Channel and category membership only (dates ignored).
    pub(crate) fn admits_segment(&self, order: &Order) -> bool {
        self.channels.contains(&order.channel) && self.categories.contains(&order.dominant_category)
    }

    /// Full membership test for one order.
    pub fn admits(&self, order: &Order) -> bool {
        let date = order.date();
        if date < self.start_date || date > self.end_date || !self.admits_segment(order) {
            return false;
        }
        match (&self.period_mode, &self.selected_months) {
            (PeriodMode::Monthly, Some(selected)) if !selected.is_empty() => {
                selected.contains(&Month::of(date))
            }
            _ => true,
        }
    }
}
