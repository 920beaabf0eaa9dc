//! Environment configuration for the dashboard binary.

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use chrono::{Datelike, NaiveDate};

use lamoon_analytics::{Filters, Month, PeriodMode};
use lamoon_catalog::Category;
use lamoon_core::Channel;
use lamoon_sales::{RecordSet, SynthesisConfig};

pub const SEED_ENV: &str = "LAMOON_SEED";
pub const ORDER_COUNT_ENV: &str = "LAMOON_ORDER_COUNT";
pub const REFERENCE_DATE_ENV: &str = "LAMOON_REFERENCE_DATE";
pub const PERIOD_ENV: &str = "LAMOON_PERIOD";
pub const WEEK_OFFSET_ENV: &str = "LAMOON_WEEK_OFFSET";
pub const YEAR_ENV: &str = "LAMOON_YEAR";
pub const MONTHS_ENV: &str = "LAMOON_MONTHS";
pub const START_DATE_ENV: &str = "LAMOON_START_DATE";
pub const END_DATE_ENV: &str = "LAMOON_END_DATE";
pub const CHANNELS_ENV: &str = "LAMOON_CHANNELS";
pub const CATEGORIES_ENV: &str = "LAMOON_CATEGORIES";

pub const DEFAULT_SEED: u64 = 7;
pub const DEFAULT_ORDER_COUNT: usize = 50;

/// Which window to aggregate. Unset bounds are resolved against the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRequest {
    /// Latest Monday..Sunday week of the data, `week_offset` weeks back.
    Daily { week_offset: u32 },
    /// One calendar year; `None` year means the reference date's year.
    Monthly {
        year: Option<i32>,
        months: Option<BTreeSet<Month>>,
    },
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub seed: u64,
    pub order_count: usize,
    pub reference_date: NaiveDate,
    pub period: PeriodRequest,
    /// `None` keeps every channel; an empty set selects nothing.
    pub channels: Option<BTreeSet<Channel>>,
    pub categories: Option<BTreeSet<Category>>,
}

impl DashboardConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(
            |key| std::env::var(key).ok(),
            chrono::Local::now().date_naive(),
        )
    }

    pub fn from_env_with<F>(mut getter: F, today: NaiveDate) -> anyhow::Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let seed = or_default(parsed(&mut getter, SEED_ENV)?, SEED_ENV, DEFAULT_SEED);
        let order_count = or_default(
            parsed(&mut getter, ORDER_COUNT_ENV)?,
            ORDER_COUNT_ENV,
            DEFAULT_ORDER_COUNT,
        );
        let reference_date = or_default(parsed(&mut getter, REFERENCE_DATE_ENV)?, REFERENCE_DATE_ENV, today);

        let mode = or_default(parsed(&mut getter, PERIOD_ENV)?, PERIOD_ENV, PeriodMode::Daily);
        let period = match mode {
            PeriodMode::Daily => PeriodRequest::Daily {
                week_offset: or_default(parsed(&mut getter, WEEK_OFFSET_ENV)?, WEEK_OFFSET_ENV, 0),
            },
            PeriodMode::Monthly => PeriodRequest::Monthly {
                year: parsed(&mut getter, YEAR_ENV)?,
                months: listed(&mut getter, MONTHS_ENV)?,
            },
            PeriodMode::Custom => PeriodRequest::Custom {
                start: parsed(&mut getter, START_DATE_ENV)?,
                end: parsed(&mut getter, END_DATE_ENV)?,
            },
        };

        Ok(Self {
            seed,
            order_count,
            reference_date,
            period,
            channels: listed(&mut getter, CHANNELS_ENV)?,
            categories: listed(&mut getter, CATEGORIES_ENV)?,
        })
    }

    pub fn synthesis(&self) -> SynthesisConfig {
        SynthesisConfig::new(self.order_count, self.seed, self.reference_date)
    }

    /// Resolve the requested window against the synthesized records.
    pub fn filters(&self, records: &RecordSet) -> anyhow::Result<Filters> {
        let bounds = records.date_bounds();
        if bounds.is_none() {
            tracing::warn!("no orders synthesized; windows default to the reference date");
        }
        let (first, latest) = bounds.unwrap_or((self.reference_date, self.reference_date));

        let filters = match &self.period {
            PeriodRequest::Daily { week_offset } => {
                Filters::latest_week(latest, *week_offset, self.reference_date)
            }
            PeriodRequest::Monthly { year, months } => {
                let year = year.unwrap_or(self.reference_date.year());
                Filters::calendar_year(year, months.clone(), self.reference_date)
                    .ok_or_else(|| anyhow!("{YEAR_ENV}={year} is outside the supported range"))?
            }
            PeriodRequest::Custom { start, end } => {
                let start = start.unwrap_or(first);
                let end = end.unwrap_or(latest);
                if start > end {
                    bail!("{START_DATE_ENV} {start} is after {END_DATE_ENV} {end}");
                }
                Filters::custom(start, end, self.reference_date)
            }
        };

        let filters = match &self.channels {
            Some(channels) => filters.with_channels(channels.iter().copied()),
            None => filters,
        };
        Ok(match &self.categories {
            Some(categories) => filters.with_categories(categories.iter().copied()),
            None => filters,
        })
    }
}

/// `value`, or `default` with an info line naming the unset variable.
fn or_default<T: core::fmt::Debug>(value: Option<T>, key: &str, default: T) -> T {
    value.unwrap_or_else(|| {
        tracing::info!(default = ?default, "{key} not set; using default");
        default
    })
}

fn parsed<T, F>(getter: &mut F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: FnMut(&str) -> Option<String>,
{
    let Some(raw) = getter(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<T>()
        .with_context(|| format!("invalid {key}={raw:?}"))?;
    Ok(Some(value))
}

/// Comma-separated list. Set but blank means the empty set.
fn listed<T, F>(getter: &mut F, key: &str) -> anyhow::Result<Option<BTreeSet<T>>>
where
    T: FromStr + Ord,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: FnMut(&str) -> Option<String>,
{
    let Some(raw) = getter(key) else {
        return Ok(None);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>()
                .with_context(|| format!("invalid entry {part:?} in {key}"))
        })
        .collect::<anyhow::Result<BTreeSet<T>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<DashboardConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_env_with(|key| vars.get(key).cloned(), today())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.order_count, DEFAULT_ORDER_COUNT);
        assert_eq!(config.reference_date, today());
        assert_eq!(config.period, PeriodRequest::Daily { week_offset: 0 });
        assert_eq!(config.channels, None);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_defaulted_variable_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || config(&[(SEED_ENV, "3")]).unwrap());

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for key in [ORDER_COUNT_ENV, REFERENCE_DATE_ENV, PERIOD_ENV, WEEK_OFFSET_ENV] {
            assert!(logs.contains(&format!("{key} not set")), "{key} missing from {logs}");
        }
        assert!(!logs.contains(&format!("{SEED_ENV} not set")));
    }

    #[test]
    fn monthly_with_month_list() {
        let config = config(&[
            (PERIOD_ENV, "monthly"),
            (YEAR_ENV, "2025"),
            (MONTHS_ENV, "Mar, jan"),
        ])
        .unwrap();
        let months: BTreeSet<Month> = [Month::Jan, Month::Mar].into_iter().collect();
        assert_eq!(
            config.period,
            PeriodRequest::Monthly {
                year: Some(2025),
                months: Some(months)
            }
        );
    }

    #[test]
    fn blank_channel_list_selects_nothing() {
        let config = config(&[(CHANNELS_ENV, "")]).unwrap();
        assert_eq!(config.channels, Some(BTreeSet::new()));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config(&[(SEED_ENV, "seven")]).unwrap_err();
        assert!(format!("{err:#}").contains(SEED_ENV));

        let err = config(&[(CHANNELS_ENV, "Shopee,Amazon")]).unwrap_err();
        assert!(format!("{err:#}").contains("Amazon"));

        let err = config(&[(REFERENCE_DATE_ENV, "2026-13-01")]).unwrap_err();
        assert!(format!("{err:#}").contains(REFERENCE_DATE_ENV));
    }

    #[test]
    fn custom_window_defaults_to_data_bounds_and_rejects_inverted_ranges() {
        let records = lamoon_sales::synthesize(
            &lamoon_catalog::Catalog::standard(),
            &SynthesisConfig::new(30, 7, today()),
        )
        .unwrap();
        let (first, last) = records.date_bounds().unwrap();

        let filters = config(&[(PERIOD_ENV, "custom")])
            .unwrap()
            .filters(&records)
            .unwrap();
        assert_eq!((filters.start_date, filters.end_date), (first, last));

        let inverted = config(&[
            (PERIOD_ENV, "custom"),
            (START_DATE_ENV, "2026-05-02"),
            (END_DATE_ENV, "2026-05-01"),
        ])
        .unwrap();
        assert!(inverted.filters(&records).is_err());
    }

    #[test]
    fn daily_window_tracks_the_latest_order() {
        let records = RecordSet::new(Vec::new(), Vec::new());
        let filters = config(&[(WEEK_OFFSET_ENV, "1")])
            .unwrap()
            .filters(&records)
            .unwrap();
        // No data: the week before the one holding the reference date.
        assert_eq!(filters.start_date, d(2026, 10, 12));
        assert_eq!(filters.end_date, d(2026, 10, 18));
    }

    #[test]
    fn channel_and_category_lists_reach_the_filters() {
        let records = RecordSet::new(Vec::new(), Vec::new());
        let filters = config(&[(CHANNELS_ENV, "lazada"), (CATEGORIES_ENV, "Haircare")])
            .unwrap()
            .filters(&records)
            .unwrap();
        assert_eq!(filters.channels.into_iter().collect::<Vec<_>>(), vec![Channel::Lazada]);
        assert_eq!(
            filters.categories.into_iter().collect::<Vec<_>>(),
            vec![Category::Haircare]
        );
    }
}
