//! Aggregation pipeline.
//!
//! Filters the order and order-item records by date, channel and category,
//! buckets them into periods with a fixed canonical ordering, and computes
//! the KPIs and grouped series a dashboard renders.
//!
//! Every function here is a pure read over a [`RecordSet`]: no shared state
//! is written, so requests can run concurrently against one record set.
//!
//! [`RecordSet`]: lamoon_sales::RecordSet

pub mod breakdown;
pub mod calendar;
pub mod comparison;
pub mod filter;
pub mod kpi;
pub mod period;
pub mod pipeline;
pub mod rollup;

pub use breakdown::{BreakdownRow, category_series, channel_series};
pub use calendar::Month;
pub use comparison::{CategoryMonthRow, CustomerMonthRow, MonthlyComparisons};
pub use filter::{Filters, PeriodMode};
pub use kpi::{KpiCards, Kpis};
pub use period::{MixPoint, PeriodAxis, SeriesPoint};
pub use pipeline::{DashboardView, aggregate};
pub use rollup::{ProductRollup, ProductRollups, TOP_N};
