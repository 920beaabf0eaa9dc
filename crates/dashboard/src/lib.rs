//! Headless dashboard: synthesize the order records once, run one
//! aggregation request and hand back the resulting view.

pub mod config;

use anyhow::Context;

use lamoon_analytics::{DashboardView, aggregate};
use lamoon_catalog::Catalog;
use lamoon_sales::synthesize;

pub use config::{DashboardConfig, PeriodRequest};

pub fn build_view(config: &DashboardConfig) -> anyhow::Result<DashboardView> {
    let catalog = Catalog::standard();
    let records = synthesize(&catalog, &config.synthesis()).context("synthesizing order records")?;
    let filters = config.filters(&records)?;

    tracing::info!(
        seed = config.seed,
        orders = records.orders().len(),
        period = ?filters.period_mode,
        start = %filters.start_date,
        end = %filters.end_date,
        "aggregating dashboard view"
    );
    Ok(aggregate(&records, &filters))
}
