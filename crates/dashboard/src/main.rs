use std::io::Write;

use anyhow::Context;

use lamoon_dashboard::{DashboardConfig, build_view};

fn main() -> anyhow::Result<()> {
    lamoon_observability::init();

    let config = DashboardConfig::from_env().context("reading dashboard configuration")?;
    let view = build_view(&config)?;

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &view).context("writing dashboard view")?;
    writeln!(out).context("writing dashboard view")?;
    Ok(())
}
