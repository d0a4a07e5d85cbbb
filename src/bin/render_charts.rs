//! Headless dashboard: load the dataset, render every chart, write the files.
//!
//! Usage: `render_charts [config.json]` (or set `QUAKE_DASHBOARD_CONFIG`).

use anyhow::{bail, Context, Result};
use quake_dashboard::charts::StaticChartRenderer;
use quake_dashboard::telemetry::init_default_tracing;
use quake_dashboard::{DashboardConfig, DataLoader, DatasetPreparer};
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> Result<()> {
    let _ = init_default_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        DashboardConfig::resolve(config_path.as_deref()).context("loading dashboard config")?;

    let raw = DataLoader::read_csv(&config.data_path)
        .with_context(|| format!("reading {}", config.data_path.display()))?;
    let dataset = DatasetPreparer::prepare(&raw).context("preparing dataset")?;
    let registry = config.build_registry().context("registering charts")?;

    let mut artifacts = Vec::with_capacity(registry.len());
    let mut failures = 0usize;
    for (id, result) in registry.render_all(&dataset) {
        match result {
            Ok(artifact) => artifacts.push(artifact),
            Err(e) => {
                error!(chart = %id, error = %e, "render failed");
                failures += 1;
            }
        }
    }

    let written = StaticChartRenderer::export_artifacts(&artifacts, &config.export)
        .context("exporting charts")?;
    info!(charts = artifacts.len(), files = written.len(), "done");

    if failures > 0 {
        bail!("{failures} chart(s) failed to render");
    }
    Ok(())
}
