//! Quake Dashboard - seismic event charts in a desktop window.
//!
//! Usage: `quake_dashboard [config.json]` (or set `QUAKE_DASHBOARD_CONFIG`).

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use quake_dashboard::gui::DashboardApp;
use quake_dashboard::telemetry::init_default_tracing;
use quake_dashboard::DashboardConfig;
use std::path::PathBuf;

fn main() -> Result<()> {
    let _ = init_default_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        DashboardConfig::resolve(config_path.as_deref()).context("loading dashboard config")?;
    let registry = config.build_registry().context("registering charts")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Quake Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Quake Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, registry)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
