//! Dashboard configuration.
//!
//! Serializable so deployments can describe the data file, chart set and
//! export settings in one JSON document. Every field has a default.

use crate::charts::{seismic_chart_specs, ChartRegistry, ChartSpec};
use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable the binaries read a config path from.
pub const CONFIG_ENV: &str = "QUAKE_DASHBOARD_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    /// Image size used when a chart leaves its width or height unset.
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("charts"),
            formats: vec![ExportFormat::Json, ExportFormat::Svg],
            width: 900,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Charts to register; empty means the seismic dashboard set.
    pub charts: Vec<ChartSpec>,
    pub export: ExportConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("quakes-cleaned.csv"),
            charts: Vec::new(),
            export: ExportConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> DashboardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> DashboardResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Config from `path` if given, else from [`CONFIG_ENV`], else defaults.
    pub fn resolve(path: Option<&Path>) -> DashboardResult<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => Self::from_json_file(Path::new(&p)),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.export.formats.is_empty() {
            return Err(DashboardError::Config(
                "export.formats must name at least one format".to_string(),
            ));
        }
        if self.export.width == 0 || self.export.height == 0 {
            return Err(DashboardError::Config(
                "export.width and export.height must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn chart_specs(&self) -> Vec<ChartSpec> {
        if self.charts.is_empty() {
            seismic_chart_specs()
        } else {
            self.charts.clone()
        }
    }

    pub fn build_registry(&self) -> DashboardResult<ChartRegistry> {
        let mut registry = ChartRegistry::new();
        for spec in self.chart_specs() {
            registry.register(spec)?;
        }
        Ok(registry)
    }
}
