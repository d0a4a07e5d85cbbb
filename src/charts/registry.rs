//! Chart Registry Module
//! Named chart specs rendered on demand against a shared dataset.

use crate::charts::render::render_chart;
use crate::charts::{ChartArtifact, ChartSpec};
use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Zero-argument producer of one chart, bound to its spec and dataset.
pub type ChartOutput = Box<dyn Fn() -> DashboardResult<ChartArtifact> + Send + Sync>;

/// Registered chart specs, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    charts: IndexMap<String, ChartSpec>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spec. The registry is left unchanged on error.
    pub fn register(&mut self, spec: ChartSpec) -> DashboardResult<()> {
        if self.charts.contains_key(&spec.id) {
            warn!(chart = %spec.id, "duplicate chart id");
            return Err(DashboardError::DuplicateId(spec.id));
        }
        if let Err(err) = spec.validate() {
            warn!(chart = %spec.id, error = %err, "rejected chart spec");
            return Err(err);
        }

        debug!(chart = %spec.id, kind = spec.kind.as_str(), "registered chart");
        self.charts.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn specs(&self) -> impl Iterator<Item = &ChartSpec> {
        self.charts.values()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn render(&self, id: &str, dataset: &Dataset) -> DashboardResult<ChartArtifact> {
        let spec = self
            .charts
            .get(id)
            .ok_or_else(|| DashboardError::UnknownChart(id.to_string()))?;
        render_chart(spec, dataset)
    }

    /// Render every chart in parallel. Results keep registration order.
    pub fn render_all(&self, dataset: &Dataset) -> Vec<(String, DashboardResult<ChartArtifact>)> {
        let specs: Vec<&ChartSpec> = self.charts.values().collect();
        specs
            .par_iter()
            .map(|spec| (spec.id.clone(), render_chart(spec, dataset)))
            .collect()
    }

    /// One producer closure per chart id, for shells that pull outputs lazily.
    pub fn outputs(&self, dataset: Arc<Dataset>) -> IndexMap<String, ChartOutput> {
        self.charts
            .iter()
            .map(|(id, spec)| {
                let spec = spec.clone();
                let dataset = Arc::clone(&dataset);
                let output: ChartOutput = Box::new(move || render_chart(&spec, &dataset));
                (id.clone(), output)
            })
            .collect()
    }
}
