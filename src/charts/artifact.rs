//! Rendered figures handed to UI shells and exporters.

use crate::charts::{BarMode, ChartKind, Color, LegendOptions};
use crate::stats::{BoxSummary, HistogramBin};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    pub title: Option<String>,
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoScope {
    World,
}

/// Map projection settings of a geographic chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    pub scope: GeoScope,
    pub lat_range: [f64; 2],
    pub lon_range: [f64; 2],
    pub resolution: u32,
    pub show_land: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub bar_mode: Option<BarMode>,
    pub legend: LegendOptions,
    pub geo: Option<GeoLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub color: Color,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    pub color: Color,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramTrace {
    pub name: String,
    pub color: Color,
    pub opacity: f32,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
    /// Column name and value pairs shown on hover.
    pub hover: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoTrace {
    pub name: String,
    pub color: Color,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Bar(BarTrace),
    Box(BoxTrace),
    Histogram(HistogramTrace),
    Pie(PieTrace),
    ScatterGeo(GeoTrace),
}

impl Trace {
    /// Number of drawn marks: bars, boxed values, binned values, slices or points.
    pub fn point_count(&self) -> usize {
        match self {
            Trace::Bar(t) => t.x.len(),
            Trace::Box(t) => t.summary.count,
            Trace::Histogram(t) => t.bins.iter().map(|b| b.count).sum(),
            Trace::Pie(t) => t.slices.len(),
            Trace::ScatterGeo(t) => t.points.len(),
        }
    }
}

/// Immutable rendered chart: one spec applied to one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    chart_id: String,
    kind: ChartKind,
    record_count: usize,
    layout: Layout,
    traces: Vec<Trace>,
}

impl ChartArtifact {
    pub(crate) fn new(
        chart_id: &str,
        kind: ChartKind,
        record_count: usize,
        layout: Layout,
        traces: Vec<Trace>,
    ) -> Self {
        Self {
            chart_id: chart_id.to_string(),
            kind,
            record_count,
            layout,
            traces,
        }
    }

    pub fn chart_id(&self) -> &str {
        &self.chart_id
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Rows of the dataset the artifact was rendered from.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn point_count(&self) -> usize {
        self.traces.iter().map(Trace::point_count).sum()
    }

    /// Bar heights summed per category across traces.
    pub fn bar_counts(&self) -> IndexMap<String, f64> {
        let mut counts: IndexMap<String, f64> = IndexMap::new();
        for trace in &self.traces {
            if let Trace::Bar(bar) = trace {
                for (x, y) in bar.x.iter().zip(bar.y.iter()) {
                    *counts.entry(x.clone()).or_insert(0.0) += y;
                }
            }
        }
        counts
    }

    pub fn pie_slices(&self) -> &[PieSlice] {
        self.traces
            .iter()
            .find_map(|t| match t {
                Trace::Pie(pie) => Some(pie.slices.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
