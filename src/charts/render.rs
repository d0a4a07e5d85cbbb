//! Per-kind rendering of a [`ChartSpec`] against a [`Dataset`].

use crate::charts::artifact::{
    Axis, BarTrace, BoxTrace, GeoLayout, GeoPoint, GeoScope, GeoTrace, HistogramTrace, Layout,
    PieSlice, PieTrace, Trace,
};
use crate::charts::{ChartArtifact, ChartKind, ChartSpec, HoverData};
use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::stats::StatsCalculator;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Opacity of overlaid histogram series when the spec does not set one.
pub const DEFAULT_HISTOGRAM_OPACITY: f32 = 0.7;
pub const DEFAULT_LAT_RANGE: [f64; 2] = [-90.0, 90.0];
pub const DEFAULT_LON_RANGE: [f64; 2] = [-180.0, 180.0];
pub const DEFAULT_MAP_RESOLUTION: u32 = 110;

/// Render one spec. Pure: the same inputs always give the same artifact.
pub fn render_chart(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<ChartArtifact> {
    check_columns(spec, dataset)?;

    let traces = match spec.kind {
        ChartKind::Bar => bar_traces(spec, dataset)?,
        ChartKind::Box => box_traces(spec, dataset)?,
        ChartKind::Histogram => histogram_traces(spec, dataset)?,
        ChartKind::Pie => pie_traces(spec, dataset)?,
        ChartKind::GeoScatter => geo_traces(spec, dataset)?,
    };

    let artifact = ChartArtifact::new(
        &spec.id,
        spec.kind,
        dataset.len(),
        layout_for(spec),
        traces,
    );
    debug!(
        chart = %spec.id,
        kind = spec.kind.as_str(),
        traces = artifact.traces().len(),
        points = artifact.point_count(),
        "rendered chart"
    );
    Ok(artifact)
}

fn check_columns(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<()> {
    match spec
        .bindings
        .columns()
        .into_iter()
        .find(|name| !dataset.has_column(name))
    {
        Some(column) => Err(DashboardError::MissingColumn {
            chart: spec.id.clone(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Bound column of a channel the spec validated as present.
fn required<'a>(
    spec: &ChartSpec,
    channel: &'a Option<String>,
    name: &str,
) -> DashboardResult<&'a str> {
    channel.as_deref().ok_or_else(|| DashboardError::InvalidSpec {
        id: spec.id.clone(),
        reason: format!("{name} channel is not bound"),
    })
}

/// Colour group of each row, or a single group named after `fallback`.
/// Rows with a null colour value are `None`.
fn color_groups(
    spec: &ChartSpec,
    dataset: &Dataset,
    fallback: &str,
) -> DashboardResult<Vec<Option<String>>> {
    match &spec.bindings.color {
        Some(column) => dataset.category_values(column),
        None => Ok(vec![Some(fallback.to_string()); dataset.len()]),
    }
}

/// Count occurrences keeping first-encountered order.
fn count_values<'a>(values: impl IntoIterator<Item = &'a str>) -> IndexMap<&'a str, usize> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Order categories by descending count; ties keep first-encountered order.
fn by_descending_count<'a>(counts: &IndexMap<&'a str, usize>) -> Vec<(&'a str, usize)> {
    let mut ordered: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (*k, *v)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered
}

fn bar_traces(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<Vec<Trace>> {
    let x_col = required(spec, &spec.bindings.x, "x")?;
    let xs = dataset.category_values(x_col)?;
    let groups = color_groups(spec, dataset, x_col)?;

    // Null categories or colour groups are left out, like value_counts.
    let rows: Vec<(&str, &str)> = xs
        .iter()
        .zip(groups.iter())
        .filter_map(|(x, group)| Some((x.as_deref()?, group.as_deref()?)))
        .collect();

    let totals = count_values(rows.iter().map(|(x, _)| *x));
    let categories = by_descending_count(&totals);

    let mut per_group: IndexMap<&str, IndexMap<&str, usize>> = IndexMap::new();
    for (x, group) in &rows {
        *per_group
            .entry(*group)
            .or_default()
            .entry(*x)
            .or_insert(0) += 1;
    }

    let palette = spec.display.palette;
    let traces = per_group
        .iter()
        .enumerate()
        .map(|(i, (group, counts))| {
            let (x, y): (Vec<String>, Vec<f64>) = categories
                .iter()
                .filter_map(|(cat, _)| counts.get(cat).map(|n| (cat.to_string(), *n as f64)))
                .unzip();
            Trace::Bar(BarTrace {
                name: group.to_string(),
                color: palette.color(i),
                x,
                y,
            })
        })
        .collect();
    Ok(traces)
}

fn box_traces(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<Vec<Trace>> {
    let y_col = required(spec, &spec.bindings.y, "y")?;
    let values: Vec<f64> = dataset.numeric_values(y_col)?.into_iter().flatten().collect();

    let traces = StatsCalculator::box_summary(&values)
        .map(|summary| {
            Trace::Box(BoxTrace {
                name: y_col.to_string(),
                color: spec.display.palette.color(0),
                summary,
            })
        })
        .into_iter()
        .collect();
    Ok(traces)
}

fn histogram_traces(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<Vec<Trace>> {
    let x_col = required(spec, &spec.bindings.x, "x")?;
    let values = dataset.numeric_values(x_col)?;
    let groups = color_groups(spec, dataset, x_col)?;

    let finite: Vec<f64> = values.iter().flatten().copied().collect();
    let Some(edges) = StatsCalculator::bin_edges(&finite, spec.display.bins) else {
        return Ok(Vec::new());
    };

    let mut per_group: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for (value, group) in values.iter().zip(groups.iter()) {
        if let (Some(v), Some(group)) = (value, group) {
            per_group.entry(group.as_str()).or_default().push(*v);
        }
    }

    let opacity = spec.display.opacity.unwrap_or(DEFAULT_HISTOGRAM_OPACITY);
    let traces = per_group
        .into_iter()
        .enumerate()
        .map(|(i, (group, vals))| {
            Trace::Histogram(HistogramTrace {
                name: group.to_string(),
                color: spec.display.palette.color(i),
                opacity,
                bins: edges.bucket(vals),
            })
        })
        .collect();
    Ok(traces)
}

fn pie_traces(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<Vec<Trace>> {
    let names_col = required(spec, &spec.bindings.names, "names")?;
    let values = dataset.category_values(names_col)?;
    let names: Vec<&str> = values.iter().filter_map(|v| v.as_deref()).collect();
    let total = names.len();

    let counts = count_values(names.iter().copied());
    let slices = by_descending_count(&counts)
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| PieSlice {
            label: label.to_string(),
            count,
            fraction: count as f64 / total as f64,
            color: spec.display.palette.color(i),
        })
        .collect();

    Ok(vec![Trace::Pie(PieTrace { slices })])
}

fn geo_traces(spec: &ChartSpec, dataset: &Dataset) -> DashboardResult<Vec<Trace>> {
    let lat_col = required(spec, &spec.bindings.lat, "lat")?;
    let lon_col = required(spec, &spec.bindings.lon, "lon")?;

    if let Err(err) = dataset.validate_coordinates(lat_col, lon_col) {
        warn!(chart = %spec.id, error = %err, "rejecting geo chart");
        return Err(err);
    }

    // Validated above: every row has both coordinates.
    let lats: Vec<f64> = dataset.numeric_values(lat_col)?.into_iter().flatten().collect();
    let lons: Vec<f64> = dataset.numeric_values(lon_col)?.into_iter().flatten().collect();
    let groups = color_groups(spec, dataset, &spec.id)?;

    let hover_columns: Vec<String> = match &spec.bindings.hover {
        HoverData::None => Vec::new(),
        HoverData::All => dataset.column_names(),
        HoverData::Columns(cols) => cols.clone(),
    };
    let hover_values = hover_columns
        .iter()
        .map(|c| dataset.text_values(c))
        .collect::<DashboardResult<Vec<_>>>()?;

    let mut per_group: IndexMap<&str, Vec<GeoPoint>> = IndexMap::new();
    for (row, group) in groups.iter().enumerate() {
        let hover = hover_columns
            .iter()
            .zip(hover_values.iter())
            .map(|(name, values)| (name.clone(), values[row].clone()))
            .collect();
        // Every record keeps its point; a null colour value lands in the "" group.
        let group = group.as_deref().unwrap_or_default();
        per_group.entry(group).or_default().push(GeoPoint {
            lon: lons[row],
            lat: lats[row],
            hover,
        });
    }

    let palette = spec.display.palette;
    let traces = per_group
        .into_iter()
        .enumerate()
        .map(|(i, (group, points))| {
            Trace::ScatterGeo(GeoTrace {
                name: group.to_string(),
                color: palette.color(i),
                points,
            })
        })
        .collect();
    Ok(traces)
}

fn layout_for(spec: &ChartSpec) -> Layout {
    let d = &spec.display;
    let bar_mode = match spec.kind {
        ChartKind::Bar | ChartKind::Histogram => Some(d.bar_mode.unwrap_or_default()),
        _ => None,
    };
    let geo = (spec.kind == ChartKind::GeoScatter).then(|| GeoLayout {
        scope: GeoScope::World,
        lat_range: sorted_range(d.lat_range.unwrap_or(DEFAULT_LAT_RANGE)),
        lon_range: sorted_range(d.lon_range.unwrap_or(DEFAULT_LON_RANGE)),
        resolution: d.map_resolution.unwrap_or(DEFAULT_MAP_RESOLUTION),
        show_land: d.show_land.unwrap_or(true),
    });

    Layout {
        title: d.title.clone(),
        width: d.width,
        height: d.height,
        x_axis: Axis {
            title: d.x_title.clone().or_else(|| default_x_title(spec)),
            range: d.x_range.map(sorted_range),
        },
        y_axis: Axis {
            title: d.y_title.clone().or_else(|| default_y_title(spec)),
            range: d.y_range.map(sorted_range),
        },
        bar_mode,
        legend: d.legend.unwrap_or_default(),
        geo,
    }
}

fn default_x_title(spec: &ChartSpec) -> Option<String> {
    match spec.kind {
        ChartKind::Bar | ChartKind::Histogram => spec.bindings.x.clone(),
        _ => None,
    }
}

fn default_y_title(spec: &ChartSpec) -> Option<String> {
    match spec.kind {
        ChartKind::Bar | ChartKind::Histogram => Some("count".to_string()),
        ChartKind::Box => spec.bindings.y.clone(),
        ChartKind::Pie | ChartKind::GeoScatter => None,
    }
}

/// Ranges may be written high-to-low; artifacts always carry `[min, max]`.
fn sorted_range([a, b]: [f64; 2]) -> [f64; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_count_keeps_first_seen_ties() {
        let counts = count_values(["b", "a", "a", "c", "b"]);
        let ordered = by_descending_count(&counts);
        assert_eq!(ordered, vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn reversed_range_is_sorted() {
        assert_eq!(sorted_range([67.0, -4.0]), [-4.0, 67.0]);
    }
}
