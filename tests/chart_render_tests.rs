use approx::assert_relative_eq;
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;
use quake_dashboard::charts::{
    render_chart, seismic_chart_specs, BarMode, ChartRegistry, Orientation, Palette, Trace,
    DEPTHS, EVENT_TYPES, LOCATIONS, MAGNITUDES, STATUSES,
};
use quake_dashboard::{ChartKind, ChartSpec, DashboardError, Dataset, DatasetPreparer};

mod common;
use common::{event, sample_dataset};

fn table_with_null_categories() -> Dataset {
    let raw = DataFrame::new(vec![
        Column::new(
            "type".into(),
            vec![Some("earthquake"), None, Some("earthquake")],
        ),
        Column::new("mag".into(), vec![1.0, 2.0, 3.0]),
        Column::new("depth".into(), vec![5.0, 6.0, 7.0]),
        Column::new(
            "status".into(),
            vec![Some("reviewed"), None, Some("automatic")],
        ),
        Column::new("latitude".into(), vec![10.0, 20.0, 30.0]),
        Column::new("longitude".into(), vec![40.0, 50.0, 60.0]),
        Column::new("state_country".into(), vec!["Chile", "Peru", "Peru"]),
    ])
    .expect("raw table");
    DatasetPreparer::prepare(&raw).expect("prepare")
}

fn render(id: &str, dataset: &Dataset) -> quake_dashboard::ChartArtifact {
    ChartRegistry::seismic()
        .expect("seismic registry")
        .render(id, dataset)
        .expect("render")
}

#[test]
fn bar_counts_per_category() {
    let records = vec![
        event("A", 1.0, 1.0, "reviewed", 0.0, 0.0, "X"),
        event("A", 1.0, 1.0, "reviewed", 0.0, 0.0, "X"),
        event("B", 1.0, 1.0, "reviewed", 0.0, 0.0, "X"),
    ];
    let dataset = Dataset::from_records(&records).expect("dataset");
    let artifact = render(EVENT_TYPES, &dataset);

    let counts = artifact.bar_counts();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get("A"), Some(&2.0));
    assert_eq!(counts.get("B"), Some(&1.0));
}

#[test]
fn bar_counts_do_not_depend_on_render_order() {
    let records = vec![
        event("A", 1.0, 1.0, "reviewed", 0.0, 0.0, "X"),
        event("B", 2.0, 2.0, "automatic", 0.0, 0.0, "X"),
        event("A", 3.0, 3.0, "reviewed", 0.0, 0.0, "X"),
    ];
    let dataset = Dataset::from_records(&records).expect("dataset");
    let registry = ChartRegistry::seismic().expect("seismic registry");

    let first = registry.render(EVENT_TYPES, &dataset).expect("bars first");
    for id in [LOCATIONS, STATUSES, DEPTHS, MAGNITUDES] {
        registry.render(id, &dataset).expect("other chart");
    }
    let after_others = registry.render(EVENT_TYPES, &dataset).expect("bars last");
    let (_, from_all) = registry
        .render_all(&dataset)
        .into_iter()
        .find(|(id, _)| id == EVENT_TYPES)
        .expect("bars in render_all");
    let from_all = from_all.expect("bars in render_all");

    for artifact in [&first, &after_others, &from_all] {
        let counts = artifact.bar_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("A"), Some(&2.0));
        assert_eq!(counts.get("B"), Some(&1.0));
    }
    assert_eq!(first, from_all);
}

#[test]
fn null_categories_are_not_counted() {
    let dataset = table_with_null_categories();

    let bars = render(EVENT_TYPES, &dataset).bar_counts();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars.get("earthquake"), Some(&2.0));

    let pie = render(STATUSES, &dataset);
    let labels: Vec<&str> = pie.pie_slices().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels.len(), 2);
    assert!(labels.contains(&"reviewed") && labels.contains(&"automatic"));
    for slice in pie.pie_slices() {
        assert_relative_eq!(slice.fraction, 0.5);
    }

    let depths = render(DEPTHS, &dataset);
    let names: Vec<&str> = depths
        .traces()
        .iter()
        .filter_map(|t| match t {
            Trace::Histogram(h) => Some(h.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["earthquake"]);
    assert_eq!(depths.point_count(), 2);

    // The map still places every record.
    assert_eq!(render(LOCATIONS, &dataset).point_count(), 3);
}

#[test]
fn bars_are_ordered_by_descending_count() {
    let artifact = render(EVENT_TYPES, &sample_dataset());
    let counts = artifact.bar_counts();
    let ordered: Vec<(&String, &f64)> = counts.iter().collect();
    assert_eq!(ordered[0], (&"earthquake".to_string(), &3.0));
    assert_eq!(ordered[1], (&"quarry blast".to_string(), &1.0));

    let layout = artifact.layout();
    assert_eq!(layout.x_axis.title.as_deref(), Some("Event Type"));
    assert_eq!(layout.y_axis.title.as_deref(), Some("Event Frequency"));
    assert_eq!((layout.width, layout.height), (Some(900), Some(500)));
}

#[test]
fn box_summary_uses_linear_quartiles() {
    let artifact = render(MAGNITUDES, &sample_dataset());
    let [Trace::Box(trace)] = artifact.traces() else {
        panic!("expected one box trace, got {:?}", artifact.traces());
    };

    let s = &trace.summary;
    assert_eq!(s.count, 4);
    assert_relative_eq!(s.q1, 1.5, epsilon = 1e-9);
    assert_relative_eq!(s.median, 2.0, epsilon = 1e-9);
    assert_relative_eq!(s.q3, 3.0, epsilon = 1e-9);
    assert_relative_eq!(s.upper_whisker, 4.8, epsilon = 1e-9);
    assert!(s.outliers.is_empty());
    assert_eq!(artifact.layout().y_axis.title.as_deref(), Some("Magnitude"));
}

#[test]
fn histogram_overlays_event_types() {
    let artifact = render(DEPTHS, &sample_dataset());
    let layout = artifact.layout();

    assert_eq!(layout.bar_mode, Some(BarMode::Overlay));
    assert_eq!(layout.x_axis.title.as_deref(), Some("Depth"));
    assert_eq!(layout.y_axis.title.as_deref(), Some("Frequency"));
    assert_eq!(artifact.point_count(), 4);

    let names: Vec<&str> = artifact
        .traces()
        .iter()
        .map(|t| match t {
            Trace::Histogram(h) => {
                assert_relative_eq!(h.opacity, 0.7);
                h.name.as_str()
            }
            other => panic!("unexpected trace {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["earthquake", "quarry blast"]);
}

#[test]
fn histogram_series_share_bin_edges() {
    let artifact = render(DEPTHS, &sample_dataset());
    let edges: Vec<Vec<(f64, f64)>> = artifact
        .traces()
        .iter()
        .filter_map(|t| match t {
            Trace::Histogram(h) => Some(h.bins.iter().map(|b| (b.start, b.end)).collect()),
            _ => None,
        })
        .collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0], edges[1]);
}

#[test]
fn pie_slices_sorted_with_fractions() {
    let artifact = render(STATUSES, &sample_dataset());
    let slices = artifact.pie_slices();

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].label, "reviewed");
    assert_eq!(slices[0].count, 3);
    assert_relative_eq!(slices[0].fraction, 0.75);
    assert_eq!(slices[1].label, "automatic");
    assert_eq!(slices[0].color, Palette::RdBu.color(0));
    assert_eq!(slices[1].color, Palette::RdBu.color(1));
}

#[test]
fn empty_dataset_renders_empty_charts() {
    let dataset = Dataset::from_records(&[]).expect("empty dataset");
    let registry = ChartRegistry::seismic().expect("seismic registry");

    for (id, result) in registry.render_all(&dataset) {
        let artifact = result.unwrap_or_else(|e| panic!("{id}: {e}"));
        assert_eq!(artifact.point_count(), 0, "{id}");
        assert_eq!(artifact.record_count(), 0);
    }
    let pie = registry.render(STATUSES, &dataset).expect("pie");
    assert!(pie.pie_slices().is_empty());
}

#[test]
fn geo_points_grouped_by_country() {
    let artifact = render(LOCATIONS, &sample_dataset());
    assert_eq!(artifact.point_count(), 4);

    let groups: Vec<(&str, usize)> = artifact
        .traces()
        .iter()
        .filter_map(|t| match t {
            Trace::ScatterGeo(g) => Some((g.name.as_str(), g.points.len())),
            _ => None,
        })
        .collect();
    assert_eq!(groups, vec![("United States", 3), ("Papua New Guinea", 1)]);
}

#[test]
fn geo_layout_uses_map_view() {
    let artifact = render(LOCATIONS, &sample_dataset());
    let layout = artifact.layout();
    let geo = layout.geo.as_ref().expect("geo layout");

    assert_eq!(geo.lat_range, [-4.0, 67.0]);
    assert_eq!(geo.lon_range, [-180.0, 180.0]);
    assert_eq!(geo.resolution, 50);
    assert_eq!(layout.legend.orientation, Orientation::Horizontal);
    assert_relative_eq!(layout.legend.x, 1.0);
    assert_relative_eq!(layout.legend.y, 1.02);
    assert_eq!(layout.height, Some(800));
}

#[test]
fn geo_hover_shows_every_column() {
    let dataset = sample_dataset();
    let artifact = render(LOCATIONS, &dataset);
    let Some(Trace::ScatterGeo(trace)) = artifact.traces().first() else {
        panic!("expected a geo trace");
    };

    let point = &trace.points[0];
    let names: Vec<&str> = point.hover.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names.len(), dataset.column_names().len());
    assert!(point
        .hover
        .iter()
        .any(|(k, v)| k == "state_country" && v == "California, United States"));
}

#[test]
fn geo_rejects_latitude_out_of_range() {
    let records = vec![
        event("earthquake", 1.0, 1.0, "reviewed", 10.0, 20.0, "Chile"),
        event("earthquake", 1.0, 1.0, "reviewed", 95.0, 20.0, "Chile"),
    ];
    let dataset = Dataset::from_records(&records).expect("dataset");

    let err = ChartRegistry::seismic()
        .expect("seismic registry")
        .render(LOCATIONS, &dataset)
        .expect_err("latitude 95");
    assert!(matches!(err, DashboardError::DataValidation(_)));
}

#[test]
fn geo_rejects_missing_coordinate() {
    let raw = DataFrame::new(vec![
        Column::new("type".into(), vec!["earthquake", "earthquake"]),
        Column::new("mag".into(), vec![1.0, 2.0]),
        Column::new("depth".into(), vec![5.0, 6.0]),
        Column::new("status".into(), vec!["reviewed", "reviewed"]),
        Column::new("latitude".into(), vec![Some(12.0), None]),
        Column::new("longitude".into(), vec![40.0, 41.0]),
        Column::new("state_country".into(), vec!["Ethiopia", "Ethiopia"]),
    ])
    .expect("raw table");
    let dataset = DatasetPreparer::prepare(&raw).expect("prepare");

    let err = ChartRegistry::seismic()
        .expect("seismic registry")
        .render(LOCATIONS, &dataset)
        .expect_err("null latitude");
    match err {
        DashboardError::DataValidation(msg) => assert!(msg.contains("missing"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rendering_is_deterministic() {
    let dataset = sample_dataset();
    for spec in seismic_chart_specs() {
        let first = render_chart(&spec, &dataset).expect("first");
        let second = render_chart(&spec, &dataset).expect("second");
        assert_eq!(first, second, "{}", spec.id);
    }
}

#[test]
fn explicit_bin_count_is_honoured() {
    let spec = ChartSpec::new("depth_bins", ChartKind::Histogram)
        .x("depth")
        .bins(4);
    let artifact = render_chart(&spec, &sample_dataset()).expect("render");
    let Some(Trace::Histogram(h)) = artifact.traces().first() else {
        panic!("expected histogram");
    };
    assert!(h.bins.len() >= 4, "{:?}", h.bins);
    assert_eq!(artifact.point_count(), 4);
}

fn in_range_events(coords: &[(f64, f64)]) -> Vec<quake_dashboard::EventRecord> {
    coords
        .iter()
        .map(|&(lat, lon)| event("earthquake", 1.0, 1.0, "reviewed", lat, lon, "Fiji"))
        .collect()
}

proptest! {
    #[test]
    fn geo_point_count_matches_record_count(
        coords in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..40),
    ) {
        let dataset = Dataset::from_records(&in_range_events(&coords)).expect("dataset");
        let artifact = ChartRegistry::seismic()
            .expect("seismic registry")
            .render(LOCATIONS, &dataset)
            .expect("in-range coordinates render");
        prop_assert_eq!(artifact.point_count(), coords.len());
    }

    #[test]
    fn one_bad_coordinate_rejects_the_map(
        coords in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..20),
        bad_row in any::<prop::sample::Index>(),
        bad_lat in prop::bool::ANY,
        excess in 0.001f64..1000.0,
    ) {
        let mut records = in_range_events(&coords);
        let bad = event("earthquake", 1.0, 1.0, "reviewed", 0.0, 0.0, "Fiji");
        let at = bad_row.index(records.len() + 1);
        records.insert(at, if bad_lat {
            bad.at(90.0 + excess, 0.0, "Fiji")
        } else {
            bad.at(0.0, -180.0 - excess, "Fiji")
        });

        let dataset = Dataset::from_records(&records).expect("dataset");
        let err = ChartRegistry::seismic()
            .expect("seismic registry")
            .render(LOCATIONS, &dataset)
            .expect_err("out-of-range coordinate");
        prop_assert!(matches!(err, DashboardError::DataValidation(_)));
    }
}
