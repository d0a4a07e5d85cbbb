use quake_dashboard::charts::{ChartRegistry, EVENT_TYPES, LOCATIONS, STATUSES};
use quake_dashboard::{ChartKind, ChartSpec, DashboardError};
use std::sync::Arc;

mod common;
use common::sample_dataset;

#[test]
fn seismic_registry_lists_five_charts_in_order() {
    let registry = ChartRegistry::seismic().expect("seismic registry");
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(
        ids,
        vec!["event_types", "magnitudes", "depths", "statuses", "locations"]
    );
}

#[test]
fn duplicate_id_is_rejected_and_original_kept() {
    let mut registry = ChartRegistry::new();
    registry
        .register(ChartSpec::new("c1", ChartKind::Bar).x("type"))
        .expect("first register");

    let err = registry
        .register(ChartSpec::new("c1", ChartKind::Pie).names("status"))
        .expect_err("duplicate id");
    assert!(matches!(err, DashboardError::DuplicateId(ref id) if id == "c1"));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("c1").map(|s| s.kind), Some(ChartKind::Bar));
}

#[test]
fn spec_without_required_channel_is_rejected() {
    let mut registry = ChartRegistry::new();
    let err = registry
        .register(ChartSpec::new("lonely_pie", ChartKind::Pie))
        .expect_err("names not bound");
    assert!(matches!(err, DashboardError::InvalidSpec { .. }));
    assert!(registry.is_empty());
}

#[test]
fn out_of_range_opacity_is_rejected() {
    let mut registry = ChartRegistry::new();
    let err = registry
        .register(ChartSpec::new("h", ChartKind::Histogram).x("depth").opacity(1.5))
        .expect_err("opacity above one");
    assert!(matches!(err, DashboardError::InvalidSpec { .. }));
}

#[test]
fn render_unknown_id_fails() {
    let registry = ChartRegistry::seismic().expect("seismic registry");
    let err = registry
        .render("nope", &sample_dataset())
        .expect_err("unknown id");
    assert!(matches!(err, DashboardError::UnknownChart(ref id) if id == "nope"));
}

#[test]
fn render_reports_missing_column() {
    let mut registry = ChartRegistry::new();
    registry
        .register(ChartSpec::new("by_network", ChartKind::Bar).x("net"))
        .expect("register");

    let err = registry
        .render("by_network", &sample_dataset())
        .expect_err("net is not a column");
    match err {
        DashboardError::MissingColumn { chart, column } => {
            assert_eq!(chart, "by_network");
            assert_eq!(column, "net");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn render_all_keeps_registration_order() {
    let registry = ChartRegistry::seismic().expect("seismic registry");
    let results = registry.render_all(&sample_dataset());

    let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, registry.ids().collect::<Vec<_>>());
    for (id, result) in &results {
        let artifact = result.as_ref().expect("chart renders");
        assert_eq!(artifact.chart_id(), id.as_str());
        assert_eq!(artifact.record_count(), 4);
    }
}

#[test]
fn one_failing_chart_does_not_block_the_others() {
    let mut registry = ChartRegistry::new();
    registry
        .register(ChartSpec::new("broken", ChartKind::Bar).x("missing"))
        .expect("register broken");
    registry
        .register(ChartSpec::new("statuses", ChartKind::Pie).names("status"))
        .expect("register pie");

    let results = registry.render_all(&sample_dataset());
    assert!(results[0].1.is_err());
    assert!(results[1].1.is_ok());
}

#[test]
fn outputs_produce_the_same_artifact_as_render() {
    let registry = ChartRegistry::seismic().expect("seismic registry");
    let dataset = Arc::new(sample_dataset());
    let outputs = registry.outputs(Arc::clone(&dataset));

    assert_eq!(outputs.len(), 5);
    for id in [EVENT_TYPES, STATUSES, LOCATIONS] {
        let produce = outputs.get(id).expect("output registered");
        let lazy = produce().expect("lazy render");
        let direct = registry.render(id, &dataset).expect("direct render");
        assert_eq!(lazy, direct);
        assert_eq!(produce().expect("second render"), direct);
    }
}
