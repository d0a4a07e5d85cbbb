use quake_dashboard::charts::ChartKind;
use quake_dashboard::config::{ExportFormat, CONFIG_ENV};
use quake_dashboard::{DashboardConfig, DashboardError};
use std::io::Write;
use std::path::Path;

#[test]
fn defaults_use_the_seismic_chart_set() {
    let config = DashboardConfig::default();
    assert_eq!(config.data_path, Path::new("quakes-cleaned.csv"));
    assert_eq!(
        config.export.formats,
        vec![ExportFormat::Json, ExportFormat::Svg]
    );

    let registry = config.build_registry().expect("registry");
    assert_eq!(registry.len(), 5);
}

#[test]
fn empty_document_is_the_default_config() {
    let config = DashboardConfig::from_json_str("{}").expect("parse");
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn custom_charts_replace_the_default_set() {
    let json = r#"{
        "data_path": "data/events.csv",
        "charts": [
            {
                "id": "mag_hist",
                "kind": "histogram",
                "bindings": { "x": "mag" },
                "display": { "bins": 10, "opacity": 0.5 }
            },
            {
                "id": "status_pie",
                "kind": "pie",
                "bindings": { "names": "status" }
            }
        ],
        "export": { "output_dir": "out", "formats": ["png"] }
    }"#;
    let config = DashboardConfig::from_json_str(json).expect("parse");
    assert_eq!(config.data_path, Path::new("data/events.csv"));
    assert_eq!(config.export.formats, vec![ExportFormat::Png]);
    assert_eq!(config.export.width, 900);

    let registry = config.build_registry().expect("registry");
    let kinds: Vec<ChartKind> = registry.specs().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![ChartKind::Histogram, ChartKind::Pie]);
    assert_eq!(
        registry.get("mag_hist").and_then(|s| s.display.bins),
        Some(10)
    );
}

#[test]
fn duplicate_chart_ids_fail_registry_build() {
    let json = r#"{ "charts": [
        { "id": "a", "kind": "pie", "bindings": { "names": "status" } },
        { "id": "a", "kind": "bar", "bindings": { "x": "type" } }
    ] }"#;
    let config = DashboardConfig::from_json_str(json).expect("parse");
    let err = config.build_registry().expect_err("duplicate id");
    assert!(matches!(err, DashboardError::DuplicateId(_)));
}

#[test]
fn empty_format_list_is_rejected() {
    let err = DashboardConfig::from_json_str(r#"{ "export": { "formats": [] } }"#)
        .expect_err("no formats");
    assert!(matches!(err, DashboardError::Config(_)));
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = DashboardConfig::from_json_str("{ not json").expect_err("malformed");
    assert!(matches!(err, DashboardError::Json(_)));
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "data_path": "elsewhere.csv" }}"#).expect("write");

    let config = DashboardConfig::resolve(Some(file.path())).expect("resolve");
    assert_eq!(config.data_path, Path::new("elsewhere.csv"));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = DashboardConfig::from_json_file(Path::new("/definitely/not/here.json"))
        .expect_err("missing file");
    assert!(matches!(err, DashboardError::Config(_)));
}

#[test]
fn env_variable_name_is_stable() {
    assert_eq!(CONFIG_ENV, "QUAKE_DASHBOARD_CONFIG");
}
