//! The five charts of the seismic event dashboard.

use crate::charts::{
    BarMode, ChartKind, ChartRegistry, ChartSpec, HoverData, LegendOptions, Palette,
};
use crate::data::columns;
use crate::error::DashboardResult;

pub const EVENT_TYPES: &str = "event_types";
pub const MAGNITUDES: &str = "magnitudes";
pub const DEPTHS: &str = "depths";
pub const STATUSES: &str = "statuses";
pub const LOCATIONS: &str = "locations";

/// Latitude band of the map view, south to north.
pub const MAP_LAT_RANGE: [f64; 2] = [-4.0, 67.0];
pub const MAP_LON_RANGE: [f64; 2] = [-180.0, 180.0];

pub fn seismic_chart_specs() -> Vec<ChartSpec> {
    vec![
        ChartSpec::new(EVENT_TYPES, ChartKind::Bar)
            .x(columns::EVENT_TYPE)
            .color(columns::EVENT_TYPE)
            .axis_titles(Some("Event Type"), Some("Event Frequency"))
            .size(Some(900), Some(500))
            .caption("1) A Plot of Event Distribution by Event Type."),
        ChartSpec::new(MAGNITUDES, ChartKind::Box)
            .y(columns::MAGNITUDE)
            .axis_titles(None, Some("Magnitude"))
            .size(Some(800), Some(600))
            .caption("2) A Plot of the Distribution of Seismic Event Magnitudes."),
        ChartSpec::new(DEPTHS, ChartKind::Histogram)
            .x(columns::DEPTH)
            .color(columns::EVENT_TYPE)
            .opacity(0.7)
            .bar_mode(BarMode::Overlay)
            .axis_titles(Some("Depth"), Some("Frequency"))
            .size(Some(800), Some(600))
            .caption("3) A Plot of the Distribution of Seismic Event Depths."),
        ChartSpec::new(STATUSES, ChartKind::Pie)
            .names(columns::STATUS)
            .palette(Palette::RdBu)
            .size(Some(900), Some(700))
            .caption("4) A Plot of the Distribution of Seismic Event Status."),
        ChartSpec::new(LOCATIONS, ChartKind::GeoScatter)
            .lat_lon(columns::LATITUDE, columns::LONGITUDE)
            .color(columns::COUNTRY)
            .hover(HoverData::All)
            .palette(Palette::Set1)
            .geo_ranges(MAP_LAT_RANGE, MAP_LON_RANGE)
            .map_resolution(50)
            .legend(LegendOptions::horizontal_top())
            .size(None, Some(800))
            .caption("5) A Plot of Seismic Event Distribution by Geographical Location."),
    ]
}

impl ChartRegistry {
    /// Registry holding [`seismic_chart_specs`].
    pub fn seismic() -> DashboardResult<Self> {
        let mut registry = Self::new();
        for spec in seismic_chart_specs() {
            registry.register(spec)?;
        }
        Ok(registry)
    }
}
