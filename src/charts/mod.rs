//! Charts module - Chart specs, rendering and export

pub mod artifact;
mod catalog;
mod export;
mod palette;
mod registry;
mod render;
mod spec;

pub use artifact::{ChartArtifact, Trace};
pub use catalog::{
    seismic_chart_specs, DEPTHS, EVENT_TYPES, LOCATIONS, MAGNITUDES, MAP_LAT_RANGE,
    MAP_LON_RANGE, STATUSES,
};
pub use export::StaticChartRenderer;
pub use palette::{Color, Palette};
pub use registry::{ChartOutput, ChartRegistry};
pub use render::{render_chart, DEFAULT_HISTOGRAM_OPACITY};
pub use spec::{
    Anchor, BarMode, ChartKind, ChartSpec, ColumnBindings, DisplayOptions, HoverData,
    LegendOptions, Orientation,
};
