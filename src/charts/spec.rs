//! Declarative chart descriptions: what to plot and how it should look.

use crate::charts::Palette;
use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Box,
    Histogram,
    Pie,
    GeoScatter,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
            ChartKind::GeoScatter => "geo_scatter",
        }
    }
}

/// Which record columns feed the hover detail of a point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverData {
    #[default]
    None,
    All,
    Columns(Vec<String>),
}

/// Mapping of dataset columns to visual channels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBindings {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub names: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub hover: HoverData,
}

impl ColumnBindings {
    /// Every column named by a binding, in channel order, without duplicates.
    pub fn columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let channels = [
            &self.x,
            &self.y,
            &self.color,
            &self.names,
            &self.lat,
            &self.lon,
        ];
        let hover = match &self.hover {
            HoverData::Columns(cols) => cols.as_slice(),
            HoverData::None | HoverData::All => &[],
        };
        for name in channels.into_iter().flatten().chain(hover.iter()) {
            if !out.contains(&name.as_str()) {
                out.push(name.as_str());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Auto,
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Legend placement in paper coordinates (0..1 spans the plot area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    pub orientation: Orientation,
    pub x: f64,
    pub y: f64,
    pub x_anchor: Anchor,
    pub y_anchor: Anchor,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            x: 1.02,
            y: 1.0,
            x_anchor: Anchor::Left,
            y_anchor: Anchor::Auto,
        }
    }
}

impl LegendOptions {
    /// Single row above the plot, right aligned.
    pub fn horizontal_top() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            x: 1.0,
            y: 1.02,
            x_anchor: Anchor::Right,
            y_anchor: Anchor::Bottom,
        }
    }
}

/// How several bar or histogram series share the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    #[default]
    Relative,
    Group,
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub title: Option<String>,
    /// Text shown above the chart by a UI shell.
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub opacity: Option<f32>,
    pub palette: Palette,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub lat_range: Option<[f64; 2]>,
    pub lon_range: Option<[f64; 2]>,
    pub bins: Option<usize>,
    pub bar_mode: Option<BarMode>,
    pub legend: Option<LegendOptions>,
    pub map_resolution: Option<u32>,
    /// Draw the land outline and equator under geographic points (default on).
    pub show_land: Option<bool>,
}

/// One named, parameterized visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    #[serde(default)]
    pub bindings: ColumnBindings,
    #[serde(default)]
    pub display: DisplayOptions,
}

impl ChartSpec {
    pub fn new(id: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            id: id.into(),
            kind,
            bindings: ColumnBindings::default(),
            display: DisplayOptions::default(),
        }
    }

    pub fn x(mut self, column: &str) -> Self {
        self.bindings.x = Some(column.to_string());
        self
    }

    pub fn y(mut self, column: &str) -> Self {
        self.bindings.y = Some(column.to_string());
        self
    }

    pub fn color(mut self, column: &str) -> Self {
        self.bindings.color = Some(column.to_string());
        self
    }

    pub fn names(mut self, column: &str) -> Self {
        self.bindings.names = Some(column.to_string());
        self
    }

    pub fn lat_lon(mut self, lat: &str, lon: &str) -> Self {
        self.bindings.lat = Some(lat.to_string());
        self.bindings.lon = Some(lon.to_string());
        self
    }

    pub fn hover(mut self, hover: HoverData) -> Self {
        self.bindings.hover = hover;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.display.title = Some(title.to_string());
        self
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.display.caption = Some(caption.to_string());
        self
    }

    pub fn size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.display.width = width;
        self.display.height = height;
        self
    }

    pub fn axis_titles(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        self.display.x_title = x.map(str::to_string);
        self.display.y_title = y.map(str::to_string);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.display.opacity = Some(opacity);
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.display.palette = palette;
        self
    }

    pub fn bar_mode(mut self, mode: BarMode) -> Self {
        self.display.bar_mode = Some(mode);
        self
    }

    pub fn bins(mut self, bins: usize) -> Self {
        self.display.bins = Some(bins);
        self
    }

    pub fn geo_ranges(mut self, lat: [f64; 2], lon: [f64; 2]) -> Self {
        self.display.lat_range = Some(lat);
        self.display.lon_range = Some(lon);
        self
    }

    pub fn legend(mut self, legend: LegendOptions) -> Self {
        self.display.legend = Some(legend);
        self
    }

    pub fn map_resolution(mut self, resolution: u32) -> Self {
        self.display.map_resolution = Some(resolution);
        self
    }

    pub fn show_land(mut self, show: bool) -> Self {
        self.display.show_land = Some(show);
        self
    }

    /// Check the spec binds the channels its kind needs.
    pub fn validate(&self) -> DashboardResult<()> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("id must not be empty"));
        }

        let b = &self.bindings;
        match self.kind {
            ChartKind::Bar | ChartKind::Histogram if b.x.is_none() => {
                Err(self.invalid("x channel is not bound"))
            }
            ChartKind::Box if b.y.is_none() => Err(self.invalid("y channel is not bound")),
            ChartKind::Pie if b.names.is_none() => {
                Err(self.invalid("names channel is not bound"))
            }
            ChartKind::GeoScatter if b.lat.is_none() || b.lon.is_none() => {
                Err(self.invalid("lat and lon channels must both be bound"))
            }
            _ => self.validate_display(),
        }
    }

    fn validate_display(&self) -> DashboardResult<()> {
        if let Some(opacity) = self.display.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(self.invalid("opacity must be within [0, 1]"));
            }
        }
        if self.display.bins == Some(0) {
            return Err(self.invalid("bins must be positive"));
        }
        let ranges = [
            self.display.x_range,
            self.display.y_range,
            self.display.lat_range,
            self.display.lon_range,
        ];
        if ranges
            .iter()
            .flatten()
            .any(|[lo, hi]| !lo.is_finite() || !hi.is_finite() || lo == hi)
        {
            return Err(self.invalid("axis ranges must be finite and non-empty"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> DashboardError {
        DashboardError::InvalidSpec {
            id: self.id.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_columns_are_deduplicated() {
        let spec = ChartSpec::new("c", ChartKind::Bar)
            .x("type")
            .color("type")
            .hover(HoverData::Columns(vec!["mag".into(), "type".into()]));
        assert_eq!(spec.bindings.columns(), vec!["type", "mag"]);
    }

    #[test]
    fn degenerate_range_is_invalid() {
        let spec = ChartSpec::new("geo", ChartKind::GeoScatter)
            .lat_lon("latitude", "longitude")
            .geo_ranges([10.0, 10.0], [-180.0, 180.0]);
        assert!(matches!(
            spec.validate(),
            Err(DashboardError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn spec_json_uses_snake_case_kinds() {
        let spec: ChartSpec =
            serde_json::from_str(r#"{"id":"g","kind":"geo_scatter"}"#).expect("parse");
        assert_eq!(spec.kind, ChartKind::GeoScatter);
        assert!(spec.validate().is_err());
    }
}
