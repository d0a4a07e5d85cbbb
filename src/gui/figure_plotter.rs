//! Figure Plotter Module
//! Draws chart artifacts interactively with egui_plot.

use crate::charts::artifact::{GeoTrace, Trace};
use crate::charts::{BarMode, ChartArtifact, ChartKind, Color, Orientation};
use egui::{Color32, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Corner, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points, Polygon,
};

const DEFAULT_WIDTH: f32 = 900.0;
const DEFAULT_HEIGHT: f32 = 600.0;

/// Draws a [`ChartArtifact`] into an egui ui.
pub struct FigurePlotter;

impl FigurePlotter {
    pub fn color32(color: Color) -> Color32 {
        Color32::from_rgb(color.r, color.g, color.b)
    }

    /// Plot size in points, clamped to the width available in the ui.
    fn plot_size(ui: &egui::Ui, artifact: &ChartArtifact) -> (f32, f32) {
        let layout = artifact.layout();
        let width = layout.width.map(|w| w as f32).unwrap_or(DEFAULT_WIDTH);
        let height = layout.height.map(|h| h as f32).unwrap_or(DEFAULT_HEIGHT);
        (width.min(ui.available_width()), height)
    }

    fn legend(artifact: &ChartArtifact) -> Legend {
        let corner = match artifact.layout().legend.orientation {
            Orientation::Horizontal => Corner::RightTop,
            Orientation::Vertical => Corner::RightBottom,
        };
        Legend::default().position(corner)
    }

    fn axis_titles(artifact: &ChartArtifact) -> (String, String) {
        let layout = artifact.layout();
        (
            layout.x_axis.title.clone().unwrap_or_default(),
            layout.y_axis.title.clone().unwrap_or_default(),
        )
    }

    pub fn draw(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        match artifact.kind() {
            ChartKind::Bar => Self::draw_bars(ui, artifact),
            ChartKind::Box => Self::draw_box(ui, artifact),
            ChartKind::Histogram => Self::draw_histogram(ui, artifact),
            ChartKind::Pie => Self::draw_pie(ui, artifact),
            ChartKind::GeoScatter => Self::draw_geo(ui, artifact),
        }
    }

    /// Bar chart, one series per colour category
    fn draw_bars(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        let labels: Vec<String> = artifact.bar_counts().keys().cloned().collect();
        let stacked = artifact.layout().bar_mode == Some(BarMode::Relative);

        let axis_labels = labels.clone();
        let (width, height) = Self::plot_size(ui, artifact);
        let (x_title, y_title) = Self::axis_titles(artifact);
        Plot::new(format!("figure_{}", artifact.chart_id()))
            .width(width)
            .height(height)
            .allow_scroll(false)
            .legend(Self::legend(artifact))
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    axis_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let mut offsets = vec![0.0; labels.len()];
                for trace in artifact.traces() {
                    let Trace::Bar(bar) = trace else { continue };
                    let color = Self::color32(bar.color);
                    let bars: Vec<Bar> = bar
                        .x
                        .iter()
                        .zip(bar.y.iter())
                        .filter_map(|(x, &y)| {
                            let idx = labels.iter().position(|l| l == x)?;
                            let base = if stacked { offsets[idx] } else { 0.0 };
                            if stacked {
                                offsets[idx] += y;
                            }
                            Some(
                                Bar::new(idx as f64, y)
                                    .base_offset(base)
                                    .width(0.8)
                                    .fill(color)
                                    .name(x),
                            )
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&bar.name));
                }
            });
    }

    fn draw_box(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        let (width, height) = Self::plot_size(ui, artifact);
        let (x_title, y_title) = Self::axis_titles(artifact);
        Plot::new(format!("figure_{}", artifact.chart_id()))
            .width(width)
            .height(height)
            .allow_scroll(false)
            .legend(Self::legend(artifact))
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .show_x(false)
            .show(ui, |plot_ui| {
                for (i, trace) in artifact.traces().iter().enumerate() {
                    let Trace::Box(b) = trace else { continue };
                    let color = Self::color32(b.color);
                    let s = &b.summary;
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.name));

                    if !s.outliers.is_empty() {
                        let points: PlotPoints =
                            s.outliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(3.0)
                                .color(color)
                                .name(format!("{} outliers", b.name)),
                        );
                    }
                }
            });
    }

    fn draw_histogram(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        let stacked = artifact.layout().bar_mode == Some(BarMode::Relative);
        let (width, height) = Self::plot_size(ui, artifact);
        let (x_title, y_title) = Self::axis_titles(artifact);
        Plot::new(format!("figure_{}", artifact.chart_id()))
            .width(width)
            .height(height)
            .allow_scroll(false)
            .legend(Self::legend(artifact))
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                let mut offsets: Vec<f64> = Vec::new();
                for trace in artifact.traces() {
                    let Trace::Histogram(h) = trace else { continue };
                    if offsets.len() < h.bins.len() {
                        offsets.resize(h.bins.len(), 0.0);
                    }
                    let color = Self::color32(h.color).gamma_multiply(h.opacity);
                    let bars: Vec<Bar> = h
                        .bins
                        .iter()
                        .enumerate()
                        .map(|(i, bin)| {
                            let count = bin.count as f64;
                            let base = if stacked { offsets[i] } else { 0.0 };
                            if stacked {
                                offsets[i] += count;
                            }
                            Bar::new((bin.start + bin.end) / 2.0, count)
                                .base_offset(base)
                                .width(bin.end - bin.start)
                                .fill(color)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&h.name));
                }
            });
    }

    fn draw_pie(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        let slices = artifact.pie_slices();
        let (width, height) = Self::plot_size(ui, artifact);
        let (x_title, y_title) = Self::axis_titles(artifact);
        Plot::new(format!("figure_{}", artifact.chart_id()))
            .width(width)
            .height(height)
            .allow_scroll(false)
            .legend(Self::legend(artifact))
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .include_x(-1.1)
            .include_x(1.1)
            .include_y(-1.1)
            .include_y(1.1)
            .show(ui, |plot_ui| {
                // Clockwise from twelve o'clock.
                let mut angle = std::f64::consts::FRAC_PI_2;
                for slice in slices {
                    let sweep = slice.fraction * std::f64::consts::TAU;
                    let steps = ((sweep / 0.05).ceil() as usize).max(2);
                    let mut wedge = vec![[0.0, 0.0]];
                    for step in 0..=steps {
                        let a = angle - sweep * step as f64 / steps as f64;
                        wedge.push([a.cos(), a.sin()]);
                    }
                    let color = Self::color32(slice.color);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(wedge))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(format!(
                                "{} ({:.1}%)",
                                slice.label,
                                slice.fraction * 100.0
                            )),
                    );
                    angle -= sweep;
                }
            });
    }

    fn draw_geo(ui: &mut egui::Ui, artifact: &ChartArtifact) {
        let Some(geo) = artifact.layout().geo.clone() else {
            return;
        };

        // (lon, lat, hover text) of every point, for the hover label.
        let hover: Vec<(f64, f64, String)> = artifact
            .traces()
            .iter()
            .filter_map(|t| match t {
                Trace::ScatterGeo(g) => Some(g),
                _ => None,
            })
            .flat_map(|g| {
                g.points.iter().map(|p| {
                    let text = p
                        .hover
                        .iter()
                        .map(|(k, v)| format!("{k}: {v}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    (p.lon, p.lat, text)
                })
            })
            .collect();

        let (width, height) = Self::plot_size(ui, artifact);
        let (x_title, y_title) = Self::axis_titles(artifact);
        Plot::new(format!("figure_{}", artifact.chart_id()))
            .width(width)
            .height(height)
            .allow_scroll(false)
            .legend(Self::legend(artifact))
            .x_axis_label(x_title)
            .y_axis_label(y_title)
            .data_aspect(1.0)
            .include_x(geo.lon_range[0])
            .include_x(geo.lon_range[1])
            .include_y(geo.lat_range[0])
            .include_y(geo.lat_range[1])
            .label_formatter(move |_name, value: &PlotPoint| {
                let nearest = hover.iter().min_by(|a, b| {
                    let da = (a.0 - value.x).powi(2) + (a.1 - value.y).powi(2);
                    let db = (b.0 - value.x).powi(2) + (b.1 - value.y).powi(2);
                    da.total_cmp(&db)
                });
                match nearest {
                    Some((lon, lat, text))
                        if (lon - value.x).abs() < 2.0 && (lat - value.y).abs() < 2.0 =>
                    {
                        text.clone()
                    }
                    _ => format!("lon {:.2}, lat {:.2}", value.x, value.y),
                }
            })
            .show(ui, |plot_ui| {
                if geo.show_land {
                    let [lat0, lat1] = geo.lat_range;
                    let [lon0, lon1] = geo.lon_range;
                    let frame = Color32::from_gray(120);
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![
                            [lon0, lat0],
                            [lon1, lat0],
                            [lon1, lat1],
                            [lon0, lat1],
                            [lon0, lat0],
                        ]))
                        .color(frame),
                    );
                    if lat0 < 0.0 && lat1 > 0.0 {
                        plot_ui.line(
                            Line::new(PlotPoints::new(vec![[lon0, 0.0], [lon1, 0.0]]))
                                .color(Color32::from_gray(200)),
                        );
                    }
                }
                for trace in artifact.traces() {
                    let Trace::ScatterGeo(GeoTrace {
                        name,
                        color,
                        points,
                    }) = trace
                    else {
                        continue;
                    };
                    let series: PlotPoints = points.iter().map(|p| [p.lon, p.lat]).collect();
                    plot_ui.points(
                        Points::new(series)
                            .radius(3.5)
                            .color(Self::color32(*color))
                            .name(name),
                    );
                }
            });
    }
}
