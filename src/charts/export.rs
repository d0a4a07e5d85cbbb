//! Static Chart Renderer
//! Writes chart artifacts as JSON figures, SVG documents or PNG images.
//!
//! Images carry the chart geometry only (bars, boxes, bins, wedges, points
//! and the map frame). Titles, axis labels and hover text stay in the JSON
//! figure so no font backend is needed.

use crate::charts::artifact::{BarTrace, BoxTrace, GeoTrace, HistogramTrace, PieTrace, Trace};
use crate::charts::{BarMode, ChartArtifact, ChartKind, Color as ChartColor};
use crate::config::{ExportConfig, ExportFormat};
use crate::error::{DashboardError, DashboardResult};
use indexmap::IndexMap;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::info;

const MARGIN: u32 = 24;
const BOX_FILL_ALPHA: f64 = 0.3;
const GRID: RGBColor = RGBColor(200, 200, 200);
const LAND_FRAME: RGBColor = RGBColor(120, 120, 120);

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Pixel size of an artifact, falling back to the given default per axis.
    pub fn dimensions(artifact: &ChartArtifact, default: (u32, u32)) -> (u32, u32) {
        let layout = artifact.layout();
        (
            layout.width.unwrap_or(default.0).max(MARGIN * 4),
            layout.height.unwrap_or(default.1).max(MARGIN * 4),
        )
    }

    pub fn to_json(artifact: &ChartArtifact) -> DashboardResult<String> {
        Ok(serde_json::to_string_pretty(artifact)?)
    }

    pub fn to_svg(artifact: &ChartArtifact, size: (u32, u32)) -> DashboardResult<String> {
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
            Self::draw(&root, artifact)
                .and_then(|_| root.present())
                .map_err(|e| DashboardError::Export(e.to_string()))?;
        }
        Ok(buffer)
    }

    /// Render to an in-memory PNG file.
    pub fn to_png(artifact: &ChartArtifact, size: (u32, u32)) -> DashboardResult<Vec<u8>> {
        let (width, height) = size;
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
            Self::draw(&root, artifact)
                .and_then(|_| root.present())
                .map_err(|e| DashboardError::Export(e.to_string()))?;
        }

        let image = image::RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| DashboardError::Export("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| DashboardError::Export(e.to_string()))?;
        Ok(bytes)
    }

    /// Write every artifact in every configured format, returning the files written.
    pub fn export_artifacts(
        artifacts: &[ChartArtifact],
        config: &ExportConfig,
    ) -> DashboardResult<Vec<PathBuf>> {
        fs::create_dir_all(&config.output_dir)?;

        let mut written = Vec::new();
        for artifact in artifacts {
            let size = Self::dimensions(artifact, (config.width, config.height));
            for format in &config.formats {
                let path = config
                    .output_dir
                    .join(format!("{}.{}", artifact.chart_id(), format.extension()));
                match format {
                    ExportFormat::Json => fs::write(&path, Self::to_json(artifact)?)?,
                    ExportFormat::Svg => fs::write(&path, Self::to_svg(artifact, size)?)?,
                    ExportFormat::Png => fs::write(&path, Self::to_png(artifact, size)?)?,
                }
                written.push(path);
            }
        }

        info!(
            dir = %config.output_dir.display(),
            files = written.len(),
            "exported charts"
        );
        Ok(written)
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let area = root.margin(MARGIN, MARGIN, MARGIN, MARGIN);

        let bar_mode = artifact.layout().bar_mode.unwrap_or_default();
        match artifact.kind() {
            ChartKind::Bar => Self::draw_bars(&area, artifact, bar_mode),
            ChartKind::Box => Self::draw_box(&area, artifact),
            ChartKind::Histogram => Self::draw_histogram(&area, artifact, bar_mode),
            ChartKind::Pie => Self::draw_pie(&area, artifact),
            ChartKind::GeoScatter => Self::draw_geo(&area, artifact),
        }
    }

    fn rgb(color: ChartColor) -> RGBColor {
        RGBColor(color.r, color.g, color.b)
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
        mode: BarMode,
    ) -> DrawResult<DB> {
        let bars: Vec<&BarTrace> = artifact
            .traces()
            .iter()
            .filter_map(|t| match t {
                Trace::Bar(bar) => Some(bar),
                _ => None,
            })
            .collect();

        let categories: IndexMap<String, f64> = artifact.bar_counts();
        let tallest = match mode {
            BarMode::Relative => categories.values().copied().fold(0.0, f64::max),
            BarMode::Group | BarMode::Overlay => bars
                .iter()
                .flat_map(|b| b.y.iter().copied())
                .fold(0.0, f64::max),
        };
        let y_max = if tallest > 0.0 { tallest * 1.1 } else { 1.0 };
        let n = categories.len().max(1) as f64;

        let mut chart = ChartBuilder::on(area).build_cartesian_2d(-0.5..n - 0.5, 0.0..y_max)?;

        let mut stacked = vec![0.0f64; categories.len()];
        let group_width = 0.8 / bars.len().max(1) as f64;
        for (series, bar) in bars.iter().enumerate() {
            let style = Self::rgb(bar.color).filled();
            let mut rects = Vec::with_capacity(bar.x.len());
            for (x, y) in bar.x.iter().zip(bar.y.iter()) {
                let Some(idx) = categories.get_index_of(x) else {
                    continue;
                };
                let center = idx as f64;
                let (left, right, base) = match mode {
                    BarMode::Relative => (center - 0.4, center + 0.4, stacked[idx]),
                    BarMode::Overlay => (center - 0.4, center + 0.4, 0.0),
                    BarMode::Group => {
                        let left = center - 0.4 + group_width * series as f64;
                        (left, left + group_width, 0.0)
                    }
                };
                if mode == BarMode::Relative {
                    stacked[idx] += y;
                }
                rects.push(Rectangle::new([(left, base), (right, base + y)], style));
            }
            chart.draw_series(rects)?;
        }
        Ok(())
    }

    fn draw_box<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
    ) -> DrawResult<DB> {
        let boxes: Vec<&BoxTrace> = artifact
            .traces()
            .iter()
            .filter_map(|t| match t {
                Trace::Box(b) => Some(b),
                _ => None,
            })
            .collect();

        let (lo, hi) = boxes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, b| {
            (acc.0.min(b.summary.min), acc.1.max(b.summary.max))
        });
        let (lo, hi) = if lo.is_finite() && hi > lo {
            let pad = (hi - lo) * 0.1;
            (lo - pad, hi + pad)
        } else if lo.is_finite() {
            (lo - 1.0, lo + 1.0)
        } else {
            (0.0, 1.0)
        };

        let n = boxes.len().max(1) as f64;
        let mut chart = ChartBuilder::on(area).build_cartesian_2d(-0.5..n - 0.5, lo..hi)?;

        for (i, b) in boxes.iter().enumerate() {
            let color = Self::rgb(b.color);
            let s = &b.summary;
            let x = i as f64;
            let corners = [(x - 0.25, s.q1), (x + 0.25, s.q3)];
            chart.draw_series([
                Rectangle::new(corners, color.mix(BOX_FILL_ALPHA).filled()),
                Rectangle::new(corners, color.stroke_width(2)),
            ])?;
            chart.draw_series([
                PathElement::new(
                    vec![(x - 0.25, s.median), (x + 0.25, s.median)],
                    color.stroke_width(2),
                ),
                PathElement::new(vec![(x, s.q3), (x, s.upper_whisker)], color.stroke_width(1)),
                PathElement::new(vec![(x, s.q1), (x, s.lower_whisker)], color.stroke_width(1)),
                PathElement::new(
                    vec![(x - 0.1, s.upper_whisker), (x + 0.1, s.upper_whisker)],
                    color.stroke_width(1),
                ),
                PathElement::new(
                    vec![(x - 0.1, s.lower_whisker), (x + 0.1, s.lower_whisker)],
                    color.stroke_width(1),
                ),
            ])?;
            chart.draw_series(
                s.outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 3, color.stroke_width(1))),
            )?;
        }
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
        mode: BarMode,
    ) -> DrawResult<DB> {
        let series: Vec<&HistogramTrace> = artifact
            .traces()
            .iter()
            .filter_map(|t| match t {
                Trace::Histogram(h) => Some(h),
                _ => None,
            })
            .collect();

        // Nothing binned: leave the blank background.
        let Some(first) = series.first() else {
            return Ok(());
        };
        let bin_count = first.bins.len();
        let x_lo = first.bins.first().map(|b| b.start).unwrap_or(0.0);
        let x_hi = first.bins.last().map(|b| b.end).unwrap_or(1.0);

        let tallest = match mode {
            BarMode::Relative => (0..bin_count)
                .map(|i| series.iter().map(|s| s.bins[i].count).sum::<usize>())
                .max()
                .unwrap_or(0),
            BarMode::Group | BarMode::Overlay => series
                .iter()
                .flat_map(|s| s.bins.iter().map(|b| b.count))
                .max()
                .unwrap_or(0),
        } as f64;
        let y_max = if tallest > 0.0 { tallest * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(area).build_cartesian_2d(x_lo..x_hi, 0.0..y_max)?;

        let mut stacked = vec![0.0f64; bin_count];
        let slot = 1.0 / series.len() as f64;
        for (n, s) in series.iter().enumerate() {
            let style = Self::rgb(s.color).mix(f64::from(s.opacity)).filled();
            let mut rects = Vec::with_capacity(s.bins.len());
            for (i, bin) in s.bins.iter().enumerate() {
                let count = bin.count as f64;
                let (left, right, base) = match mode {
                    BarMode::Relative => (bin.start, bin.end, stacked[i]),
                    BarMode::Overlay => (bin.start, bin.end, 0.0),
                    BarMode::Group => {
                        let width = bin.end - bin.start;
                        let left = bin.start + width * slot * n as f64;
                        (left, left + width * slot, 0.0)
                    }
                };
                stacked[i] += count;
                if count > 0.0 {
                    rects.push(Rectangle::new([(left, base), (right, base + count)], style));
                }
            }
            chart.draw_series(rects)?;
        }
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
    ) -> DrawResult<DB> {
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) / 2.0;

        let pie: Option<&PieTrace> = artifact.traces().iter().find_map(|t| match t {
            Trace::Pie(p) => Some(p),
            _ => None,
        });
        let Some(pie) = pie.filter(|p| !p.slices.is_empty()) else {
            return area.draw(&Circle::new(center, radius as i32, GRID.stroke_width(1)));
        };

        // Clockwise from twelve o'clock.
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for slice in &pie.slices {
            let sweep = slice.fraction * std::f64::consts::TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut points = vec![center];
            for step in 0..=steps {
                let a = angle + sweep * step as f64 / steps as f64;
                points.push((
                    center.0 + (radius * a.cos()).round() as i32,
                    center.1 + (radius * a.sin()).round() as i32,
                ));
            }
            area.draw(&Polygon::new(points, Self::rgb(slice.color).filled()))?;
            angle += sweep;
        }
        Ok(())
    }

    fn draw_geo<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        artifact: &ChartArtifact,
    ) -> DrawResult<DB> {
        let (lat_range, lon_range, show_land) = artifact
            .layout()
            .geo
            .as_ref()
            .map(|g| (g.lat_range, g.lon_range, g.show_land))
            .unwrap_or(([-90.0, 90.0], [-180.0, 180.0], true));

        let mut chart = ChartBuilder::on(area).build_cartesian_2d(
            lon_range[0]..lon_range[1],
            lat_range[0]..lat_range[1],
        )?;

        if show_land {
            chart.draw_series([Rectangle::new(
                [(lon_range[0], lat_range[0]), (lon_range[1], lat_range[1])],
                LAND_FRAME.stroke_width(1),
            )])?;
        }
        if show_land && lat_range[0] < 0.0 && lat_range[1] > 0.0 {
            chart.draw_series([PathElement::new(
                vec![(lon_range[0], 0.0), (lon_range[1], 0.0)],
                GRID.stroke_width(1),
            )])?;
        }

        for trace in artifact.traces() {
            if let Trace::ScatterGeo(GeoTrace { color, points, .. }) = trace {
                let style = Self::rgb(*color).filled();
                chart.draw_series(
                    points
                        .iter()
                        .filter(|p| {
                            (lat_range[0]..=lat_range[1]).contains(&p.lat)
                                && (lon_range[0]..=lon_range[1]).contains(&p.lon)
                        })
                        .map(|p| Circle::new((p.lon, p.lat), 4, style)),
                )?;
            }
        }
        Ok(())
    }
}
