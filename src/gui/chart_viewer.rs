//! Chart Viewer Widget
//! Scrollable page showing each rendered chart under its caption.

use crate::charts::ChartArtifact;
use crate::gui::FigurePlotter;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const PAGE_TITLE: &str = "SEISMIC EVENT ANALYSIS";
const PAGE_INTRO: &str = "The plots below show the distributions of seismic events \
    between September 1st, 2023 and November 15th, 2023.";

/// One chart slot: the rendered figure or the reason it could not be rendered.
pub struct RenderedChart {
    pub id: String,
    pub caption: Option<String>,
    pub result: Result<ChartArtifact, String>,
}

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: Vec<RenderedChart>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.charts.clear();
    }

    pub fn set_charts(&mut self, charts: Vec<RenderedChart>) {
        self.charts = charts;
    }

    /// Successfully rendered artifacts, in display order.
    pub fn artifacts(&self) -> Vec<ChartArtifact> {
        self.charts
            .iter()
            .filter_map(|c| c.result.as_ref().ok().cloned())
            .collect()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(PAGE_TITLE).size(28.0).strong());
                ui.add_space(5.0);
                ui.label(PAGE_INTRO);
                ui.add_space(CHART_SPACING);

                for chart in &self.charts {
                    Self::draw_chart_card(ui, chart);
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &RenderedChart) {
        if let Some(caption) = &chart.caption {
            ui.label(RichText::new(caption).monospace().size(13.0));
            ui.add_space(5.0);
        }

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .inner_margin(12.0)
            .show(ui, |ui| match &chart.result {
                Ok(artifact) => FigurePlotter::draw(ui, artifact),
                Err(error) => {
                    ui.label(
                        RichText::new(format!("⚠ {}: {}", chart.id, error))
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }
            });
    }
}
