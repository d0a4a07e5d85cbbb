//! Control Panel Widget
//! Left side panel with the data source, chart list and export controls.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// One registered chart as listed in the panel.
#[derive(Debug, Clone)]
pub struct ChartEntry {
    pub id: String,
    pub kind: &'static str,
    pub rendered: Option<bool>,
}

/// Left side control panel.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub row_count: Option<usize>,
    pub charts: Vec<ChartEntry>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            row_count: None,
            charts: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_charts(&mut self, charts: Vec<ChartEntry>) {
        self.charts = charts;
    }

    /// Mark which charts rendered, by id.
    pub fn mark_rendered(&mut self, outcomes: &[(String, bool)]) {
        for entry in &mut self.charts {
            entry.rendered = outcomes
                .iter()
                .find(|(id, _)| *id == entry.id)
                .map(|(_, ok)| *ok);
        }
        self.export_enabled = outcomes.iter().any(|(_, ok)| *ok);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌋 Quake Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                if let Some(rows) = self.row_count {
                    ui.label(RichText::new(format!("{rows} events")).size(11.0));
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Charts =====
        ui.label(RichText::new("📈 Charts").size(14.0).strong());
        ui.add_space(5.0);

        for entry in &self.charts {
            ui.horizontal(|ui| {
                let (mark, color) = match entry.rendered {
                    Some(true) => ("✔", Color32::from_rgb(40, 167, 69)),
                    Some(false) => ("✖", Color32::from_rgb(220, 53, 69)),
                    None => ("•", Color32::GRAY),
                };
                ui.label(RichText::new(mark).color(color));
                ui.label(&entry.id);
                ui.label(RichText::new(entry.kind).size(11.0).color(Color32::GRAY));
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Actions =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.csv_path.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("🔄 Reload").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let export_button = egui::Button::new(RichText::new("💾 Export").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export_button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    Export,
}
