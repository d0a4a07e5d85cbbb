//! Quake Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartRegistry, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset, DatasetPreparer};
use crate::gui::chart_viewer::RenderedChart;
use crate::gui::control_panel::ChartEntry;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { dataset: Dataset, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    registry: ChartRegistry,
    dataset: Option<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        registry: ChartRegistry,
    ) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.set_charts(
            registry
                .specs()
                .map(|spec| ChartEntry {
                    id: spec.id.clone(),
                    kind: spec.kind.as_str(),
                    rendered: None,
                })
                .collect(),
        );

        let mut app = Self {
            config,
            registry,
            dataset: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        let initial = app.config.data_path.clone();
        if initial.exists() {
            app.start_load(initial);
        }
        app
    }

    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Read and prepare the CSV in a background thread.
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }
        self.chart_viewer.clear();
        self.dataset = None;
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.row_count = None;
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            let result = DataLoader::read_csv(&path).and_then(|raw| {
                let _ = tx.send(LoadResult::Progress("Preparing dataset...".to_string()));
                DatasetPreparer::prepare(&raw)
            });

            let _ = match result {
                Ok(dataset) => tx.send(LoadResult::Complete { dataset, path }),
                Err(e) => tx.send(LoadResult::Error(e.to_string())),
            };
        });
    }

    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_progress(30.0, &status);
                }
                LoadResult::Complete { dataset, path } => {
                    info!(path = %path.display(), rows = dataset.len(), "dataset ready");
                    self.control_panel.row_count = Some(dataset.len());
                    self.dataset = Some(dataset);
                    self.render_charts();
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
                LoadResult::Error(e) => {
                    error!(error = %e, "load failed");
                    self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    fn render_charts(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };
        self.control_panel.set_progress(60.0, "Rendering charts...");

        let results = self.registry.render_all(dataset);
        let outcomes: Vec<(String, bool)> = results
            .iter()
            .map(|(id, result)| (id.clone(), result.is_ok()))
            .collect();
        let charts: Vec<RenderedChart> = results
            .into_iter()
            .map(|(id, result)| {
                if let Err(e) = &result {
                    error!(chart = %id, error = %e, "render failed");
                }
                RenderedChart {
                    caption: self
                        .registry
                        .get(&id)
                        .and_then(|spec| spec.display.caption.clone()),
                    result: result.map_err(|e| e.to_string()),
                    id,
                }
            })
            .collect();

        let ok = outcomes.iter().filter(|(_, ok)| *ok).count();
        self.control_panel.mark_rendered(&outcomes);
        self.chart_viewer.set_charts(charts);
        self.control_panel.set_progress(
            100.0,
            &format!("Complete! {} of {} charts ready", ok, outcomes.len()),
        );
    }

    fn handle_export(&mut self) {
        let artifacts = self.chart_viewer.artifacts();
        if artifacts.is_empty() {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.config.export.output_dir)
            .pick_folder()
        else {
            return;
        };

        let mut export = self.config.export.clone();
        export.output_dir = dir;
        match StaticChartRenderer::export_artifacts(&artifacts, &export) {
            Ok(files) => self.control_panel.set_progress(
                100.0,
                &format!("Complete! Exported {} files", files.len()),
            ),
            Err(e) => {
                error!(error = %e, "export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => {
                            if let Some(path) = self.control_panel.csv_path.clone() {
                                self.start_load(path);
                            }
                        }
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
