//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod figure_plotter;

pub use app::DashboardApp;
pub use chart_viewer::{ChartViewer, RenderedChart};
pub use control_panel::{ChartEntry, ControlPanel, ControlPanelAction};
pub use figure_plotter::FigurePlotter;
