//! Quake Dashboard - Seismic Event Charts
//!
//! Loads a cleaned seismic-event CSV, derives the columns the charts need and
//! renders a registry of declarative chart specs into display-ready figures.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod stats;
pub mod telemetry;

#[cfg(feature = "gui")]
pub mod gui;

pub use charts::{ChartArtifact, ChartKind, ChartRegistry, ChartSpec};
pub use config::DashboardConfig;
pub use data::{DataLoader, Dataset, DatasetPreparer, EventRecord};
pub use error::{DashboardError, DashboardResult};
