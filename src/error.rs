use polars::prelude::PolarsError;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("malformed dataset: {0}")]
    DataFormat(String),

    #[error("invalid data: {0}")]
    DataValidation(String),

    #[error("unknown chart: {0}")]
    UnknownChart(String),

    #[error("chart id already registered: {0}")]
    DuplicateId(String),

    #[error("chart '{chart}' binds column '{column}' which is not in the dataset")]
    MissingColumn { chart: String, column: String },

    #[error("invalid chart spec '{id}': {reason}")]
    InvalidSpec { id: String, reason: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("chart export failed: {0}")]
    Export(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
