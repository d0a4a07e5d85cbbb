//! CSV Data Loader Module
//! Reads the raw event table with Polars before preparation.

use crate::error::{DashboardError, DashboardResult};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    ///
    /// Cells that fail type inference are read as null rather than aborting
    /// the whole load.
    pub fn load_csv(&mut self, file_path: &Path) -> DashboardResult<&DataFrame> {
        self.file_path = Some(file_path.to_path_buf());
        let df = Self::read_csv(file_path)?;
        self.df = Some(df);
        self.df
            .as_ref()
            .ok_or_else(|| DashboardError::DataFormat("no data loaded".to_string()))
    }

    /// Read a CSV file without keeping it in a loader.
    pub fn read_csv(file_path: &Path) -> DashboardResult<DataFrame> {
        let path_str = file_path.to_string_lossy();

        let df = LazyCsvReader::new(&*path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| {
                DashboardError::DataFormat(format!("failed to read {}: {}", path_str, e))
            })?;

        info!(
            path = %path_str,
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        Ok(df)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
