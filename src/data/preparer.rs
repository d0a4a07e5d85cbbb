//! Dataset Preparer Module
//! Checks the raw event table and derives the `country` column.

use crate::data::columns;
use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use polars::prelude::*;
use tracing::{debug, warn};

/// Extract the country from a `"<state>,<country>"` or `"<country>"` location.
///
/// The segment after the last comma is used; surrounding whitespace is trimmed.
pub fn country_from_location(location: &str) -> String {
    match location.rsplit_once(',') {
        Some((_, country)) => country.trim().to_string(),
        None => location.trim().to_string(),
    }
}

/// Turns a raw table into an immutable [`Dataset`].
pub struct DatasetPreparer;

impl DatasetPreparer {
    /// Validate and prepare a raw event table.
    ///
    /// Fails with [`DashboardError::DataFormat`] if a required column is
    /// missing or the table has no rows.
    pub fn prepare(raw: &DataFrame) -> DashboardResult<Dataset> {
        let available: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<&str> = columns::REQUIRED
            .iter()
            .copied()
            .filter(|name| !available.iter().any(|c| c == *name))
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::DataFormat(format!(
                "missing columns: {}. Available columns: {}",
                missing.join(", "),
                available.join(", ")
            )));
        }

        if raw.height() == 0 {
            return Err(DashboardError::DataFormat("table has no rows".to_string()));
        }

        Self::derive(raw)
    }

    /// Normalise column types and add `country`. Accepts empty tables.
    pub(crate) fn derive(raw: &DataFrame) -> DashboardResult<Dataset> {
        let mut df = raw.clone();

        for name in columns::NUMERIC {
            let cast = df.column(name)?.cast(&DataType::Float64)?;
            df.with_column(cast)?;
        }
        for name in columns::TEXT {
            let cast = df.column(name)?.cast(&DataType::String)?;
            df.with_column(cast)?;
        }

        let countries: Vec<String> = df
            .column(columns::LOCATION)?
            .str()?
            .into_iter()
            .map(|location| location.map(country_from_location).unwrap_or_default())
            .collect();

        let blank = countries.iter().filter(|c| c.is_empty()).count();
        if blank > 0 {
            warn!(rows = blank, "records without a country in state_country");
        }

        df.with_column(Column::new(columns::COUNTRY.into(), countries))?;
        debug!(rows = df.height(), "prepared dataset");

        Ok(Dataset::from_prepared(df))
    }
}
