//! Prepared, immutable event table shared by every chart render.

use crate::error::{DashboardError, DashboardResult};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::preparer::DatasetPreparer;

/// Column names of the cleaned seismic dataset.
pub mod columns {
    pub const EVENT_TYPE: &str = "type";
    pub const MAGNITUDE: &str = "mag";
    pub const DEPTH: &str = "depth";
    pub const STATUS: &str = "status";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const LOCATION: &str = "state_country";
    /// Derived from [`LOCATION`] during preparation.
    pub const COUNTRY: &str = "country";

    /// Columns the raw table must carry.
    pub const REQUIRED: [&str; 7] = [
        EVENT_TYPE, MAGNITUDE, DEPTH, STATUS, LATITUDE, LONGITUDE, LOCATION,
    ];
    pub const NUMERIC: [&str; 4] = [MAGNITUDE, DEPTH, LATITUDE, LONGITUDE];
    pub const TEXT: [&str; 3] = [EVENT_TYPE, STATUS, LOCATION];
}

/// One seismic event, used to build a [`Dataset`] without going through CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub event_type: String,
    pub mag: f64,
    pub depth: f64,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state_country: String,
}

impl EventRecord {
    pub fn new(event_type: &str, mag: f64, depth: f64, status: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            mag,
            depth,
            status: status.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            state_country: String::new(),
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64, state_country: &str) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self.state_country = state_country.to_string();
        self
    }
}

/// Prepared event table. Cloning is cheap: Polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    pub(crate) fn from_prepared(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Build a dataset from in-memory records. Zero records is allowed.
    pub fn from_records(records: &[EventRecord]) -> DashboardResult<Self> {
        let raw = DataFrame::new(vec![
            Column::new(
                columns::EVENT_TYPE.into(),
                records.iter().map(|r| r.event_type.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::MAGNITUDE.into(),
                records.iter().map(|r| r.mag).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::DEPTH.into(),
                records.iter().map(|r| r.depth).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::STATUS.into(),
                records.iter().map(|r| r.status.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::LATITUDE.into(),
                records.iter().map(|r| r.latitude).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::LONGITUDE.into(),
                records.iter().map(|r| r.longitude).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::LOCATION.into(),
                records
                    .iter()
                    .map(|r| r.state_country.clone())
                    .collect::<Vec<_>>(),
            ),
        ])?;

        DatasetPreparer::derive(&raw)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Values of a column rendered as text. Nulls become empty strings.
    pub fn text_values(&self, name: &str) -> DashboardResult<Vec<String>> {
        let column = self.frame.column(name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        Ok(values)
    }

    /// Values of a column rendered as text, keeping nulls as `None`.
    pub fn category_values(&self, name: &str) -> DashboardResult<Vec<Option<String>>> {
        let column = self.frame.column(name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Values of a column as `f64`. Cells that are null or not numeric are `None`.
    pub fn numeric_values(&self, name: &str) -> DashboardResult<Vec<Option<f64>>> {
        let column = self.frame.column(name)?.cast(&DataType::Float64)?;
        let values = column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    pub fn countries(&self) -> DashboardResult<Vec<String>> {
        self.text_values(columns::COUNTRY)
    }

    /// Check every row has a latitude in [-90, 90] and a longitude in [-180, 180].
    pub fn validate_coordinates(&self, lat_col: &str, lon_col: &str) -> DashboardResult<()> {
        let lats = self.numeric_values(lat_col)?;
        let lons = self.numeric_values(lon_col)?;

        for (row, (lat, lon)) in lats.iter().zip(lons.iter()).enumerate() {
            check_bound(row, lat_col, *lat, 90.0)?;
            check_bound(row, lon_col, *lon, 180.0)?;
        }
        Ok(())
    }
}

fn check_bound(row: usize, name: &str, value: Option<f64>, limit: f64) -> DashboardResult<()> {
    match value {
        Some(v) if (-limit..=limit).contains(&v) => Ok(()),
        Some(v) => Err(DashboardError::DataValidation(format!(
            "row {row}: {name} {v} outside [-{limit}, {limit}]"
        ))),
        None => Err(DashboardError::DataValidation(format!(
            "row {row}: {name} is missing"
        ))),
    }
}
