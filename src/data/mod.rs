//! Data module - CSV loading and dataset preparation

mod dataset;
mod loader;
mod preparer;

pub use dataset::{columns, Dataset, EventRecord};
pub use loader::DataLoader;
pub use preparer::{country_from_location, DatasetPreparer};
