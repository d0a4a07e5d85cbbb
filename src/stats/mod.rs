//! Stats module - Box summaries and histogram binning

mod calculator;

pub use calculator::{BinEdges, BoxSummary, HistogramBin, StatsCalculator, WHISKER_IQR};
