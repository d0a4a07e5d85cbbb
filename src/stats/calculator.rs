//! Statistics Calculator Module
//! Box plot summaries and histogram binning for the chart renderers.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus outliers for a single box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub std: f64,
    pub outliers: Vec<f64>,
}

/// One histogram bucket, half-open `[start, end)` except the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Shared bucket edges for every series of a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    pub start: f64,
    pub width: f64,
    pub count: usize,
}

impl BinEdges {
    /// Bucket index for a value, `None` outside the edges.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        let end = self.start + self.width * self.count as f64;
        if value < self.start || value > end {
            return None;
        }
        let idx = ((value - self.start) / self.width).floor() as usize;
        Some(idx.min(self.count - 1))
    }

    pub fn bucket(&self, values: impl IntoIterator<Item = f64>) -> Vec<HistogramBin> {
        let mut counts = vec![0usize; self.count];
        for v in values {
            if let Some(idx) = self.index_of(v) {
                counts[idx] += 1;
            }
        }
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: self.start + self.width * i as f64,
                end: self.start + self.width * (i + 1) as f64,
                count,
            })
            .collect()
    }
}

/// Stateless statistics helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the box summary of the finite values, `None` if there are none.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        let std = if sorted.len() > 1 {
            sorted.iter().std_dev()
        } else {
            0.0
        };

        Some(BoxSummary {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            mean: sorted.iter().mean(),
            std,
            outliers,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pick bucket edges covering every finite value.
    ///
    /// With no requested count, Sturges' rule picks it. The width is rounded
    /// up to a 1/2/2.5/5 multiple of a power of ten and the start snapped to it.
    pub fn bin_edges(values: &[f64], requested: Option<usize>) -> Option<BinEdges> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let target = requested
            .filter(|&n| n > 0)
            .unwrap_or_else(|| ((finite.len() as f64).log2().ceil() as usize + 1).max(1));

        let span = max - min;
        if span <= 0.0 {
            return Some(BinEdges {
                start: min - 0.5,
                width: 1.0,
                count: 1,
            });
        }

        let width = Self::nice_width(span / target as f64);
        let start = (min / width).floor() * width;
        let count = (((max - start) / width).floor() as usize + 1).max(1);
        Some(BinEdges {
            start,
            width,
            count,
        })
    }

    fn nice_width(raw: f64) -> f64 {
        let magnitude = 10f64.powf(raw.log10().floor());
        let normalized = raw / magnitude;
        let step = [1.0, 2.0, 2.5, 5.0, 10.0]
            .into_iter()
            .find(|&s| normalized <= s)
            .unwrap_or(10.0);
        step * magnitude
    }
}
