use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};

/// One equal-width bin.  Bins are half-open except the last, which also
/// holds the maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Frequency histogram of one numeric column, kept as the session chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Build the histogram of `column`, ignoring gaps and non-finite values.
pub fn histogram(dataset: &Dataset, column: &str) -> AnalysisResult<Histogram> {
    let idx = dataset
        .column_index(column)
        .ok_or_else(|| AnalysisError::ColumnNotFound(column.to_string()))?;
    if !dataset.columns[idx].kind.is_numeric() {
        return Err(AnalysisError::NotNumeric(column.to_string()));
    }

    let values: Vec<f64> = dataset
        .numeric_values(idx)
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(AnalysisError::EmptySample(column.to_string()));
    }

    Ok(Histogram {
        column: column.to_string(),
        bins: sturges_bins(&values),
    })
}

/// Sturges' rule: `ceil(log2 n) + 1` equal-width bins spanning `[min, max]`.
///
/// A constant sample gets a single unit-width bin centred on its value.
pub fn sturges_bins(values: &[f64]) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![Bin {
            lower: min - 0.5,
            upper: min + 0.5,
            count: values.len(),
        }];
    }

    let k = (values.len() as f64).log2().ceil() as usize + 1;
    let width = (max - min) / k as f64;

    let mut bins: Vec<Bin> = (0..k)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == k { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let i = (((v - min) / width).floor() as usize).min(k - 1);
        bins[i].count += 1;
    }
    bins
}
