use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::data::model::{CellValue, Dataset};

/// Row labels of the numeric summary.
pub const NUMERIC_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Row labels used when the dataset has no numeric column.
pub const CATEGORICAL_STATS: [&str; 4] = ["count", "unique", "top", "freq"];

// ---------------------------------------------------------------------------
// DescriptiveStats – statistic × column table
// ---------------------------------------------------------------------------

/// Summary table: one row per statistic, one column per described column.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub columns: Vec<String>,
    pub labels: Vec<&'static str>,
    /// `cells[stat][column]`.
    pub cells: Vec<Vec<CellValue>>,
}

impl DescriptiveStats {
    /// Look up one statistic by label and column name.
    pub fn get(&self, label: &str, column: &str) -> Option<&CellValue> {
        let r = self.labels.iter().position(|l| *l == label)?;
        let c = self.columns.iter().position(|n| n == column)?;
        Some(&self.cells[r][c])
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fixed-width plain-text rendering, label column first.
    pub fn to_text(&self) -> String {
        self.to_text_wrapped(usize::MAX)
    }

    /// Like [`to_text`](Self::to_text), but columns that would push a line
    /// past `max_width` characters continue in a further block below,
    /// separated by a blank line.  Every block repeats the label column.
    pub fn to_text_wrapped(&self, max_width: usize) -> String {
        if self.columns.is_empty() {
            return "Empty DataFrame".to_string();
        }

        let rendered: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(format_cell).collect())
            .collect();

        let label_width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                rendered
                    .iter()
                    .map(|row| row[c].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        // Split column indices into blocks that fit the width.
        let mut blocks: Vec<std::ops::Range<usize>> = Vec::new();
        let mut start = 0;
        let mut line = label_width;
        for (c, w) in widths.iter().enumerate() {
            if c > start && line + 2 + w > max_width {
                blocks.push(start..c);
                start = c;
                line = label_width;
            }
            line += 2 + w;
        }
        blocks.push(start..widths.len());

        let mut out = String::new();
        for (b, block) in blocks.into_iter().enumerate() {
            if b > 0 {
                out.push_str("\n\n");
            }
            let _ = write!(out, "{:label_width$}", "");
            for c in block.clone() {
                let (name, w) = (&self.columns[c], widths[c]);
                let _ = write!(out, "  {name:>w$}");
            }
            for (label, row) in self.labels.iter().zip(&rendered) {
                out.push('\n');
                let _ = write!(out, "{label:<label_width$}");
                for c in block.clone() {
                    let w = widths[c];
                    let _ = write!(out, "  {:>w$}", row[c]);
                }
            }
        }
        out
    }
}

fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Float(v) if v.is_nan() => "NaN".to_string(),
        CellValue::Float(v) => format!("{v:.6}"),
        CellValue::Null => "NaN".to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Summarise every numeric column; falls back to a categorical summary of the
/// remaining columns when there is no numeric column at all.
pub fn describe(dataset: &Dataset) -> DescriptiveStats {
    let numeric = dataset.numeric_indices();
    if numeric.is_empty() {
        return describe_categorical(dataset);
    }

    let per_column: Vec<[f64; 8]> = numeric
        .iter()
        .map(|&idx| {
            let values: Vec<f64> = dataset.numeric_values(idx).into_iter().flatten().collect();
            numeric_summary(&values)
        })
        .collect();

    let cells = (0..NUMERIC_STATS.len())
        .map(|stat| per_column.iter().map(|s| CellValue::Float(s[stat])).collect())
        .collect();

    DescriptiveStats {
        columns: numeric.iter().map(|&i| dataset.columns[i].name.clone()).collect(),
        labels: NUMERIC_STATS.to_vec(),
        cells,
    }
}

/// `[count, mean, std, min, 25%, 50%, 75%, max]`; undefined entries are NaN.
pub fn numeric_summary(values: &[f64]) -> [f64; 8] {
    let n = values.len();
    if n == 0 {
        return [0.0, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN];
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    [
        n as f64,
        mean,
        std,
        sorted[0],
        quantile_sorted(&sorted, 0.25),
        quantile_sorted(&sorted, 0.50),
        quantile_sorted(&sorted, 0.75),
        sorted[n - 1],
    ]
}

/// Linear interpolation between the two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn describe_categorical(dataset: &Dataset) -> DescriptiveStats {
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); CATEGORICAL_STATS.len()];

    for idx in 0..dataset.width() {
        let mut freq: BTreeMap<&CellValue, usize> = BTreeMap::new();
        for cell in dataset.column_cells(idx).filter(|c| !c.is_null()) {
            *freq.entry(cell).or_insert(0) += 1;
        }
        let count: usize = freq.values().sum();
        // Highest count wins; ties go to the smallest value.
        let top = freq
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(v, n)| ((*v).clone(), *n));

        cells[0].push(CellValue::Integer(count as i64));
        cells[1].push(CellValue::Integer(freq.len() as i64));
        match top {
            Some((value, n)) => {
                cells[2].push(value);
                cells[3].push(CellValue::Integer(n as i64));
            }
            None => {
                cells[2].push(CellValue::Null);
                cells[3].push(CellValue::Null);
            }
        }
    }

    DescriptiveStats {
        columns: dataset.column_names(),
        labels: CATEGORICAL_STATS.to_vec(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    fn stat(stats: &DescriptiveStats, label: &str, column: &str) -> f64 {
        stats.get(label, column).and_then(CellValue::as_f64).unwrap()
    }

    #[test]
    fn numeric_columns_only() {
        let ds = load_csv_reader("name,a,b\nx,1,2\ny,2,\nz,3,4\nw,4,6\n".as_bytes()).unwrap();
        let stats = describe(&ds);

        assert_eq!(stats.columns, vec!["a", "b"]);
        assert_eq!(stat(&stats, "count", "a"), 4.0);
        assert_eq!(stat(&stats, "count", "b"), 3.0);
        assert_eq!(stat(&stats, "mean", "a"), 2.5);
        assert!((stat(&stats, "std", "a") - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(stat(&stats, "min", "a"), 1.0);
        assert_eq!(stat(&stats, "25%", "a"), 1.75);
        assert_eq!(stat(&stats, "50%", "a"), 2.5);
        assert_eq!(stat(&stats, "75%", "a"), 3.25);
        assert_eq!(stat(&stats, "max", "b"), 6.0);
    }

    #[test]
    fn undefined_values_are_nan() {
        let summary = numeric_summary(&[5.0]);
        assert_eq!(summary[0], 1.0);
        assert!(summary[2].is_nan());
        assert_eq!(summary[5], 5.0);

        let empty = numeric_summary(&[]);
        assert_eq!(empty[0], 0.0);
        assert!(empty[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn categorical_fallback() {
        let ds = load_csv_reader("city\nOslo\nLima\nOslo\n\n".as_bytes()).unwrap();
        let stats = describe(&ds);
        assert_eq!(stats.labels, CATEGORICAL_STATS.to_vec());
        assert_eq!(stats.get("count", "city"), Some(&CellValue::Integer(3)));
        assert_eq!(stats.get("unique", "city"), Some(&CellValue::Integer(2)));
        assert_eq!(stats.get("top", "city"), Some(&CellValue::Text("Oslo".into())));
        assert_eq!(stats.get("freq", "city"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn text_rendering_is_aligned() {
        let ds = load_csv_reader("a,long_name\n1,10\n3,30\n".as_bytes()).unwrap();
        let text = describe(&ds).to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].ends_with("long_name"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[2].contains("2.000000"));
        let width = lines[0].len();
        assert!(lines.iter().all(|l| l.len() == width));
    }

    #[test]
    fn wrapped_text_splits_into_blocks() {
        let ds = load_csv_reader("alpha,beta,gamma\n1,2,3\n4,5,6\n".as_bytes()).unwrap();
        let stats = describe(&ds);
        let text = stats.to_text_wrapped(30);
        let blocks: Vec<&str> = text.split("\n\n").collect();

        assert!(blocks.len() > 1);
        assert!(text.lines().all(|l| l.len() <= 30));
        for name in ["alpha", "beta", "gamma"] {
            assert_eq!(blocks.iter().filter(|b| b.contains(name)).count(), 1);
        }
        assert_eq!(stats.to_text().split("\n\n").count(), 1);
    }
}
