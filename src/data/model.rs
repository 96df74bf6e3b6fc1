use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common DataFrame dtypes.
/// Rows are deduplicated through `HashSet` and grouped through `BTreeMap`,
/// so `CellValue` must be `Ord` and `Hash`.
///
/// Floats compare numerically: `0.0 == -0.0`, and NaN equals NaN and sorts
/// after every number.  Equality, ordering and hashing all agree.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so floats can take part in set and map keys --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => canonical_bits(*f).hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// One bit pattern per equality class: `-0.0` hashes as `0.0`, every NaN
/// as the same NaN.
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric work.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text written to a CSV field.
    ///
    /// Floats use the shortest representation that parses back to the same
    /// bits and always keep a decimal point or exponent, so a re-read column
    /// stays floating point.
    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => format!("{v:?}"),
            CellValue::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

/// Storage kind of a column, decided once when the file is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Tokens read as a missing value, besides blank cells (the usual
/// DataFrame reader defaults).
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || MISSING_TOKENS.contains(&t)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Any spelling `f64` parses as NaN (`NAN`, `-nan`, …).  Such a cell is a
/// gap in a numeric column; a text column keeps it verbatim.
fn is_nan_text(t: &str) -> bool {
    t.parse::<f64>().is_ok_and(f64::is_nan)
}

/// Decide a column's kind from its raw (non-missing) cells.
fn classify<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    let mut seen = 0usize;
    let mut any_missing = false;
    let (mut all_int, mut all_float, mut all_bool) = (true, true, true);

    for cell in cells {
        match cell {
            None => any_missing = true,
            Some(raw) if is_nan_text(raw.trim()) => any_missing = true,
            Some(raw) => {
                let t = raw.trim();
                seen += 1;
                all_int &= t.parse::<i64>().is_ok();
                all_float &= t.parse::<f64>().is_ok();
                all_bool &= parse_bool(t).is_some();
            }
        }
    }

    if seen == 0 {
        // An all-missing column is float, like a column of NaN.
        ColumnKind::Float
    } else if all_int && !any_missing {
        ColumnKind::Integer
    } else if all_float {
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

/// Cell `j` of a raw row, `None` when absent or a missing-value token.
fn raw_cell(row: &[Option<String>], j: usize) -> Option<&str> {
    row.get(j)
        .and_then(|c| c.as_deref())
        .filter(|s| !is_missing(s))
}

fn convert(kind: ColumnKind, raw: Option<&str>) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Null;
    };
    let t = raw.trim();
    match kind {
        ColumnKind::Integer => t.parse().map(CellValue::Integer).unwrap_or(CellValue::Null),
        ColumnKind::Float => t
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnKind::Bool => parse_bool(t).map(CellValue::Bool).unwrap_or(CellValue::Null),
        ColumnKind::Text => CellValue::Text(raw.to_string()),
    }
}

/// Blank headers become `Unnamed: <i>`; repeated names get `.1`, `.2`, ….
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base.clone()
            } else {
                format!("{base}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Row-major table with a schema classified at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Columns in source order.
    pub columns: Vec<Column>,
    /// Rows, each exactly `columns.len()` cells long.
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset from raw text cells, classifying every column once.
    ///
    /// `None` and missing-value tokens become [`CellValue::Null`]. Short rows
    /// are padded with nulls.
    pub fn from_raw(headers: Vec<String>, raw_rows: Vec<Vec<Option<String>>>) -> Self {
        let headers = normalize_headers(headers);
        let width = headers.len();

        let columns: Vec<Column> = headers
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let kind = classify(raw_rows.iter().map(|r| raw_cell(r, j)));
                log::debug!("column '{name}' classified as {kind}");
                Column { name, kind }
            })
            .collect();

        let rows = raw_rows
            .iter()
            .map(|r| {
                (0..width)
                    .map(|j| convert(columns[j].kind, raw_cell(r, j)))
                    .collect()
            })
            .collect();

        Dataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Indices of numeric columns, in column order.
    pub fn numeric_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.numeric_indices()
            .into_iter()
            .map(|i| self.columns[i].name.clone())
            .collect()
    }

    /// Values of one column as floats; `None` for nulls and non-numeric cells.
    pub fn numeric_values(&self, idx: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r[idx].as_f64()).collect()
    }

    /// Iterate over one column's cells.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }
}
