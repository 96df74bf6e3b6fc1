use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Range, Reader, Xlsx};

use super::model::Dataset;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – comma-delimited, first record is the header row
/// * `.xlsx` – first worksheet, first non-empty row is the header row
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" => load_xlsx(path),
        other => Err(AnalysisError::UnsupportedFormat(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    load_csv_reader(file)
}

/// Parse comma-delimited text with a header row.  Rows must all have the
/// header's width.
pub fn load_csv_reader(reader: impl Read) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no columns to parse");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|f| Some(f.to_string())).collect());
    }

    Ok(Dataset::from_raw(headers, rows))
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

fn load_xlsx(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening workbook")?;
    load_xlsx_reader(std::io::BufReader::new(file))
}

/// Parse the first worksheet of an `.xlsx` document.
pub fn load_xlsx_reader<RS: Read + Seek>(reader: RS) -> Result<Dataset> {
    let mut workbook = Xlsx::new(reader).context("opening workbook")?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<Dataset> {
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;
    range_to_dataset(&sheet, &range)
}

fn range_to_dataset(sheet: &str, range: &Range<Data>) -> Result<Dataset> {
    let mut rows = range.rows().skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let headers: Vec<String> = rows
        .next()
        .with_context(|| format!("sheet '{sheet}' has no non-empty rows (no header row found)"))?
        .iter()
        .map(|c| cell_to_text(c).unwrap_or_default())
        .collect();

    let body = rows
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect();

    Ok(Dataset::from_raw(headers, body))
}

/// Render a cell the way it would appear in a CSV export, so both formats
/// share one schema pass.  Whole floats read as integers.
fn cell_to_text(c: &Data) -> Option<String> {
    match c {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                Some((*f as i64).to_string())
            } else {
                Some(format!("{f:?}"))
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(d) => Some(d.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
