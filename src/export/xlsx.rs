use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::analysis::anova::AnovaResult;
use crate::analysis::describe::DescriptiveStats;
use crate::analysis::regression::RegressionResult;
use crate::data::model::{CellValue, Dataset};

pub const SHEET_DATA: &str = "Cleaned Data";
pub const SHEET_STATISTICS: &str = "Statistics";
pub const SHEET_REGRESSION: &str = "Regression";
pub const SHEET_ANOVA: &str = "ANOVA";

/// Build the multi-sheet report.  The regression and ANOVA sheets exist only
/// when those results are present.
pub fn workbook(
    dataset: &Dataset,
    stats: &DescriptiveStats,
    regression: Option<&RegressionResult>,
    anova: Option<&AnovaResult>,
) -> Result<Vec<u8>> {
    let bold = Format::new().set_bold();
    let mut wb = Workbook::new();

    // ---- Cleaned Data ----
    let ws = named_sheet(&mut wb, SHEET_DATA)?;
    for (c, column) in dataset.columns.iter().enumerate() {
        ws.write_string_with_format(0, col(c)?, &column.name, &bold)?;
    }
    for (r, row) in dataset.rows.iter().enumerate() {
        let r = u32::try_from(r + 1).context("dataset has too many rows for a worksheet")?;
        for (c, cell) in row.iter().enumerate() {
            write_cell(ws, r, col(c)?, cell)?;
        }
    }

    // ---- Statistics ----
    let ws = named_sheet(&mut wb, SHEET_STATISTICS)?;
    for (c, name) in stats.columns.iter().enumerate() {
        ws.write_string_with_format(0, col(c + 1)?, name, &bold)?;
    }
    for (r, (label, row)) in stats.labels.iter().zip(&stats.cells).enumerate() {
        let r = r as u32 + 1;
        ws.write_string_with_format(r, 0, *label, &bold)?;
        for (c, cell) in row.iter().enumerate() {
            write_cell(ws, r, col(c + 1)?, cell)?;
        }
    }

    // ---- Regression ----
    if let Some(reg) = regression {
        let ws = named_sheet(&mut wb, SHEET_REGRESSION)?;
        ws.write_string_with_format(0, 0, "R2 Score", &bold)?;
        write_cell(ws, 1, 0, &CellValue::Float(reg.r_squared))?;
    }

    // ---- ANOVA ----
    if let Some(anova) = anova {
        let ws = named_sheet(&mut wb, SHEET_ANOVA)?;
        ws.write_string_with_format(0, 0, "F Value", &bold)?;
        ws.write_string_with_format(0, 1, "P Value", &bold)?;
        write_cell(ws, 1, 0, &CellValue::Float(anova.f_value))?;
        write_cell(ws, 1, 1, &CellValue::Float(anova.p_value))?;
    }

    wb.save_to_buffer().context("serialising workbook")
}

fn named_sheet<'a>(wb: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet> {
    let ws = wb.add_worksheet();
    ws.set_name(name)
        .with_context(|| format!("naming sheet '{name}'"))?;
    Ok(ws)
}

fn col(c: usize) -> Result<u16> {
    u16::try_from(c).context("too many columns for a worksheet")
}

/// Nulls and NaN stay blank; infinities are written as text since a
/// worksheet cannot hold them as numbers.
fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        CellValue::Integer(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(v) if v.is_nan() => {}
        CellValue::Float(v) if v.is_infinite() => {
            ws.write_string(row, col, if *v > 0.0 { "inf" } else { "-inf" })?;
        }
        CellValue::Float(v) => {
            ws.write_number(row, col, *v)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        CellValue::Null => {}
    }
    Ok(())
}
