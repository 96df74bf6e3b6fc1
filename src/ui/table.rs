use eframe::egui::{Id, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::describe::DescriptiveStats;
use crate::data::model::{CellValue, Dataset};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Tables (central panel)
// ---------------------------------------------------------------------------

/// Scrollable preview of every row.
pub fn dataset_table(ui: &mut Ui, dataset: &Dataset) {
    grid(
        ui,
        "dataset_table",
        dataset.columns.iter().map(|c| format!("{} ({})", c.name, c.kind)),
        dataset.len(),
        |r, c| cell_text(&dataset.rows[r][c]),
    );
}

/// Statistic × column table with the label column first.
pub fn stats_table(ui: &mut Ui, stats: &DescriptiveStats) {
    let headers = std::iter::once(String::new()).chain(stats.columns.iter().cloned());
    grid(ui, "stats_table", headers, stats.labels.len(), |r, c| {
        if c == 0 {
            stats.labels[r].to_string()
        } else {
            cell_text(&stats.cells[r][c - 1])
        }
    });
}

/// One-row table of named scalars, like `R2 Score` or `F Value | P Value`.
pub fn scalar_table(ui: &mut Ui, id: &str, values: &[(&str, f64)]) {
    grid(
        ui,
        id,
        values.iter().map(|(name, _)| name.to_string()),
        1,
        |_, c| values[c].1.to_string(),
    );
}

fn grid(
    ui: &mut Ui,
    id: &str,
    headers: impl Iterator<Item = String>,
    n_rows: usize,
    text: impl Fn(usize, usize) -> String,
) {
    let headers: Vec<String> = headers.collect();
    ui.push_id(Id::new(id), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, n_rows, |mut row| {
                    let r = row.index();
                    for c in 0..headers.len() {
                        row.col(|ui: &mut Ui| {
                            ui.label(text(r, c));
                        });
                    }
                });
            });
    });
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Float(v) => v.to_string(),
        other => other.to_string(),
    }
}
