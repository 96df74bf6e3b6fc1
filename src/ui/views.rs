use eframe::egui::{self, ScrollArea, Ui};

use crate::session::Command;
use crate::state::{AppState, Mode};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// Central panel – one view per mode
// ---------------------------------------------------------------------------

pub fn central_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.mode.label());
    ui.separator();

    if state.mode != Mode::Upload && state.session.dataset.is_none() {
        ui.label("No dataset loaded. Upload a CSV or Excel file first.");
        return;
    }

    match state.mode {
        Mode::Upload => upload_view(ui, state),
        Mode::Clean => clean_view(ui, state),
        Mode::Statistics => statistics_view(ui, state),
        Mode::Visualization => visualization_view(ui, state),
        Mode::Regression => regression_view(ui, state),
        Mode::Anova => anova_view(ui, state),
        Mode::ExportCenter => export_view(ui, state),
    }
}

fn upload_view(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Upload CSV or Excel").clicked() {
        panels::open_file_dialog(state);
    }
    if let Some(ds) = &state.session.dataset {
        ui.add_space(8.0);
        table::dataset_table(ui, ds);
    }
}

fn clean_view(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Clean Data").clicked() {
        state.run(Command::Clean);
    }
    if let Some(ds) = &state.session.dataset {
        ui.add_space(8.0);
        table::dataset_table(ui, ds);
    }
}

fn statistics_view(ui: &mut Ui, state: &mut AppState) {
    match state.session.describe() {
        Ok(stats) if stats.is_empty() => {
            ui.label("The dataset has no columns to describe.");
        }
        Ok(stats) => {
            ScrollArea::horizontal().show(ui, |ui: &mut Ui| table::stats_table(ui, &stats));
        }
        Err(e) => {
            ui.label(e.to_string());
        }
    }
}

/// A combo box over `options`.  Returns `true` when the pick changed.
fn column_picker(ui: &mut Ui, label: &str, pick: &mut Option<String>, options: &[String]) -> bool {
    let before = pick.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(label)
            .selected_text(pick.as_deref().unwrap_or("select…"))
            .show_ui(ui, |ui: &mut Ui| {
                for name in options {
                    ui.selectable_value(pick, Some(name.clone()), name);
                }
            });
    });
    *pick != before
}

/// Default the pick to the first option, so the view shows a result as soon
/// as it opens.  Returns `true` when a default was chosen.
fn default_pick(pick: &mut Option<String>, options: &[String]) -> bool {
    if pick.is_none() {
        if let Some(first) = options.first() {
            *pick = Some(first.clone());
            return true;
        }
    }
    false
}

fn visualization_view(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.session.dataset else {
        return;
    };
    let numeric = ds.numeric_column_names();
    if numeric.is_empty() {
        ui.label("The dataset has no numeric columns.");
        return;
    }

    let mut changed = default_pick(&mut state.chart_column, &numeric);
    changed |= column_picker(ui, "Column", &mut state.chart_column, &numeric);
    if changed {
        if let Some(column) = state.chart_column.clone() {
            state.run(Command::Visualize { column });
        }
    }

    if let Some(chart) = &state.session.chart {
        ui.label(format!("{} values in {} bins", chart.total(), chart.bins.len()));
        plot::histogram_plot(ui, chart);
    }
}

fn regression_view(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.session.dataset else {
        return;
    };
    let numeric = ds.numeric_column_names();
    if numeric.is_empty() {
        ui.label("The dataset has no numeric columns.");
        return;
    }

    let mut run = default_pick(&mut state.regression_target, &numeric);
    run |= column_picker(ui, "Target", &mut state.regression_target, &numeric);
    run |= ui.button("Run Regression").clicked();
    if run {
        if let Some(target) = state.regression_target.clone() {
            state.run(Command::Regress { target });
        }
    }

    if let Some(result) = &state.session.regression {
        ui.add_space(8.0);
        ui.label(format!(
            "{} ~ {} ({} observations)",
            result.target,
            result.features.join(" + "),
            result.n_observations
        ));
        table::scalar_table(ui, "regression_table", &[("R2 Score", result.r_squared)]);
    }
}

fn anova_view(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.session.dataset else {
        return;
    };
    let columns = ds.column_names();

    let mut run = default_pick(&mut state.anova_group, &columns);
    run |= column_picker(ui, "Group", &mut state.anova_group, &columns);
    run |= ui.button("Run ANOVA").clicked();
    if run {
        if let Some(group) = state.anova_group.clone() {
            state.run(Command::Anova { group });
        }
    }

    if let Some(result) = &state.session.anova {
        ui.add_space(8.0);
        table::scalar_table(
            ui,
            "anova_table",
            &[("F Value", result.f_value), ("P Value", result.p_value)],
        );
        ui.add_space(8.0);
        plot::group_means_plot(ui, result);
    }
}

fn export_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Download Reports");

    let Some(bundle) = &state.export else {
        return;
    };

    let mut clicked = None;
    for (i, artifact) in bundle.artifacts.iter().enumerate() {
        if ui.button(artifact.label).clicked() {
            clicked = Some(i);
        }
    }

    let picked = clicked.and_then(|i| bundle.artifacts.get(i)).cloned();
    if let Some(artifact) = picked {
        panels::save_artifact_dialog(state, &artifact);
    }
}
