use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::export::Artifact;
use crate::session::Command;
use crate::state::{AppState, Mode, Status};

// ---------------------------------------------------------------------------
// Left side panel – menu
// ---------------------------------------------------------------------------

/// Render the mode menu.
pub fn side_menu(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Menu");
    ui.separator();

    for mode in Mode::ALL {
        if ui
            .selectable_label(state.mode == mode, mode.label())
            .clicked()
        {
            state.set_mode(mode);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title, dataset summary and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Emperor Data Analytics PRO");
        ui.label("Upload • Analyze • Visualize • Export Professional Reports");

        ui.separator();

        if let Some(ds) = &state.session.dataset {
            ui.label(format!("{} rows × {} columns", ds.len(), ds.width()));
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload CSV or Excel")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_file();

    if let Some(path) = file {
        state.run(Command::Upload(path));
    }
}

/// Ask where to put `artifact` (prefilled with its file name) and write it.
pub fn save_artifact_dialog(state: &mut AppState, artifact: &Artifact) {
    let ext = artifact.extension();
    let Some(path) = rfd::FileDialog::new()
        .set_title(artifact.label)
        .set_file_name(artifact.file_name)
        .add_filter(ext, &[ext])
        .save_file()
    else {
        return;
    };

    match std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))
    {
        Ok(()) => {
            log::info!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());
            state.set_info(format!("Saved {}", path.display()));
        }
        Err(e) => {
            log::error!("Failed to save {}: {e:#}", artifact.file_name);
            state.set_error(format!("Error: {e:#}"));
        }
    }
}
