use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, views};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EmperorApp {
    pub state: AppState,
}

impl eframe::App for EmperorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: menu ----
        egui::SidePanel::left("menu_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_menu(ui, &mut self.state);
            });

        // ---- Central panel: active mode ----
        egui::CentralPanel::default().show(ctx, |ui| {
            views::central_view(ui, &mut self.state);
        });
    }
}
