use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CutterChartApp {
    pub state: AppState,
    pub logo: Option<PathBuf>,
}

impl CutterChartApp {
    pub fn new(state: AppState, logo: Option<PathBuf>) -> Self {
        Self { state, logo }
    }
}

impl eframe::App for CutterChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, self.logo.as_deref());
            });

        // ---- Central panel: parts tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::parts_view(ui, &mut self.state);
        });
    }
}
