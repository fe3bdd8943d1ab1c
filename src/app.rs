use eframe::egui;

use crate::data::loader::DataSource;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PaperLensApp {
    pub state: AppState,
}

impl Default for PaperLensApp {
    fn default() -> Self {
        let mut state = AppState::default();
        // Start on the deterministic sample dataset; File → Open replaces it.
        state.load(DataSource::synthetic_default());
        Self { state }
    }
}

impl eframe::App for PaperLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + export ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, data table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::metrics_row(ui, &self.state);
                    ui.separator();
                    charts::charts_section(ui, &self.state);
                    ui.separator();
                    panels::insights_row(ui, &self.state);
                    ui.separator();
                    table::data_table(ui, &mut self.state);
                });
        });
    }
}
