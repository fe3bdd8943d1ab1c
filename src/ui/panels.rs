use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate;
use crate::data::export;
use crate::data::loader::DataSource;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open metadata…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use sample data").clicked() {
                state.load(DataSource::synthetic_default());
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(base) = &state.base {
            ui.label(format!(
                "{} papers loaded, {} after filters",
                base.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::LIGHT_RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filters and export
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(base) = state.base.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let (min_year, max_year) = base.year_bounds().unwrap_or((2015, 2024));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Publication years");
            let mut changed = false;
            changed |= ui
                .add(egui::Slider::new(&mut state.selection.year_min, min_year..=max_year).text("from"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut state.selection.year_max, min_year..=max_year).text("to"))
                .changed();
            if changed {
                // Keep the range well-formed while the user drags.
                if state.selection.year_min > state.selection.year_max {
                    state.selection.year_max = state.selection.year_min;
                }
                state.refilter();
            }
            ui.separator();

            // ---- Source checkboxes ----
            ui.strong("Sources");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_sources();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_sources();
                }
            });
            for source in base.sources() {
                let mut checked = state.selection.selected_sources.contains(&source);
                let swatch = state.source_colors.color_for(&source);
                let text = RichText::new(&source).color(swatch);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_source(&source);
                }
            }
            ui.separator();

            // ---- Title search ----
            ui.strong("Search in titles");
            if ui
                .text_edit_singleline(&mut state.selection.search_term)
                .changed()
            {
                state.refilter();
            }
            ui.separator();

            // ---- Top-N journals ----
            ui.strong("Top journals to display");
            egui::ComboBox::from_id_salt("top_n_journals")
                .selected_text(state.top_n_journals.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for n in [5usize, 10, 15, 20] {
                        if ui
                            .selectable_label(state.top_n_journals == n, n.to_string())
                            .clicked()
                        {
                            state.top_n_journals = n;
                        }
                    }
                });
            ui.separator();

            // ---- Export ----
            ui.strong("Export");
            if ui.button("Filtered data (CSV)").clicked() {
                export_csv(state, ExportKind::Table);
            }
            if ui.button("Summary statistics (CSV)").clicked() {
                export_csv(state, ExportKind::Summary);
            }
        });
}

/// Key metrics across the top of the central panel.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let avg = state
        .summary
        .mean_abstract_len
        .map(|m| format!("{m:.0} words"))
        .unwrap_or_else(|| "N/A".to_string());
    let span = state
        .filtered
        .year_bounds()
        .map(|(lo, hi)| format!("{} years", hi - lo + 1))
        .unwrap_or_else(|| "N/A".to_string());

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total Papers", &state.filtered.len().to_string());
        metric(ui, "Unique Journals", &state.filtered.unique_journal_count().to_string());
        metric(ui, "Avg Abstract Length", &avg);
        metric(ui, "Year Range", &span);
    });
}

/// Key-insight cards under the charts: peak year, leading journal, and the
/// pandemic-era publication increase.
pub fn insights_row(ui: &mut Ui, state: &AppState) {
    ui.heading("Key Insights");

    let peak_year = aggregate::most_productive_year(&state.filtered)
        .map(|(year, count)| format!("{year} ({count} papers)"))
        .unwrap_or_else(|| "N/A".to_string());
    let leader = aggregate::top_journal(&state.filtered)
        .map(|(journal, count)| format!("{journal} ({count} papers)"))
        .unwrap_or_else(|| "N/A".to_string());
    let increase = aggregate::pandemic_increase_pct(&state.filtered)
        .map(|pct| format!("{pct:+.1}%"))
        .unwrap_or_else(|| "N/A".to_string());

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Peak Publication Year", &peak_year);
        metric(ui, "Leading Journal", &leader);
        metric(ui, "Publications vs pre-2020 Peak", &increase);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).heading());
        });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open paper metadata")
        .add_filter("Metadata files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(DataSource::File(path));
    }
}

enum ExportKind {
    Table,
    Summary,
}

fn export_csv(state: &mut AppState, kind: ExportKind) {
    let stamp = chrono::Local::now().format("%Y%m%d");
    let (result, default_name) = match kind {
        ExportKind::Table => (
            export::table_to_csv(&state.filtered),
            format!("papers_filtered_{stamp}.csv"),
        ),
        ExportKind::Summary => (
            export::summary_to_csv(&state.filtered),
            format!("papers_summary_{stamp}.csv"),
        ),
    };

    let text = match result {
        Ok(text) => text,
        Err(e) => {
            log::error!("export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
            return;
        }
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(&default_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match std::fs::write(&path, text) {
        Ok(()) => {
            log::info!("exported {}", path.display());
            state.status_message = Some(format!("Saved {}", path.display()));
        }
        Err(e) => {
            log::error!("writing {} failed: {e}", path.display());
            state.status_message = Some(format!("Export failed: {e}"));
        }
    }
}
