use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::SortColumn;
use crate::data::view;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data table (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render the sortable, truncated projection of the filtered table.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Papers");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Rows:");
        egui::ComboBox::from_id_salt("rows_to_show")
            .selected_text(state.rows_to_show.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for n in [10usize, 25, 50, 100] {
                    if ui
                        .selectable_label(state.rows_to_show == n, n.to_string())
                        .clicked()
                    {
                        state.rows_to_show = n;
                    }
                }
            });

        ui.label("Sort by:");
        egui::ComboBox::from_id_salt("sort_column")
            .selected_text(state.sort_column.label())
            .show_ui(ui, |ui: &mut Ui| {
                for col in SortColumn::ALL {
                    if ui
                        .selectable_label(state.sort_column == col, col.label())
                        .clicked()
                    {
                        state.sort_column = col;
                    }
                }
            });

        let direction = if state.sort_ascending { "Ascending" } else { "Descending" };
        if ui.selectable_label(false, direction).clicked() {
            state.sort_ascending = !state.sort_ascending;
        }
    });

    let rows = view::display_projection(
        &state.filtered,
        state.sort_column,
        state.sort_ascending,
        state.rows_to_show,
    );

    if rows.is_empty() {
        ui.label("No rows to display.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(240.0)) // title
        .column(Column::auto().at_least(120.0)) // journal
        .column(Column::auto().at_least(90.0)) // date
        .column(Column::auto().at_least(60.0)) // words
        .column(Column::auto().at_least(70.0)) // source
        .header(20.0, |mut header| {
            for label in ["Title", "Journal", "Publication Date", "Abstract Words", "Source"] {
                header.col(|ui| {
                    ui.label(RichText::new(label).strong());
                });
            }
        })
        .body(|mut body| {
            for row in &rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.title);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.journal);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.publish_date);
                    });
                    table_row.col(|ui| {
                        ui.label(row.abstract_word_count.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(&row.source);
                    });
                });
            }
        });
}
