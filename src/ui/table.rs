use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CatalogTable, CellValue};
use crate::state::AppState;

/// Human-readable header: the `_` joins from load time become spaces again.
pub fn display_column_name(column: &str) -> String {
    column.replace('_', " ")
}

// ---------------------------------------------------------------------------
// Central panel: filtered parts and the selected part's details
// ---------------------------------------------------------------------------

pub fn parts_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cutter Correlation Information");
    ui.label("Select tool parameters from the sidebar");
    ui.add_space(6.0);

    ui.strong("Filtered Parts Information");
    ui.push_id("filtered_parts", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            parts_table(ui, &state.filtered, 320.0);
        });
    });
    ui.separator();

    if state.filtered.is_empty() {
        ui.label("No parts match the selected criteria.");
        return;
    }

    let current = state.selected_part.clone();
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select Part Number");
        egui::ComboBox::from_id_salt("part_number")
            .selected_text(current.as_ref().map(CellValue::to_string).unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for id in &state.identifiers {
                    if ui
                        .selectable_label(current.as_ref() == Some(id), id.to_string())
                        .clicked()
                    {
                        picked = Some(id.clone());
                    }
                }
            });
    });
    if picked.is_some() {
        state.select_part(picked);
    }

    let (Some(part), Some(details)) = (&state.selected_part, &state.details) else {
        return;
    };
    ui.add_space(6.0);
    ui.strong(format!("Selected Part Number: {part}"));
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Details for Selected Part").strong());
        if ui.small_button("Copy as JSON").clicked() {
            let records: Vec<_> = (0..details.len()).filter_map(|r| details.record_json(r)).collect();
            match serde_json::to_string_pretty(&records) {
                Ok(json) => ui.ctx().copy_text(json),
                Err(e) => log::error!("Failed to serialise part details: {e}"),
            }
        }
    });
    ui.push_id("part_details", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            parts_table(ui, details, 120.0);
        });
    });
}

/// Render a catalog table with display headers, left-aligned cells.
pub fn parts_table(ui: &mut Ui, table: &CatalogTable, max_height: f32) {
    let row_height = 18.0;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(max_height)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0), table.columns.len())
        .header(20.0, |mut header| {
            for col in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(display_column_name(col));
                });
            }
        })
        .body(|body| {
            body.rows(row_height, table.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_restore_spaces() {
        assert_eq!(display_column_name("Head_Width__inches"), "Head Width  inches");
        assert_eq!(display_column_name("Part_#"), "Part #");
        assert_eq!(display_column_name("Sub-Type"), "Sub-Type");
    }
}
