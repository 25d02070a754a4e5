use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::criteria::NO_SELECTION;
use crate::data::loader::load_catalogs;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, logo: Option<&Path>) {
    // ---- Logo (centered) ----
    if let Some(path) = logo {
        let uri = format!("file://{}", path.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Filter Options");
    ui.separator();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Brand selector ----
            ui.strong("Select Brand");
            let current = state.brand();
            let mut picked = None;
            egui::ComboBox::from_id_salt("brand")
                .selected_text(current.sheet_name())
                .show_ui(ui, |ui: &mut Ui| {
                    for brand in state.catalogs.brands() {
                        if ui
                            .selectable_label(current == brand, brand.sheet_name())
                            .clicked()
                        {
                            picked = Some(brand);
                        }
                    }
                });
            if let Some(brand) = picked {
                state.select_brand(brand);
            }
            ui.separator();

            changed |= attribute_filters(ui, state);
            ui.separator();

            // ---- Direct part search ----
            ui.strong("Direct Part Search");
            ui.label("Enter Part Number (if known)");
            changed |= ui
                .text_edit_singleline(state.criteria.part_number_mut())
                .changed();
            ui.separator();

            changed |= dimension_filters(ui, state);
            ui.separator();

            let any_active = !state.criteria.is_inactive();
            if ui.add_enabled(any_active, egui::Button::new("Clear filters")).clicked() {
                state.clear_filters();
            }
        });

    if changed {
        state.refilter();
    }
}

/// One dropdown per category column: "None" followed by the sorted distinct values.
fn attribute_filters(ui: &mut Ui, state: &mut AppState) -> bool {
    let profile = state.profile();
    let options = &state.category_options;
    let criteria = &mut state.criteria;

    ui.strong("Filter by Attributes");
    let mut changed = false;
    for (idx, (field, values)) in profile.categories.iter().zip(options).enumerate() {
        let current = criteria.category(idx).cloned();
        let label = current
            .as_ref()
            .map_or_else(|| NO_SELECTION.to_string(), |v| v.to_string());

        ui.label(format!("Select {}", field.label));
        egui::ComboBox::from_id_salt(field.column)
            .selected_text(label)
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(current.is_none(), NO_SELECTION).clicked() {
                    criteria.set_category_at(idx, None);
                    changed = true;
                }
                for val in values {
                    let is_selected = current.as_ref() == Some(val);
                    if ui.selectable_label(is_selected, val.to_string()).clicked() {
                        criteria.set_category_at(idx, Some(val.clone()));
                        changed = true;
                    }
                }
            });
    }
    changed
}

/// Free-text numeric inputs; text that does not parse simply disables the filter.
fn dimension_filters(ui: &mut Ui, state: &mut AppState) -> bool {
    let profile = state.profile();
    if profile.numeric.is_empty() {
        return false;
    }

    ui.strong("Dimension Filters");
    let mut changed = false;
    for (idx, field) in profile.numeric.iter().enumerate() {
        ui.label(format!("Enter {}", field.label));
        if let Some(text) = state.criteria.numeric_input_mut(idx) {
            changed |= ui.text_edit_singleline(text).changed();
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = state.table() {
            ui.label(format!(
                "{}: {} parts, {} shown",
                state.brand(),
                table.len(),
                state.filtered.len()
            ));
        }

        ui.separator();
        ui.label(state.source.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open cutter correlation chart")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "json"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        let version = state.catalogs.version;
        match load_catalogs(&path, version)
            .with_context(|| format!("loading {}", path.display()))
        {
            Ok(catalogs) => {
                log::info!(
                    "Loaded {} brands from {}",
                    catalogs.tables.len(),
                    path.display()
                );
                state.replace_catalogs(catalogs, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
