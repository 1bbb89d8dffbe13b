use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use pemetaan::data::loader::load_file;
use pemetaan::data::model::{CellValue, Column, Dataset};

use crate::state::AppState;

/// A deferred state change picked up while drawing the panel.
enum Action {
    Year(CellValue),
    Toggle(Column, CellValue),
    Clear(Column),
    Recompute,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let options = match &state.view {
        Some(view) => view.options.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    let selection = state.selection.clone();
    let mut actions: Vec<Action> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year: a single choice ----
            if let Some(years) = &options.years {
                ui.strong(format!("Year ({})", Column::Year));
                if years.is_empty() {
                    ui.label(RichText::new("no values").weak());
                } else {
                    let current = selection
                        .year
                        .as_ref()
                        .map(|y| y.to_string())
                        .unwrap_or_default();
                    egui::ComboBox::from_id_salt("year_filter")
                        .selected_text(current)
                        .show_ui(ui, |ui: &mut Ui| {
                            for year in years {
                                let is_current = selection.year.as_ref() == Some(year);
                                if ui.selectable_label(is_current, year.to_string()).clicked() {
                                    actions.push(Action::Year(year.clone()));
                                }
                            }
                        });
                }
                ui.separator();
            }

            // ---- City / level / class: multi-choice (collapsible) ----
            for column in [Column::City, Column::Level, Column::Class] {
                let Some(all_values) = options.for_column(column) else {
                    continue;
                };
                let Some(selected) = selection.set_for(column) else {
                    continue;
                };

                // Show count of selected / total in the header
                let n_selected = selected.len();
                let n_total = all_values.len();
                let header_text = if n_selected == 0 {
                    format!("{column}  (all {n_total})")
                } else {
                    format!("{column}  ({n_selected}/{n_total})")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.name())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if all_values.is_empty() {
                            ui.label(RichText::new("no values").weak());
                            return;
                        }
                        if ui.small_button("Clear").clicked() {
                            actions.push(Action::Clear(column));
                        }
                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                actions.push(Action::Toggle(column, val.clone()));
                            }
                        }
                    });
            }

            // ---- Optional sections ----
            ui.separator();
            ui.strong("Sections");
            let toggles = &mut state.view_options.toggles;
            let mut changed = false;
            changed |= ui
                .checkbox(&mut toggles.show_full_data, "Show full data")
                .changed();
            changed |= ui
                .checkbox(&mut toggles.income_by_city, "Average income per city")
                .changed();
            changed |= ui
                .checkbox(&mut toggles.income_distribution, "Income distribution")
                .changed();
            changed |= ui
                .checkbox(&mut toggles.income_by_bracket, "Average income per bracket")
                .changed();
            if changed {
                actions.push(Action::Recompute);
            }
        });

    for action in actions {
        match action {
            Action::Year(year) => state.select_year(year),
            Action::Toggle(column, value) => state.toggle_filter_value(column, &value),
            Action::Clear(column) => state.clear_filter(column),
            Action::Recompute => state.recompute(),
        }
    }
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
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} rows loaded, {} visible",
                ds.len(),
                view.filtered_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match load_file(&path) {
            Ok(table) => {
                let dataset = Dataset::new(table);
                log::info!(
                    "Detected columns {:?} in {}",
                    dataset.table().columns,
                    path.display()
                );
                state.set_dataset(dataset, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_summary(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
