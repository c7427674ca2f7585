use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use washer_insights::data::export::DEFAULT_EXPORT_FILE;
use washer_insights::data::filter::{HeaterMode, Preset};
use washer_insights::data::model::short_function_type;
use washer_insights::state::AppState;

use crate::color::BrandColors;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, colors: &BrandColors) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No catalog loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let brands = dataset.brands.clone();
    let function_types = dataset.function_types.clone();
    let price_hint = dataset.price_bounds();
    let capacity_hint = dataset.capacity_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Quick filters ----
            ui.strong("Quick filters");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for preset in Preset::ALL {
                    let active = state.preset == Some(preset);
                    if ui.selectable_label(active, preset.label()).clicked() {
                        if active {
                            state.reset_filters();
                        } else {
                            state.apply_preset(preset);
                        }
                    }
                }
            });
            ui.separator();

            // ---- Brands ----
            let header = format!("Brands  ({}/{})", state.form.brands.len(), brands.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("brands")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_brands();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_brands();
                        }
                    });
                    for brand in &brands {
                        let mut checked = state.form.brands.contains(brand);
                        let text = RichText::new(brand).color(colors.color_for(brand));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_brand(brand);
                        }
                    }
                });

            // ---- Function types ----
            let header = format!(
                "Type  ({}/{})",
                state.form.function_types.len(),
                function_types.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("function_types")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for ft in &function_types {
                        let mut checked = state.form.function_types.contains(ft);
                        let response = ui
                            .checkbox(&mut checked, short_function_type(ft))
                            .on_hover_text(ft);
                        if response.changed() {
                            state.toggle_function_type(ft);
                        }
                    }
                });
            ui.separator();

            // ---- Heater ----
            ui.strong("Heater");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut state.form.heater, HeaterMode::Any, "All");
                ui.radio_value(&mut state.form.heater, HeaterMode::Yes, "With");
                ui.radio_value(&mut state.form.heater, HeaterMode::No, "Without");
            });
            ui.separator();

            // ---- Ranges ----
            ui.strong("Price (USD)");
            range_inputs(
                ui,
                &mut state.form.min_price,
                &mut state.form.max_price,
                price_hint,
            );
            ui.strong("Capacity (lb)");
            range_inputs(
                ui,
                &mut state.form.min_capacity,
                &mut state.form.max_capacity,
                capacity_hint,
            );
            ui.add_space(8.0);

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Apply").clicked() {
                    state.apply_filters();
                }
                if ui.button("Reset").clicked() {
                    state.reset_filters();
                }
            });
        });
}

/// Min / max text inputs; hints show the catalog's range.
fn range_inputs(ui: &mut Ui, min: &mut String, max: &mut String, hint: Option<(f64, f64)>) {
    let (lo, hi) = hint
        .map(|(lo, hi)| (format!("Min ({lo:.0})"), format!("Max ({hi:.0})")))
        .unwrap_or_else(|| ("Min".to_string(), "Max".to_string()));
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::TextEdit::singleline(min).hint_text(lo).desired_width(80.0));
        ui.label("–");
        ui.add(egui::TextEdit::singleline(max).hint_text(hi).desired_width(80.0));
    });
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
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(preset) = state.preset {
            ui.separator();
            ui.label(RichText::new(preset.label()).strong());
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
        .set_title("Open washing machine catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export current view")
        .set_file_name(DEFAULT_EXPORT_FILE)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        // Failures are reported through the status line.
        let _ = state.export_view(&path);
    }
}
