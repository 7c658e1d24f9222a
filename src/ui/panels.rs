use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – provider and slider controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    // Clone what we need so we can mutate state inside the widgets.
    let Some(view) = state.ready_view().cloned() else {
        ui.label("No data to select from.");
        return;
    };

    // ---- Provider selector ----
    ui.strong("Select a Healthcare Provider (Partner):");
    egui::ComboBox::from_id_salt("partner_select")
        .selected_text(&view.partner)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for partner in &view.partners {
                if ui
                    .selectable_label(view.partner == *partner, partner)
                    .clicked()
                {
                    state.select_partner(partner.clone());
                }
            }
        });
    ui.add_space(8.0);

    // ---- Number of CPT codes ----
    let mut count = view.codes.len().max(1);
    let max = view.total_codes.max(1);
    ui.strong("Number of CPT codes to display");
    let slider = ui
        .add(egui::Slider::new(&mut count, 1..=max))
        .on_hover_text("Select how many CPT codes to show, sorted by highest Invoice amount");
    if slider.changed() {
        state.set_code_count(count);
    }
    ui.add_space(8.0);

    // ---- Advance percentage ----
    let mut pct = state.selection.advance_pct;
    ui.strong("Select Invoice Advance Percentage");
    let slider = ui
        .add(egui::Slider::new(&mut pct, 0..=100).suffix("%"))
        .on_hover_text("Percentage of invoice amount advanced to the provider");
    if slider.changed() {
        state.set_advance_pct(pct);
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
        });

        ui.separator();

        if let Some(table) = &state.table {
            let valid = state.ready_view().map_or(0, |v| v.record_count);
            ui.label(format!(
                "{}: {} rows, {} with payer data",
                state.source,
                table.len(),
                valid
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open claims data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "parquet", "pq", "json"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("Converted table", &["json"])
        .pick_file();

    if let Some(path) = file {
        match cpt_dashboard::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table, &path.display().to_string()),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
