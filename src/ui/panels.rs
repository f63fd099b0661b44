use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::Theme;
use crate::config::WKHTMLTOPDF_ENV;
use crate::data::intake::SourceFormat;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – settings
// ---------------------------------------------------------------------------

/// Render the settings sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Settings");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Choose Theme:");
            for theme in Theme::ALL {
                ui.radio_value(&mut state.theme, theme, theme.label());
            }
            ui.separator();

            ui.strong("File Management");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Refresh Data").clicked() {
                    state.refresh();
                }
                if ui.button("Clear Files").clicked() {
                    state.clear_files();
                }
            });
            ui.separator();

            ui.strong("Data Summary");
            ui.checkbox(&mut state.show_overview, "Show Data Overview");
            ui.checkbox(&mut state.auto_clean, "Enable Auto-Cleaning")
                .on_hover_text("Remove duplicates and fill missing numbers on load");
            if state.show_overview {
                data_overview(ui, state);
            }
            ui.separator();

            ui.strong("PDF Export");
            match state.pdf_backend() {
                Some(name) => {
                    ui.label(RichText::new(format!("Available ({name})")).color(Color32::DARK_GREEN));
                }
                None => {
                    ui.label(RichText::new("Not available").color(Color32::RED));
                    ui.label(format!(
                        "Install wkhtmltopdf from https://wkhtmltopdf.org/downloads.html \
                         or point {WKHTMLTOPDF_ENV} at it, then restart."
                    ));
                }
            }
        });
}

fn data_overview(ui: &mut Ui, state: &AppState) {
    if state.files.is_empty() {
        ui.label("No files loaded.");
        return;
    }
    egui::Grid::new("data_overview")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("File");
            ui.strong("Rows");
            ui.strong("Cols");
            ui.strong("Missing");
            ui.end_row();
            for file in &state.files {
                let missing: usize = file.table.columns().iter().map(|c| c.null_count()).sum();
                ui.label(file.name());
                ui.label(file.table.num_rows().to_string());
                ui.label(file.table.num_columns().to_string());
                ui.label(missing.to_string());
                ui.end_row();
            }
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
            if ui.button("Close all").clicked() {
                state.clear_files();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.files.is_empty() {
            ui.label(format!("{} file(s) loaded", state.files.len()));
            ui.separator();
        }

        match &state.status {
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Choose CSV or Excel files")
        .add_filter("Supported files", &SourceFormat::EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.open_paths(&paths);
    }
}

/// Ask where to save the held conversion of file `index`, then write it.
pub fn save_file_dialog(state: &mut AppState, index: usize) {
    let Some(result) = state.files.get(index).and_then(|f| f.conversion.as_ref()) else {
        return;
    };
    let extension = result.file_name.rsplit('.').next().unwrap_or_default().to_string();

    let target = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(result.file_name.as_str())
        .add_filter(result.mime_type, &[extension.as_str()])
        .save_file();

    if let Some(path) = target {
        state.save_conversion(index, &path);
    }
}
