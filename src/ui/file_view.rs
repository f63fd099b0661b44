use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::{panels, plot};
use crate::convert::OutputFormat;
use crate::data::model::{CellValue, Table};
use crate::state::{AppState, LoadedFile};

/// Something the user clicked inside a file card, applied after drawing.
enum FileAction {
    RemoveDuplicates,
    FillMissing,
    ToggleColumn(String),
    SelectAll,
    SelectNone,
    Convert,
    Save,
    Close,
}

// ---------------------------------------------------------------------------
// Central panel – one card per loaded file
// ---------------------------------------------------------------------------

pub fn files_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sweeper");
    ui.label("Transform your files between CSV and Excel formats with built-in data cleaning and visualization.");
    ui.separator();

    if state.files.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV or Excel file to get started  (File → Open…)");
        });
        return;
    }

    let preview_rows = state.preview_rows;
    let chart_series = state.chart_series;
    let pdf_available = state.pdf_backend().is_some();
    let mut actions: Vec<(usize, FileAction)> = Vec::new();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (index, file) in state.files.iter_mut().enumerate() {
                egui::CollapsingHeader::new(RichText::new(format!("Preview of {}", file.name())).strong())
                    .id_salt(("file", index))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        let mut push = |a| actions.push((index, a));
                        file_card(ui, index, file, preview_rows, chart_series, pdf_available, &mut push);
                    });
                ui.add_space(8.0);
            }
        });

    // Apply in reverse so a close does not shift later indices.
    for (index, action) in actions.into_iter().rev() {
        match action {
            FileAction::RemoveDuplicates => state.remove_duplicates(index),
            FileAction::FillMissing => state.fill_missing(index),
            FileAction::ToggleColumn(name) => state.toggle_column(index, &name),
            FileAction::SelectAll => state.select_all_columns(index),
            FileAction::SelectNone => state.select_no_columns(index),
            FileAction::Convert => state.convert(index),
            FileAction::Save => panels::save_file_dialog(state, index),
            FileAction::Close => state.close_file(index),
        }
    }
}

fn file_card(
    ui: &mut Ui,
    index: usize,
    file: &mut LoadedFile,
    preview_rows: usize,
    chart_series: usize,
    pdf_available: bool,
    push: &mut impl FnMut(FileAction),
) {
    let name = file.name().to_string();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "Data loaded ({}): {} rows, {} columns",
            file.format,
            file.table.num_rows(),
            file.table.num_columns()
        ));
        if ui.small_button("Close").clicked() {
            push(FileAction::Close);
        }
    });
    table_preview(ui, ("preview", index), &file.table, preview_rows);

    // ---- Cleaning ----
    ui.add_space(6.0);
    ui.strong("Data Cleaning Options");
    ui.checkbox(&mut file.cleaning_open, format!("Clean data for {name}"));
    if file.cleaning_open {
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Remove Duplicates").clicked() {
                push(FileAction::RemoveDuplicates);
            }
            if ui.button("Handle Missing Values").clicked() {
                push(FileAction::FillMissing);
            }
        });
    }

    // ---- Column selection ----
    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Select columns to keep");
        ui.weak(format!(
            "{} of {} selected",
            file.selection.names().len(),
            file.table.num_columns()
        ));
    });
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            push(FileAction::SelectAll);
        }
        if ui.small_button("None").clicked() {
            push(FileAction::SelectNone);
        }
        for column in file.table.column_names() {
            let mut checked = file.selection.contains(&column);
            if ui.checkbox(&mut checked, column.as_str()).changed() {
                push(FileAction::ToggleColumn(column));
            }
        }
    });
    match file.projected() {
        Ok(projected) if projected.num_columns() > 0 => {
            table_preview(ui, ("projected", index), &projected, preview_rows);
        }
        Ok(_) => {
            ui.label("No columns selected.");
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }

    // ---- Visualization ----
    ui.add_space(6.0);
    ui.strong("Data Visualization");
    ui.checkbox(&mut file.show_chart, format!("Show Visualization for {name}"));
    if file.show_chart {
        plot::numeric_bar_chart(ui, &format!("chart_{index}"), &file.table, chart_series);
    }

    // ---- Conversion ----
    ui.add_space(6.0);
    ui.strong("Convert Data Format");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Choose Format:");
        for format in OutputFormat::ALL {
            let enabled = format != OutputFormat::Pdf || pdf_available;
            ui.add_enabled_ui(enabled, |ui: &mut Ui| {
                ui.radio_value(&mut file.target, format, format.to_string());
            });
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.button(format!("Convert {name}")).clicked() {
            push(FileAction::Convert);
        }
        if let Some(result) = &file.conversion {
            if ui.button(format!("Download {}", result.file_name)).clicked() {
                push(FileAction::Save);
            }
            ui.label(format!("{} bytes, {}", result.bytes.len(), result.mime_type));
        }
    });
}

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

/// Scrollable grid showing at most `max_rows` rows of `table`.
fn table_preview(ui: &mut Ui, id: impl std::hash::Hash, table: &Table, max_rows: usize) {
    if table.num_columns() == 0 {
        ui.label("Empty table.");
        return;
    }
    let shown = table.num_rows().min(max_rows);

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(true)
                .max_scroll_height(240.0)
                .columns(TableColumn::auto().at_least(60.0), table.num_columns())
                .header(20.0, |mut header| {
                    for name in table.column_names() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, shown, |mut row| {
                        let i = row.index();
                        for cell in table.row(i) {
                            row.col(|ui: &mut Ui| {
                                match cell {
                                    CellValue::Null => ui.weak("NaN"),
                                    other => ui.label(other.to_string()),
                                };
                            });
                        }
                    });
                });
        });
    });

    if shown < table.num_rows() {
        ui.weak(format!("Showing first {shown} of {} rows", table.num_rows()));
    }
}
