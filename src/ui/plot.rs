use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::generate_palette;
use crate::data::chart::numeric_series;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Bar chart of the leading numeric columns
// ---------------------------------------------------------------------------

/// Render grouped bars, one group per row, one bar per numeric column.
pub fn numeric_bar_chart(ui: &mut Ui, id: &str, table: &Table, max_series: usize) {
    let series = numeric_series(table, max_series);
    if series.is_empty() {
        ui.label("No numeric columns to chart.");
        return;
    }

    let colors = generate_palette(series.len());
    let bar_width = 0.8 / series.len() as f64;

    Plot::new(id)
        .legend(Legend::default())
        .height(200.0)
        .x_axis_label("Row")
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (k, s) in series.iter().enumerate() {
                // Centre the group of bars on the row index.
                let offset = (k as f64 - (series.len() as f64 - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = s
                    .points
                    .iter()
                    .map(|&[x, y]| Bar::new(x + offset, y).width(bar_width))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&s.name).color(colors[k]));
            }
        });
}
