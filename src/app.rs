use eframe::egui;

use crate::color::{Theme, ThemeColors};
use crate::config::AppConfig;
use crate::convert::pdf::{PdfRenderer, WkHtmlToPdf};
use crate::state::AppState;
use crate::ui::{file_view, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataSweeperApp {
    pub state: AppState,
    applied_theme: Option<Theme>,
}

impl DataSweeperApp {
    /// Probe the PDF backend once and build the initial state.
    pub fn new(config: &AppConfig) -> Self {
        let pdf = WkHtmlToPdf::probe(&config.pdf).map(|b| Box::new(b) as Box<dyn PdfRenderer>);
        Self {
            state: AppState::new(config, pdf),
            applied_theme: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.state.theme) {
            return;
        }
        let colors = self.state.theme.colors();
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = colors.background;
        visuals.window_fill = colors.background;
        visuals.override_text_color = Some(colors.text);
        ctx.set_visuals(visuals);
        self.applied_theme = Some(self.state.theme);
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        let colors: ThemeColors = self.state.theme.colors();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(colors.sidebar))
            .show(ctx, |ui| {
                ui.visuals_mut().override_text_color = Some(colors.sidebar_text);
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: loaded files ----
        egui::CentralPanel::default().show(ctx, |ui| {
            file_view::files_view(ui, &mut self.state);
        });
    }
}
