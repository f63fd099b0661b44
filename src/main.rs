mod app;
mod color;
mod config;
mod convert;
mod data;
mod error;
mod state;
mod ui;

use app::DataSweeperApp;
use config::{AppConfig, PdfBackendConfig};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig {
        pdf: PdfBackendConfig::from_env(),
        ..AppConfig::default()
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Data Sweeper",
        options,
        Box::new(move |_cc| Ok(Box::new(DataSweeperApp::new(&config)))),
    )
}
