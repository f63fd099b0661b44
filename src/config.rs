use std::path::PathBuf;
use std::time::Duration;

use crate::color::Theme;

/// Environment variable overriding the wkhtmltopdf executable.
pub const WKHTMLTOPDF_ENV: &str = "DATA_SWEEPER_WKHTMLTOPDF";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Start-up settings. Built once in `main`; nothing is read from disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Rows shown in a preview table.
    pub preview_rows: usize,
    /// Numeric columns drawn by the chart.
    pub chart_series: usize,
    pub theme: Theme,
    pub pdf: PdfBackendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1280.0, 860.0],
            min_window_size: [720.0, 480.0],
            preview_rows: 200,
            chart_series: 2,
            theme: Theme::DarkBlack,
            pdf: PdfBackendConfig::default(),
        }
    }
}

/// How to find and run the HTML → PDF backend.
#[derive(Debug, Clone)]
pub struct PdfBackendConfig {
    pub binary: PathBuf,
    pub timeout: Duration,
}

impl Default for PdfBackendConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("wkhtmltopdf"),
            timeout: Duration::from_secs(60),
        }
    }
}

impl PdfBackendConfig {
    /// Defaults, with the executable taken from [`WKHTMLTOPDF_ENV`] when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(binary) = std::env::var_os(WKHTMLTOPDF_ENV).filter(|v| !v.is_empty()) {
            config.binary = PathBuf::from(binary);
        }
        config
    }
}
