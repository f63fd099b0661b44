use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow, bail};

use super::text::to_html;
use crate::config::PdfBackendConfig;
use crate::data::model::Table;
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// Renderer capability
// ---------------------------------------------------------------------------

/// Turns an HTML file on disk into PDF bytes.
pub trait PdfRenderer {
    /// Human-readable backend name for the UI.
    fn name(&self) -> &str;

    fn render(&self, html_file: &Path) -> anyhow::Result<Vec<u8>>;
}

/// Render `table` as an HTML table, then hand it to `renderer`.
///
/// Without a renderer this fails before touching the filesystem. The
/// intermediate HTML file is deleted when it goes out of scope, whichever
/// way this function returns.
pub fn to_pdf(table: &Table, renderer: Option<&dyn PdfRenderer>) -> Result<Vec<u8>> {
    let renderer = renderer.ok_or(SweepError::BackendUnavailable)?;

    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n{}\n</body>\n</html>\n",
        to_html(table)
    );

    let html_file = write_temp_html(&document).map_err(render_error)?;
    log::debug!(
        "Rendering {} with {}",
        html_file.path().display(),
        renderer.name()
    );

    let pdf = renderer.render(html_file.path()).map_err(render_error)?;
    if pdf.is_empty() {
        return Err(SweepError::Render(format!(
            "{} produced no output",
            renderer.name()
        )));
    }
    Ok(pdf)
}

fn write_temp_html(document: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("data-sweeper-")
        .suffix(".html")
        .tempfile()
        .context("creating temporary HTML file")?;
    file.write_all(document.as_bytes())
        .context("writing temporary HTML file")?;
    file.flush().context("flushing temporary HTML file")?;
    Ok(file)
}

fn render_error(e: anyhow::Error) -> SweepError {
    SweepError::Render(format!("{e:#}"))
}

// ---------------------------------------------------------------------------
// wkhtmltopdf backend
// ---------------------------------------------------------------------------

/// The external `wkhtmltopdf` executable.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: PathBuf,
    timeout: Duration,
    version: String,
}

impl WkHtmlToPdf {
    /// Run `<binary> --version`; `Some` when the backend answers.
    pub fn probe(config: &PdfBackendConfig) -> Option<Self> {
        let output = Command::new(&config.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                log::info!("PDF backend available: {version}");
                Some(WkHtmlToPdf {
                    binary: config.binary.clone(),
                    timeout: config.timeout,
                    version,
                })
            }
            Ok(out) => {
                log::warn!(
                    "PDF export disabled: {} --version exited with {}",
                    config.binary.display(),
                    out.status
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "PDF export disabled: cannot run {} ({e})",
                    config.binary.display()
                );
                None
            }
        }
    }
}

impl PdfRenderer for WkHtmlToPdf {
    /// The banner printed by `--version`, e.g. `wkhtmltopdf 0.12.6`.
    fn name(&self) -> &str {
        &self.version
    }

    fn render(&self, html_file: &Path) -> anyhow::Result<Vec<u8>> {
        let mut child = Command::new(&self.binary)
            .arg("--quiet")
            .arg(html_file)
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("starting {}", self.binary.display()))?;

        let stdout = child.stdout.take().context("capturing backend stdout")?;
        let stderr = child.stderr.take().context("capturing backend stderr")?;
        let stdout_reader = thread::spawn(move || read_all(stdout));
        let stderr_reader = thread::spawn(move || read_all(stderr));

        let status = wait_with_timeout(&mut child, self.timeout)?;

        let pdf = stdout_reader
            .join()
            .map_err(|_| anyhow!("backend stdout reader panicked"))?
            .context("reading backend output")?;
        let diagnostics = stderr_reader
            .join()
            .map_err(|_| anyhow!("backend stderr reader panicked"))?
            .unwrap_or_default();

        match status {
            None => bail!("timed out after {}s", self.timeout.as_secs_f32()),
            Some(status) if !status.success() => bail!(
                "{} exited with {status}: {}",
                self.name(),
                String::from_utf8_lossy(&diagnostics).trim()
            ),
            Some(_) => Ok(pdf),
        }
    }
}

fn read_all(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Wait for `child`, killing it once `timeout` has elapsed.
///
/// Returns `None` when the child had to be killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> anyhow::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().context("waiting for backend")? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            child.kill().context("killing backend after timeout")?;
            child.wait().context("reaping backend after timeout")?;
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(25));
    }
}
