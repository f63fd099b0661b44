use std::path::Path;

use crate::color::Theme;
use crate::config::AppConfig;
use crate::convert::pdf::PdfRenderer;
use crate::convert::{self, ConversionResult, OutputFormat};
use crate::data::clean::{deduplicate, impute_numeric_mean};
use crate::data::intake::{SourceFormat, UploadedFile};
use crate::data::loader::load_upload;
use crate::data::model::Table;
use crate::data::project::ColumnSelection;
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// Per-file workspace
// ---------------------------------------------------------------------------

/// One uploaded file and everything the user did to it.
pub struct LoadedFile {
    /// Original upload, kept so "Refresh data" can re-parse it.
    pub upload: UploadedFile,
    pub format: SourceFormat,
    pub table: Table,
    pub selection: ColumnSelection,
    pub cleaning_open: bool,
    pub show_chart: bool,
    pub target: OutputFormat,
    /// Last conversion, offered for saving until the data changes.
    pub conversion: Option<ConversionResult>,
}

impl LoadedFile {
    fn new(upload: UploadedFile, format: SourceFormat, table: Table) -> Self {
        let selection = ColumnSelection::all(&table);
        LoadedFile {
            upload,
            format,
            table,
            selection,
            cleaning_open: false,
            show_chart: false,
            target: OutputFormat::default(),
            conversion: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.upload.name
    }

    /// The table restricted to the selected columns.
    pub fn projected(&self) -> Result<Table> {
        self.selection.apply(&self.table)
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Success(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every user action is a method taking the file index it applies to; errors
/// end up in `status` and never abort the session.
pub struct AppState {
    pub files: Vec<LoadedFile>,
    pub status: Option<Status>,
    pub theme: Theme,
    pub show_overview: bool,
    pub auto_clean: bool,
    pub preview_rows: usize,
    pub chart_series: usize,
    pdf: Option<Box<dyn PdfRenderer>>,
}

impl AppState {
    pub fn new(config: &AppConfig, pdf: Option<Box<dyn PdfRenderer>>) -> Self {
        Self {
            files: Vec::new(),
            status: None,
            theme: config.theme,
            show_overview: false,
            auto_clean: false,
            preview_rows: config.preview_rows,
            chart_series: config.chart_series,
            pdf,
        }
    }

    /// Name of the PDF backend, if one was found at start-up.
    pub fn pdf_backend(&self) -> Option<&str> {
        self.pdf.as_deref().map(|r| r.name())
    }

    fn succeed(&mut self, message: String) {
        log::info!("{message}");
        self.status = Some(Status::Success(message));
    }

    fn fail(&mut self, err: &SweepError) {
        log::error!("{err}");
        self.status = Some(Status::Error(err.to_string()));
    }

    // -- intake ------------------------------------------------------------

    /// Parse each upload into its own workspace entry. A file that fails does
    /// not stop the others. Returns how many were loaded.
    pub fn open_uploads(&mut self, uploads: Vec<UploadedFile>) -> usize {
        let mut loaded = 0;
        let mut last_error = None;
        for upload in uploads {
            match self.ingest(upload) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    log::warn!("Rejected upload: {e}");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => self.fail(&e),
            None if loaded > 0 => self.succeed(format!("Loaded {loaded} file(s)")),
            None => {}
        }
        loaded
    }

    /// Read files from disk and open them.
    pub fn open_paths(&mut self, paths: &[impl AsRef<Path>]) -> usize {
        let mut uploads = Vec::with_capacity(paths.len());
        for path in paths {
            match UploadedFile::read(path.as_ref()) {
                Ok(upload) => uploads.push(upload),
                Err(e) => self.fail(&e),
            }
        }
        self.open_uploads(uploads)
    }

    fn ingest(&mut self, upload: UploadedFile) -> Result<()> {
        let (format, mut table) = load_upload(&upload)?;
        log::info!(
            "Loaded {}: {} rows, {} columns",
            upload.name,
            table.num_rows(),
            table.num_columns()
        );
        if self.auto_clean {
            let removed = deduplicate(&mut table);
            let filled = impute_numeric_mean(&mut table);
            log::info!("Auto-cleaned {}: {removed} duplicates, {filled} cells filled", upload.name);
        }
        self.files.push(LoadedFile::new(upload, format, table));
        Ok(())
    }

    /// Re-parse every file from its original bytes, dropping all edits.
    pub fn refresh(&mut self) {
        let uploads: Vec<UploadedFile> = self.files.drain(..).map(|f| f.upload).collect();
        self.open_uploads(uploads);
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
        self.status = None;
    }

    pub fn close_file(&mut self, index: usize) {
        if index < self.files.len() {
            let file = self.files.remove(index);
            log::info!("Closed {}", file.name());
        }
    }

    // -- cleaning ----------------------------------------------------------

    pub fn remove_duplicates(&mut self, index: usize) {
        let Some(file) = self.files.get_mut(index) else {
            return;
        };
        let removed = deduplicate(&mut file.table);
        file.conversion = None;
        let name = file.name().to_string();
        self.succeed(format!("Removed {removed} duplicate row(s) from {name}"));
    }

    pub fn fill_missing(&mut self, index: usize) {
        let Some(file) = self.files.get_mut(index) else {
            return;
        };
        let filled = impute_numeric_mean(&mut file.table);
        file.conversion = None;
        let name = file.name().to_string();
        self.succeed(format!("Filled {filled} missing value(s) in {name}"));
    }

    // -- column selection --------------------------------------------------

    pub fn toggle_column(&mut self, index: usize, column: &str) {
        if let Some(file) = self.files.get_mut(index) {
            file.selection.toggle(&file.table, column);
            file.conversion = None;
        }
    }

    pub fn select_all_columns(&mut self, index: usize) {
        if let Some(file) = self.files.get_mut(index) {
            file.selection.select_all(&file.table);
            file.conversion = None;
        }
    }

    pub fn select_no_columns(&mut self, index: usize) {
        if let Some(file) = self.files.get_mut(index) {
            file.selection.select_none();
            file.conversion = None;
        }
    }

    // -- conversion --------------------------------------------------------

    /// Convert the selected columns of a file to its chosen target format.
    pub fn convert(&mut self, index: usize) {
        let Some(file) = self.files.get(index) else {
            return;
        };
        let result = file.projected().and_then(|table| {
            convert::convert(&table, file.target, file.name(), self.pdf.as_deref())
        });

        match result {
            Ok(done) => {
                let message = format!("File conversion successful: {}", done.file_name);
                self.files[index].conversion = Some(done);
                self.succeed(message);
            }
            Err(e) => {
                self.files[index].conversion = None;
                self.fail(&e);
            }
        }
    }

    /// Write the held conversion of a file to `path`.
    pub fn save_conversion(&mut self, index: usize, path: &Path) {
        let Some(result) = self.files.get(index).and_then(|f| f.conversion.as_ref()) else {
            return;
        };
        match std::fs::write(path, &result.bytes) {
            Ok(()) => self.succeed(format!("Saved {}", path.display())),
            Err(e) => self.fail(&SweepError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn state() -> AppState {
        AppState::new(&AppConfig::default(), None)
    }

    fn upload(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn bad_upload_does_not_block_the_batch() {
        let mut st = state();
        let loaded = st.open_uploads(vec![
            upload("people.csv", "name,age\nAlice,30\n"),
            upload("notes.txt", "hello"),
            upload("more.CSV", "x\n1\n"),
        ]);
        assert_eq!(loaded, 2);
        assert_eq!(st.files.len(), 2);
        assert!(matches!(st.status, Some(Status::Error(ref m)) if m.contains(".txt")));
    }

    #[test]
    fn cleaning_actions_update_table_and_drop_stale_conversion() {
        let mut st = state();
        st.open_uploads(vec![upload("people.csv", "name,age\nAlice,30\nBob,\nAlice,30\n")]);
        st.convert(0);
        assert!(st.files[0].conversion.is_some());

        st.remove_duplicates(0);
        assert_eq!(st.files[0].table.num_rows(), 2);
        assert!(st.files[0].conversion.is_none());

        st.fill_missing(0);
        assert_eq!(
            st.files[0].table.column("age").unwrap().values[1],
            CellValue::Float(30.0)
        );
        assert!(matches!(st.status, Some(Status::Success(_))));
    }

    #[test]
    fn convert_uses_selected_columns() {
        let mut st = state();
        st.open_uploads(vec![upload("people.csv", "name,age\nAlice,30\nBob,25\n")]);
        st.toggle_column(0, "age");
        st.files[0].target = OutputFormat::Json;
        st.convert(0);

        let result = st.files[0].conversion.as_ref().unwrap();
        assert_eq!(result.file_name, "people.json");
        assert_eq!(result.mime_type, "application/json");
        assert_eq!(result.bytes, br#"[{"name":"Alice"},{"name":"Bob"}]"#);
    }

    #[test]
    fn pdf_without_backend_reports_error() {
        let mut st = state();
        assert!(st.pdf_backend().is_none());
        st.open_uploads(vec![upload("people.csv", "name\nAlice\n")]);
        st.files[0].target = OutputFormat::Pdf;
        st.convert(0);
        assert!(st.files[0].conversion.is_none());
        assert!(matches!(st.status, Some(Status::Error(ref m)) if m.contains("PDF")));
    }

    #[test]
    fn auto_clean_and_refresh() {
        let mut st = state();
        st.auto_clean = true;
        st.open_uploads(vec![upload("d.csv", "k,v\na,1\nb,\na,1\nc,3\n")]);
        assert_eq!(st.files[0].table.num_rows(), 3);

        st.auto_clean = false;
        st.refresh();
        assert_eq!(st.files.len(), 1);
        assert_eq!(st.files[0].table.num_rows(), 4);
    }

    #[test]
    fn saves_conversion_to_disk() {
        let mut st = state();
        st.open_uploads(vec![upload("people.csv", "name,age\nAlice,30\n")]);
        st.files[0].target = OutputFormat::HtmlTable;
        st.convert(0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.html");
        st.save_conversion(0, &path);
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("<td>Alice</td>"));
    }
}
