/// Format conversion: serialize a [`Table`] into a downloadable artifact.
///
/// ```text
///   Table ──┬── text      → CSV / JSON / HTML table
///           ├── excel     → XLSX (single sheet)
///           ├── columnar  → Parquet
///           └── pdf       → HTML table → temp file → PdfRenderer → PDF
/// ```
use std::fmt;

use crate::data::model::Table;
use crate::error::Result;

pub mod columnar;
pub mod excel;
pub mod pdf;
pub mod text;

use pdf::PdfRenderer;

// ---------------------------------------------------------------------------
// Output formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Excel,
    Json,
    Pdf,
    Parquet,
    HtmlTable,
}

impl OutputFormat {
    /// Every format, in the order offered by the UI.
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Csv,
        OutputFormat::Excel,
        OutputFormat::Json,
        OutputFormat::Pdf,
        OutputFormat::Parquet,
        OutputFormat::HtmlTable,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Excel => "xlsx",
            OutputFormat::Json => "json",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Parquet => "parquet",
            OutputFormat::HtmlTable => "html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputFormat::Json => "application/json",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Parquet => "application/octet-stream",
            OutputFormat::HtmlTable => "text/html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Excel => "Excel",
            OutputFormat::Json => "JSON",
            OutputFormat::Pdf => "PDF",
            OutputFormat::Parquet => "Parquet",
            OutputFormat::HtmlTable => "HTML Table",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// A finished conversion, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Serialize `table` as `format`, naming the output after `original_name`.
///
/// `renderer` is the PDF capability probed at start-up; `None` makes PDF
/// requests fail with `BackendUnavailable`.
pub fn convert(
    table: &Table,
    format: OutputFormat,
    original_name: &str,
    renderer: Option<&dyn PdfRenderer>,
) -> Result<ConversionResult> {
    let bytes = match format {
        OutputFormat::Csv => text::to_csv(table)?,
        OutputFormat::Excel => excel::to_xlsx(table)?,
        OutputFormat::Json => text::to_json(table)?,
        OutputFormat::Pdf => pdf::to_pdf(table, renderer)?,
        OutputFormat::Parquet => columnar::to_parquet(table)?,
        OutputFormat::HtmlTable => text::to_html(table).into_bytes(),
    };

    let file_name = output_file_name(original_name, format.extension());
    log::info!(
        "Converted {original_name} to {format}: {file_name} ({} bytes)",
        bytes.len()
    );

    Ok(ConversionResult {
        bytes,
        file_name,
        mime_type: format.mime_type(),
    })
}

/// Replace the final extension of `original` with `extension`.
///
/// Names without an extension (no `.` after a non-empty stem) get the new
/// extension appended instead.
pub fn output_file_name(original: &str, extension: &str) -> String {
    match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.{extension}"),
        _ => format!("{original}.{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::data::model::tests::{s, table};
    use crate::error::SweepError;

    fn people() -> Table {
        table(vec![
            ("name", vec![s("Alice"), s("Bob")]),
            ("age", vec![CellValue::Integer(30), CellValue::Integer(25)]),
        ])
    }

    #[test]
    fn output_names_replace_or_append_extension() {
        assert_eq!(output_file_name("data.csv", "json"), "data.json");
        assert_eq!(output_file_name("Report.XLSX", "csv"), "Report.csv");
        assert_eq!(output_file_name("a.csv.backup.csv", "json"), "a.csv.backup.json");
        assert_eq!(output_file_name("README", "csv"), "README.csv");
        assert_eq!(output_file_name(".hidden", "csv"), ".hidden.csv");
    }

    #[test]
    fn result_carries_name_and_mime() {
        let t = people();
        for format in OutputFormat::ALL {
            if format == OutputFormat::Pdf {
                continue;
            }
            let result = convert(&t, format, "people.xlsx", None).unwrap();
            assert_eq!(result.file_name, format!("people.{}", format.extension()));
            assert_eq!(result.mime_type, format.mime_type());
            assert!(!result.bytes.is_empty());
        }
    }

    #[test]
    fn pdf_without_backend_is_unavailable() {
        let err = convert(&people(), OutputFormat::Pdf, "people.csv", None).unwrap_err();
        assert!(matches!(err, SweepError::BackendUnavailable));
    }

    #[test]
    fn csv_mime_and_extension() {
        assert_eq!(OutputFormat::Csv.mime_type(), "text/csv");
        assert_eq!(OutputFormat::Parquet.mime_type(), "application/octet-stream");
        assert_eq!(OutputFormat::HtmlTable.extension(), "html");
    }
}
