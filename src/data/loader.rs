use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};

use super::intake::{SourceFormat, UploadedFile};
use super::model::{CellValue, Column, Table};
use crate::error::SweepError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a byte stream of the declared format into a [`Table`].
///
/// Supported formats:
/// * CSV  – first record is the header, cell types are inferred
/// * XLSX – first worksheet, first row is the header
pub fn load_table(bytes: &[u8], format: SourceFormat) -> Result<Table, SweepError> {
    let parsed = match format {
        SourceFormat::Csv => load_csv(bytes),
        SourceFormat::Xlsx => load_xlsx(bytes),
    };
    parsed.map_err(|e| SweepError::Parse {
        format,
        message: format!("{e:#}"),
    })
}

/// Classify an upload by its name and parse it.
pub fn load_upload(upload: &UploadedFile) -> Result<(SourceFormat, Table), SweepError> {
    let format = upload.format()?;
    Ok((format, load_table(&upload.bytes, format)?))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let headers = unique_headers(headers);

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        for (col_idx, field) in record.iter().enumerate() {
            values[col_idx].push(guess_cell_type(field));
        }
    }

    build_table(headers, values)
}

/// Text treated as a missing value.
const NULL_MARKERS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

fn guess_cell_type(s: &str) -> CellValue {
    if NULL_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn load_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).context("opening XLSX workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {i}"),
            other => other.to_string(),
        })
        .collect();
    let headers = unique_headers(headers);

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, cell) in row.iter().enumerate() {
            values[col_idx].push(xlsx_cell_value(cell));
        }
    }

    build_table(headers, values)
}

fn xlsx_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if is_whole(*f) => CellValue::Integer(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if NULL_MARKERS.contains(&s.as_str()) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::String(ndt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// Excel stores every number as a double; whole values load as integers.
fn is_whole(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Suffix repeated header names (`a`, `a.1`, `a.2`) so every column is
/// addressable by name.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name.clone()
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn build_table(headers: Vec<String>, values: Vec<Vec<CellValue>>) -> Result<Table> {
    let columns: Vec<Column> = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| {
            let mut column = Column::new(name, values);
            column.normalize();
            column
        })
        .collect();

    Ok(Table::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;
    use crate::data::model::tests::s;

    #[test]
    fn csv_infers_types_and_missing_values() {
        let table = load_table(
            b"name,age,score,active\nAlice,30,1.5,true\nBob,,NA,False\n",
            SourceFormat::Csv,
        )
        .unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "score", "active"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("name").unwrap().values, vec![s("Alice"), s("Bob")]);
        assert_eq!(
            table.column("age").unwrap().values,
            vec![CellValue::Integer(30), CellValue::Null]
        );
        assert_eq!(
            table.column("score").unwrap().values,
            vec![CellValue::Float(1.5), CellValue::Null]
        );
        assert_eq!(table.column("active").unwrap().kind(), ColumnKind::Boolean);
    }

    #[test]
    fn csv_mixed_column_becomes_text() {
        let table = load_table(b"code\n12\nA7\n", SourceFormat::Csv).unwrap();
        let code = table.column("code").unwrap();
        assert_eq!(code.kind(), ColumnKind::Text);
        assert_eq!(code.values, vec![s("12"), s("A7")]);
    }

    #[test]
    fn csv_promotes_integers_next_to_floats() {
        let table = load_table(b"v\n1\n2.5\n", SourceFormat::Csv).unwrap();
        assert_eq!(
            table.column("v").unwrap().values,
            vec![CellValue::Float(1.0), CellValue::Float(2.5)]
        );
    }

    #[test]
    fn csv_ragged_rows_are_parse_errors() {
        let err = load_table(b"a,b\n1,2\n3\n", SourceFormat::Csv).unwrap_err();
        assert!(matches!(err, SweepError::Parse { format: SourceFormat::Csv, .. }));
    }

    #[test]
    fn csv_repeated_headers_are_suffixed() {
        let table = load_table(b"a,a,b,a\n1,2,3,4\n", SourceFormat::Csv).unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "b", "a.2"]);
    }

    #[test]
    fn xlsx_reads_first_sheet() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "device").unwrap();
        sheet.write_string(0, 1, "price").unwrap();
        sheet.write_string(1, 0, "Pixel").unwrap();
        sheet.write_number(1, 1, 499.0).unwrap();
        sheet.write_string(2, 0, "Galaxy").unwrap();
        sheet.write_number(2, 1, 649.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = load_table(&bytes, SourceFormat::Xlsx).unwrap();
        assert_eq!(table.column_names(), vec!["device", "price"]);
        assert_eq!(table.column("device").unwrap().values, vec![s("Pixel"), s("Galaxy")]);
        let prices: Vec<f64> = table
            .column("price")
            .unwrap()
            .values
            .iter()
            .filter_map(CellValue::as_f64)
            .collect();
        assert_eq!(prices, vec![499.0, 649.5]);
    }

    #[test]
    fn xlsx_whole_numbers_load_as_integers() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "age").unwrap();
        sheet.write_string(1, 0, "Alice").unwrap();
        sheet.write_number(1, 1, 30).unwrap();
        sheet.write_string(2, 0, "Bob").unwrap();
        sheet.write_number(2, 1, 25).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = load_table(&bytes, SourceFormat::Xlsx).unwrap();
        let age = table.column("age").unwrap();
        assert_eq!(age.values, vec![CellValue::Integer(30), CellValue::Integer(25)]);
        assert!(!age.has_floats());

        let csv = crate::convert::text::to_csv(&table).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "name,age\nAlice,30\nBob,25\n");
    }

    #[test]
    fn xlsx_rejects_garbage() {
        let err = load_table(b"definitely not a zip archive", SourceFormat::Xlsx).unwrap_err();
        assert!(matches!(err, SweepError::Parse { format: SourceFormat::Xlsx, .. }));
    }

    #[test]
    fn upload_is_classified_then_parsed() {
        let upload = UploadedFile::new("People.CSV", b"name\nAlice\n".to_vec());
        let (format, table) = load_upload(&upload).unwrap();
        assert_eq!(format, SourceFormat::Csv);
        assert_eq!(table.column("name").unwrap().values, vec![s("Alice")]);
    }

    #[test]
    fn upload_with_unknown_extension_is_unsupported() {
        let upload = UploadedFile::new("table.ods", b"x".to_vec());
        assert!(matches!(
            load_upload(&upload),
            Err(SweepError::UnsupportedFormat(ref e)) if e == "ods"
        ));
    }
}
