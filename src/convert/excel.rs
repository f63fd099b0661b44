use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::OutputFormat;
use crate::data::model::{CellValue, Table};
use crate::error::{Result, SweepError};

/// Single-sheet workbook with a bold header row and no index column.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>> {
    write_workbook(table).map_err(|e| SweepError::serialize(OutputFormat::Excel, e))
}

fn write_workbook(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;

    let header = Format::new().set_bold();
    for (col, name) in table.column_names().iter().enumerate() {
        sheet.write_string_with_format(0, to_col(col)?, name, &header)?;
    }

    for (col, column) in table.columns().iter().enumerate() {
        let col = to_col(col)?;
        for (i, value) in column.values.iter().enumerate() {
            let row = to_row(i + 1)?;
            match value {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::Integer(n) => {
                    sheet.write_number(row, col, *n as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(row, col, *f)?;
                }
                CellValue::String(s) => {
                    sheet.write_string(row, col, s)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

fn to_row(i: usize) -> Result<u32, XlsxError> {
    u32::try_from(i).map_err(|_| XlsxError::RowColumnLimitError)
}

fn to_col(i: usize) -> Result<u16, XlsxError> {
    u16::try_from(i).map_err(|_| XlsxError::RowColumnLimitError)
}
