use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;

use super::OutputFormat;
use crate::data::model::{CellValue, Column, ColumnKind, Table};
use crate::error::{Result, SweepError};

/// Parquet file with one nullable field per column, no index column.
///
/// Column types: `Int64` for integer-only numeric columns, `Float64` for the
/// remaining numeric ones (including all-missing columns), `Boolean` and
/// `Utf8`.
pub fn to_parquet(table: &Table) -> Result<Vec<u8>> {
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = table
        .columns()
        .iter()
        .map(|column| {
            let array = column_to_array(column);
            let field = Field::new(&column.name, array.data_type().clone(), true);
            (field, array)
        })
        .unzip();

    let schema = Arc::new(Schema::new(fields));
    // Row count is explicit so a table with no columns still writes.
    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)
        .map_err(|e| SweepError::serialize(OutputFormat::Parquet, e))?;

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None)
        .map_err(|e| SweepError::serialize(OutputFormat::Parquet, e))?;
    writer
        .write(&batch)
        .map_err(|e| SweepError::serialize(OutputFormat::Parquet, e))?;
    writer
        .close()
        .map_err(|e| SweepError::serialize(OutputFormat::Parquet, e))?;

    Ok(buffer)
}

fn column_to_array(column: &Column) -> ArrayRef {
    let values = &column.values;
    match column.kind() {
        ColumnKind::Numeric if column.has_floats() || column.null_count() == column.len() => {
            Arc::new(values.iter().map(CellValue::as_f64).collect::<Float64Array>())
        }
        ColumnKind::Numeric => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        ColumnKind::Boolean => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        ColumnKind::Text => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    CellValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect::<StringArray>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Seek, SeekFrom, Write};

    use arrow::array::AsArray;
    use arrow::datatypes::{DataType, Float64Type, Int64Type};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::data::model::tests::{s, table};
    use crate::data::project::project;

    fn arrow_type(column: &Column) -> DataType {
        column_to_array(column).data_type().clone()
    }

    #[test]
    fn parquet_reads_back_with_typed_columns() {
        let t = table(vec![
            ("name", vec![s("Alice"), CellValue::Null]),
            ("age", vec![CellValue::Integer(30), CellValue::Null]),
            ("score", vec![CellValue::Float(1.5), CellValue::Float(2.0)]),
            ("ok", vec![CellValue::Bool(true), CellValue::Bool(false)]),
        ]);
        let bytes = to_parquet(&t).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");

        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];

        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["name", "age", "score", "ok"]);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);

        let age = batch.column(1).as_primitive::<Int64Type>();
        assert_eq!(age.value(0), 30);
        assert!(age.is_null(1));
        let score = batch.column(2).as_primitive::<Float64Type>();
        assert_eq!(score.value(1), 2.0);
        assert_eq!(batch.column(0).as_string::<i32>().value(0), "Alice");
        assert!(batch.column(3).as_boolean().value(0));
    }

    #[test]
    fn table_without_columns_writes_empty_schema() {
        let t = table(vec![("name", vec![s("Alice"), s("Bob")])]);
        let empty = project(&t, &[]).unwrap();
        let bytes = to_parquet(&empty).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");

        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert!(builder.schema().fields().is_empty());
    }

    #[test]
    fn all_missing_column_is_float() {
        let c = Column::new("empty", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(arrow_type(&c), DataType::Float64);
        let c = Column::new("n", vec![CellValue::Integer(1)]);
        assert_eq!(arrow_type(&c), DataType::Int64);
    }
}
