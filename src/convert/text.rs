use std::fmt::Write as _;

use serde_json::{Map, Number, Value as JsonValue};

use super::OutputFormat;
use crate::data::model::{CellValue, Table};
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row plus one record per row, no index column.
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    if table.num_columns() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.column_names())
        .map_err(|e| SweepError::serialize(OutputFormat::Csv, e))?;

    for i in 0..table.num_rows() {
        writer
            .write_record(table.row(i).iter().map(|v| v.to_string()))
            .map_err(|e| SweepError::serialize(OutputFormat::Csv, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| SweepError::serialize(OutputFormat::Csv, e.error()))
}

// ---------------------------------------------------------------------------
// JSON (records orientation)
// ---------------------------------------------------------------------------

/// `[{"col": value, ...}, ...]`, one object per row, keys in column order.
pub fn to_json(table: &Table) -> Result<Vec<u8>> {
    let names = table.column_names();
    let records: Vec<JsonValue> = (0..table.num_rows())
        .map(|i| {
            let object: Map<String, JsonValue> = names
                .iter()
                .cloned()
                .zip(table.row(i).into_iter().map(cell_to_json))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    serde_json::to_vec(&JsonValue::Array(records))
        .map_err(|e| SweepError::serialize(OutputFormat::Json, e))
}

fn cell_to_json(value: &CellValue) -> JsonValue {
    match value {
        CellValue::Null => JsonValue::Null,
        CellValue::Bool(b) => JsonValue::Bool(*b),
        CellValue::Integer(i) => JsonValue::Number((*i).into()),
        CellValue::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        CellValue::String(s) => JsonValue::String(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// HTML table
// ---------------------------------------------------------------------------

/// A standalone `<table>` with a header row and no index column.
pub fn to_html(table: &Table) -> String {
    let mut html = String::new();
    html.push_str("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for name in table.column_names() {
        let _ = writeln!(html, "      <th>{}</th>", escape_html(&name));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for i in 0..table.num_rows() {
        html.push_str("    <tr>\n");
        for cell in table.row(i) {
            let text = match cell {
                CellValue::Null => "NaN".to_string(),
                other => escape_html(&other.to_string()),
            };
            let _ = writeln!(html, "      <td>{text}</td>");
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::intake::SourceFormat;
    use crate::data::loader::load_table;
    use crate::data::model::tests::{s, table};

    fn people() -> Table {
        table(vec![
            ("name", vec![s("Alice"), s("Bob")]),
            ("age", vec![CellValue::Integer(30), CellValue::Null]),
            ("height", vec![CellValue::Float(1.7), CellValue::Float(1.8)]),
        ])
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let bytes = to_csv(&people()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,age,height\nAlice,30,1.7\nBob,,1.8\n"
        );
    }

    #[test]
    fn csv_round_trips_through_loader() {
        let original = table(vec![
            ("city", vec![s("Oslo"), s("São Paulo, BR"), CellValue::Null]),
            ("pop", vec![CellValue::Float(0.7), CellValue::Float(12.3), CellValue::Float(4.0)]),
            ("capital", vec![CellValue::Bool(true), CellValue::Bool(false), CellValue::Null]),
            ("rank", vec![CellValue::Integer(3), CellValue::Null, CellValue::Integer(1)]),
        ]);
        let bytes = to_csv(&original).unwrap();
        let reloaded = load_table(&bytes, SourceFormat::Csv).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn json_is_array_of_row_objects() {
        let bytes = to_json(&people()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with(r#"[{"name":"Alice","age":30,"height":1.7}"#));

        let parsed: JsonValue = serde_json::from_slice(&bytes).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "Bob");
        assert!(rows[1]["age"].is_null());
    }

    #[test]
    fn json_reparses_to_the_same_values() {
        let t = table(vec![
            ("name", vec![s("Alice"), s("Bob \"B\""), CellValue::Null]),
            ("age", vec![CellValue::Integer(30), CellValue::Null, CellValue::Integer(-4)]),
            ("height", vec![CellValue::Float(1.7), CellValue::Float(2.0), CellValue::Null]),
            ("ok", vec![CellValue::Bool(true), CellValue::Null, CellValue::Bool(false)]),
        ]);
        let bytes = to_json(&t).unwrap();
        let parsed: Vec<Map<String, JsonValue>> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.len(), t.num_rows());

        for (i, row) in parsed.iter().enumerate() {
            let keys: Vec<&String> = row.keys().collect();
            assert_eq!(keys, t.column_names().iter().collect::<Vec<_>>());
            for column in t.columns() {
                let json = &row[&column.name];
                match &column.values[i] {
                    CellValue::Null => assert!(json.is_null()),
                    CellValue::Bool(b) => assert_eq!(json.as_bool(), Some(*b)),
                    CellValue::String(text) => assert_eq!(json.as_str(), Some(text.as_str())),
                    number => assert_eq!(json.as_f64(), number.as_f64()),
                }
            }
        }
    }

    #[test]
    fn html_escapes_and_marks_missing() {
        let t = table(vec![
            ("a<b", vec![s("x & y"), CellValue::Null]),
        ]);
        let html = to_html(&t);
        assert!(html.starts_with("<table border=\"1\" class=\"dataframe\">"));
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<td>x &amp; y</td>"));
        assert!(html.contains("<td>NaN</td>"));
        assert!(html.ends_with("</table>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }
}
