use super::model::{ColumnKind, Table};

/// One numeric column prepared for plotting against the row index.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// `[row index, value]`; missing cells are skipped.
    pub points: Vec<[f64; 2]>,
}

/// The first `max_series` numeric columns of `table` as bar-chart series.
pub fn numeric_series(table: &Table, max_series: usize) -> Vec<ChartSeries> {
    table
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .take(max_series)
        .map(|column| ChartSeries {
            name: column.name.clone(),
            points: column
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.as_f64().map(|y| [i as f64, y]))
                .collect(),
        })
        .collect()
}
