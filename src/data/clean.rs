use std::collections::HashSet;

use super::model::{CellValue, ColumnKind, Table};

/// Drop rows identical (in every column) to an earlier row.
///
/// First occurrences are kept in their original order. Returns the number of
/// rows removed.
pub fn deduplicate(table: &mut Table) -> usize {
    let n_rows = table.num_rows();
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(n_rows);
    let keep: Vec<bool> = (0..n_rows).map(|i| seen.insert(table.row(i))).collect();
    drop(seen);

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// The mean is taken over the column's current non-missing values and the
/// column becomes all-float. Numeric columns without any value are left
/// untouched. Returns the number of cells filled.
pub fn impute_numeric_mean(table: &mut Table) -> usize {
    let mut filled = 0;
    for column in table.columns_mut() {
        if column.kind() != ColumnKind::Numeric || column.null_count() == 0 {
            continue;
        }
        let Some(mean) = column.mean() else {
            continue;
        };
        column.promote_to_float();
        for value in &mut column.values {
            if value.is_null() {
                *value = CellValue::Float(mean);
                filled += 1;
            }
        }
    }
    filled
}
