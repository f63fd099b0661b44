use std::collections::BTreeSet;

use super::model::Table;
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// Column projection
// ---------------------------------------------------------------------------

/// Return a new table holding exactly `names`, in that order.
///
/// Every requested name must exist in `table`; the source is never modified.
/// A name listed twice is kept at its first position.
pub fn project(table: &Table, names: &[String]) -> Result<Table> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let column = table
            .column(name)
            .ok_or_else(|| SweepError::UnknownColumn(name.clone()))?;
        if seen.insert(name.as_str()) {
            columns.push(column.clone());
        }
    }
    Table::new(columns)
}

// ---------------------------------------------------------------------------
// Selection state: which columns the user keeps
// ---------------------------------------------------------------------------

/// Columns ticked in the multiselect, kept in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSelection {
    selected: Vec<String>,
}

impl ColumnSelection {
    /// Select every column of `table` (the default).
    pub fn all(table: &Table) -> Self {
        ColumnSelection {
            selected: table.column_names(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.selected
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    /// Flip one column in or out, keeping the table's column order.
    pub fn toggle(&mut self, table: &Table, name: &str) {
        let mut chosen: BTreeSet<String> = self.selected.iter().cloned().collect();
        if !chosen.remove(name) {
            chosen.insert(name.to_string());
        }
        self.selected = table
            .column_names()
            .into_iter()
            .filter(|n| chosen.contains(n))
            .collect();
    }

    pub fn select_all(&mut self, table: &Table) {
        self.selected = table.column_names();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Project `table` onto the current selection.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        project(table, &self.selected)
    }
}
