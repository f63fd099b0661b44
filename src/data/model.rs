use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
///
/// Equality, ordering and hashing all go through [`Ord::cmp`] (floats by
/// `total_cmp`, hashed by bit pattern) so whole rows can live in a `HashSet`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Textual form used by the CSV writer: missing cells are empty and floats
/// always keep a fractional part (`30.0`).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for charting and averaging.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred type of a column, derived from its non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integers and/or floats. A column with no values at all is numeric too.
    Numeric,
    Boolean,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn kind(&self) -> ColumnKind {
        let mut present = self.values.iter().filter(|v| !v.is_null()).peekable();
        if present.peek().is_none() {
            return ColumnKind::Numeric;
        }
        let mut kind = None;
        for value in present {
            let this = match value {
                CellValue::Integer(_) | CellValue::Float(_) => ColumnKind::Numeric,
                CellValue::Bool(_) => ColumnKind::Boolean,
                _ => ColumnKind::Text,
            };
            match kind {
                None => kind = Some(this),
                Some(k) if k != this => return ColumnKind::Text,
                Some(_) => {}
            }
        }
        kind.unwrap_or(ColumnKind::Numeric)
    }

    /// Whether any non-missing value is a float.
    pub fn has_floats(&self) -> bool {
        self.values.iter().any(|v| matches!(v, CellValue::Float(_)))
    }

    /// Coerce every value to the column's single inferred kind.
    ///
    /// Numeric columns holding any float become all-float; columns mixing
    /// kinds fall back to text.
    pub fn normalize(&mut self) {
        match self.kind() {
            ColumnKind::Numeric if self.has_floats() => self.promote_to_float(),
            ColumnKind::Text => {
                for value in &mut self.values {
                    if !value.is_null() && !matches!(value, CellValue::String(_)) {
                        *value = CellValue::String(value.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    pub(crate) fn promote_to_float(&mut self) {
        for value in &mut self.values {
            if let CellValue::Integer(i) = value {
                *value = CellValue::Float(*i as f64);
            }
        }
    }

    /// Mean of the non-missing numeric values, `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .values
            .iter()
            .filter(|v| v.is_numeric())
            .filter_map(CellValue::as_f64)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

// ---------------------------------------------------------------------------
// Table – the unit of data flowing through every component
// ---------------------------------------------------------------------------

/// Named, equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(SweepError::ColumnLengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    found: bad.len(),
                });
            }
        }
        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Borrow the cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// Keep only the rows whose flag in `keep` is `true`.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| flags.next().copied().unwrap_or(true));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from `(name, values)` pairs.
    pub(crate) fn table(columns: Vec<(&str, Vec<CellValue>)>) -> Table {
        Table::new(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
        .unwrap()
    }

    pub(crate) fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            Column::new("b", vec![CellValue::Integer(1)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            SweepError::ColumnLengthMismatch { ref column, expected: 2, found: 1 } if column == "b"
        ));
    }

    #[test]
    fn infers_column_kinds() {
        let t = table(vec![
            ("n", vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)]),
            ("b", vec![CellValue::Bool(true), CellValue::Null, CellValue::Bool(false)]),
            ("s", vec![s("x"), CellValue::Integer(3), CellValue::Null]),
            ("empty", vec![CellValue::Null, CellValue::Null, CellValue::Null]),
        ]);
        let kinds: Vec<ColumnKind> = t.columns().iter().map(Column::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Boolean,
                ColumnKind::Text,
                ColumnKind::Numeric
            ]
        );
    }

    #[test]
    fn normalize_promotes_and_stringifies() {
        let mut numeric = Column::new("n", vec![CellValue::Integer(1), CellValue::Float(2.5)]);
        numeric.normalize();
        assert_eq!(numeric.values, vec![CellValue::Float(1.0), CellValue::Float(2.5)]);

        let mut mixed = Column::new("m", vec![s("a"), CellValue::Integer(7), CellValue::Null]);
        mixed.normalize();
        assert_eq!(mixed.values, vec![s("a"), s("7"), CellValue::Null]);
    }

    #[test]
    fn float_display_keeps_fraction() {
        assert_eq!(CellValue::Float(30.0).to_string(), "30.0");
        assert_eq!(CellValue::Float(0.25).to_string(), "0.25");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn mean_ignores_missing() {
        let c = Column::new("a", vec![CellValue::Integer(10), CellValue::Null, CellValue::Float(20.0)]);
        assert_eq!(c.mean(), Some(15.0));
        assert_eq!(Column::new("e", vec![CellValue::Null]).mean(), None);
    }
}
