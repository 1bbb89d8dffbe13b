use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// Using `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

// ---------------------------------------------------------------------------
// Column – the named columns that switch features on
// ---------------------------------------------------------------------------

/// Columns whose presence gates a filter or an analysis section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Year,
    City,
    Level,
    Class,
    Income,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Year,
        Column::City,
        Column::Level,
        Column::Class,
        Column::Income,
    ];

    /// Header name after normalization.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Year => "TAHUN",
            Column::City => "KOTA",
            Column::Level => "JENJANG",
            Column::Class => "KELAS",
            Column::Income => "PENGHASILAN",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Column {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded sheet
// ---------------------------------------------------------------------------

/// One row of the table; cells are aligned with [`Table::columns`].
pub type Record = Vec<CellValue>;

/// A header plus rows. Row order is the file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }

    /// Cell at `row` for the named column, `None` when the column is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.index_of(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Sorted distinct non-missing values of a column (empty if absent).
    pub fn distinct_values(&self, column: &str) -> BTreeSet<CellValue> {
        let Some(idx) = self.index_of(column) else {
            return BTreeSet::new();
        };
        self.rows
            .iter()
            .map(|r| &r[idx])
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Non-missing numeric values of a column, in row order.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        let Some(idx) = self.index_of(column) else {
            return Vec::new();
        };
        self.rows.iter().filter_map(|r| r[idx].as_f64()).collect()
    }

    /// A new table holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – a normalized table with its capabilities
// ---------------------------------------------------------------------------

/// Which of the named [`Column`]s are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    bits: u8,
}

impl Capabilities {
    pub fn detect(table: &Table) -> Self {
        let bits = Column::ALL
            .iter()
            .filter(|c| table.has(c.name()))
            .fold(0u8, |acc, c| acc | (1 << *c as u8));
        Capabilities { bits }
    }

    pub fn has(&self, column: Column) -> bool {
        self.bits & (1 << column as u8) != 0
    }

    /// Columns of `required` that are absent.
    pub fn missing(&self, required: &[Column]) -> Vec<Column> {
        required.iter().copied().filter(|c| !self.has(*c)).collect()
    }
}

/// A table that has been normalized exactly once, plus the column
/// capabilities detected right after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table: Table,
    capabilities: Capabilities,
}

impl Dataset {
    /// Normalize a raw table and detect its capabilities.
    pub fn new(raw: Table) -> Self {
        let table = super::normalize::normalize_table(&raw);
        let capabilities = Capabilities::detect(&table);
        log::debug!(
            "Dataset ready: {} rows, columns {:?}",
            table.len(),
            table.columns
        );
        Dataset {
            table,
            capabilities,
        }
    }

    /// Narrow to a subset of rows; capabilities are unchanged.
    pub(crate) fn with_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            table: self.table.select_rows(indices),
            capabilities: self.capabilities,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has(&self, column: Column) -> bool {
        self.capabilities.has(column)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::from(v)
    }

    #[test]
    fn test_table_pads_and_truncates_rows() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec![s("x")], vec![s("y"), s("z"), s("extra")]],
        );
        assert_eq!(table.rows[0], vec![s("x"), CellValue::Null]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_distinct_values_skip_missing_and_sort() {
        let table = Table::new(
            vec!["KOTA".into()],
            vec![
                vec![s("Medan")],
                vec![CellValue::Null],
                vec![s("Bandung")],
                vec![s("Medan")],
            ],
        );
        let values: Vec<_> = table.distinct_values("KOTA").into_iter().collect();
        assert_eq!(values, vec![s("Bandung"), s("Medan")]);
        assert!(table.distinct_values("NOPE").is_empty());
    }

    #[test]
    fn test_duplicate_columns_resolve_to_first() {
        let table = Table::new(
            vec!["KOTA".into(), "KOTA".into()],
            vec![vec![s("first"), s("second")]],
        );
        assert_eq!(table.value(0, "KOTA"), Some(&s("first")));
    }

    #[test]
    fn test_capabilities_detected_after_normalization() {
        let raw = Table::new(
            vec![" kota ".into(), "Penghasilan".into(), "nama".into()],
            vec![],
        );
        let ds = Dataset::new(raw);
        assert!(ds.has(Column::City));
        assert!(ds.has(Column::Income));
        assert!(!ds.has(Column::Year));
        assert_eq!(
            ds.capabilities().missing(&[Column::City, Column::Level]),
            vec![Column::Level]
        );
    }

    #[test]
    fn test_ordering_is_total_across_variants() {
        let mut set = BTreeSet::new();
        set.insert(s("b"));
        set.insert(CellValue::Integer(3));
        set.insert(CellValue::Float(1.5));
        set.insert(CellValue::Null);
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                CellValue::Null,
                CellValue::Integer(3),
                CellValue::Float(1.5),
                s("b")
            ]
        );
    }
}
