//! Result shapes the embedded engine may hand back

use dashboard_types::{NormalizedRow, Scalar};
use std::fmt;

/// Largest integer a JavaScript number holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A cell as delivered by the engine, before coercion
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Fixed-width integer array (e.g. a `Uint32Array` holding a count)
    IntArray(Vec<i64>),
    /// Fixed-width float array
    FloatArray(Vec<f64>),
}

impl RawValue {
    /// A JavaScript number: integral values in the safe range stay integers
    pub fn from_js_number(n: f64) -> Self {
        if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
            RawValue::Int(n as i64)
        } else {
            RawValue::Float(n)
        }
    }

    /// Decimal integer text, such as a 64-bit integer's string form
    pub fn from_integer_text(text: String) -> Self {
        match text.trim().parse::<i64>() {
            Ok(i) => RawValue::Int(i),
            Err(_) => RawValue::Text(text),
        }
    }
}

impl From<&Scalar> for RawValue {
    fn from(value: &Scalar) -> Self {
        match value {
            Scalar::Null => RawValue::Null,
            Scalar::Bool(b) => RawValue::Bool(*b),
            Scalar::Int(i) => RawValue::Int(*i),
            Scalar::Float(f) => RawValue::Float(*f),
            Scalar::Text(s) => RawValue::Text(s.clone()),
        }
    }
}

/// A row mapping in column order
pub type RawRow = Vec<(String, RawValue)>;

/// Columnar result exposing per-index child column extraction
pub trait ColumnarAccessor {
    fn num_rows(&self) -> usize;

    fn column_names(&self) -> Vec<String>;

    /// Values of the column at `index`, or `None` if it cannot be read
    fn child(&self, index: usize) -> Option<Vec<RawValue>>;
}

/// Which result shape an engine value has, judged by its capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeHint {
    RowArray,
    ColumnarAccessor,
    Unknown,
}

impl ShapeHint {
    /// Array-likeness wins over a child accessor
    pub fn detect(is_array: bool, has_child_accessor: bool) -> Self {
        if is_array {
            ShapeHint::RowArray
        } else if has_child_accessor {
            ShapeHint::ColumnarAccessor
        } else {
            ShapeHint::Unknown
        }
    }
}

/// Closed set of result shapes
pub enum RawResult {
    /// Plain sequence of row mappings
    Rows(Vec<RawRow>),
    /// Columnar table with child accessors
    Columnar(Box<dyn ColumnarAccessor>),
    /// Anything else; carries a description for diagnostics
    Unknown(String),
}

impl fmt::Debug for RawResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawResult::Rows(rows) => f.debug_tuple("Rows").field(&rows.len()).finish(),
            RawResult::Columnar(table) => f
                .debug_struct("Columnar")
                .field("columns", &table.column_names())
                .field("rows", &table.num_rows())
                .finish(),
            RawResult::Unknown(desc) => f.debug_tuple("Unknown").field(desc).finish(),
        }
    }
}

impl From<Vec<NormalizedRow>> for RawResult {
    fn from(rows: Vec<NormalizedRow>) -> Self {
        RawResult::Rows(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|(name, value)| (name.clone(), RawValue::from(value)))
                        .collect()
                })
                .collect(),
        )
    }
}

/// In-memory columnar table, used by backends that collect whole columns
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnTable {
    pub names: Vec<String>,
    pub columns: Vec<Vec<RawValue>>,
}

impl ColumnarAccessor for ColumnTable {
    fn num_rows(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn column_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn child(&self, index: usize) -> Option<Vec<RawValue>> {
        self.columns.get(index).cloned()
    }
}
