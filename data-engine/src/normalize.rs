//! Result normalization: any engine result shape to uniform, JSON-safe rows
//!
//! Normalization never fails. Malformed cells degrade to `Null` (or `0` for
//! aggregate columns) and unrecognized shapes degrade to an empty result, so
//! chart rendering always receives something it can draw.

use crate::raw::{ColumnarAccessor, RawResult, RawRow, RawValue};
use dashboard_types::{NormalizedRow, Scalar};
use log::warn;
use time::OffsetDateTime;

/// Converts raw engine results into [`NormalizedRow`]s
#[derive(Clone, Debug)]
pub struct Normalizer {
    aggregate_columns: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(["total", "amount", "count"])
    }
}

impl Normalizer {
    /// Normalizer treating `aggregate_columns` as always-numeric
    pub fn new<I, S>(aggregate_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aggregate_columns: aggregate_columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn normalize(&self, raw: RawResult) -> Vec<NormalizedRow> {
        match raw {
            RawResult::Rows(rows) => rows.into_iter().map(|row| self.normalize_row(row)).collect(),
            RawResult::Columnar(table) => self.normalize_columnar(table.as_ref()),
            RawResult::Unknown(desc) => {
                warn!("unrecognized query result shape ({}), returning no rows", desc);
                Vec::new()
            }
        }
    }

    fn normalize_row(&self, row: RawRow) -> NormalizedRow {
        row.into_iter()
            .map(|(column, value)| {
                let scalar = self.coerce(&column, value);
                (column, scalar)
            })
            .collect()
    }

    fn normalize_columnar(&self, table: &dyn ColumnarAccessor) -> Vec<NormalizedRow> {
        let names = table.column_names();
        let row_count = table.num_rows();

        let columns: Vec<Vec<RawValue>> = (0..names.len())
            .map(|index| {
                table.child(index).unwrap_or_else(|| {
                    warn!("column {} ({}) could not be read", index, names[index]);
                    Vec::new()
                })
            })
            .collect();

        (0..row_count)
            .map(|row| {
                names
                    .iter()
                    .zip(&columns)
                    .map(|(name, column)| {
                        let value = column.get(row).cloned().unwrap_or(RawValue::Null);
                        (name.clone(), self.coerce(name, value))
                    })
                    .collect()
            })
            .collect()
    }

    fn is_aggregate(&self, column: &str) -> bool {
        self.aggregate_columns
            .iter()
            .any(|c| c.eq_ignore_ascii_case(column))
    }

    /// Coerce one cell of `column` to a chart-safe scalar
    pub fn coerce(&self, column: &str, value: RawValue) -> Scalar {
        let scalar = match value {
            RawValue::Null => Scalar::Null,
            RawValue::Bool(b) => Scalar::Bool(b),
            RawValue::Int(i) => Scalar::Int(i),
            RawValue::Float(f) => Scalar::Float(f),
            RawValue::Text(s) => Scalar::Text(s),
            // Typed arrays carry the scalar in their first slot
            RawValue::IntArray(v) => v.first().map_or(Scalar::Null, |i| Scalar::Int(*i)),
            RawValue::FloatArray(v) => v.first().map_or(Scalar::Null, |f| Scalar::Float(*f)),
        };

        if is_date_column(column) {
            if let Some(ms) = scalar.as_f64() {
                if let Some(date) = epoch_millis_to_date(ms) {
                    return Scalar::Text(date);
                }
            }
        }

        if self.is_aggregate(column) {
            return match scalar {
                Scalar::Text(s) => Scalar::Float(parse_number(&s)),
                Scalar::Float(f) if !f.is_finite() => Scalar::Float(0.0),
                other => other,
            };
        }

        match scalar {
            Scalar::Float(f) if !f.is_finite() => Scalar::Null,
            other => other,
        }
    }
}

fn is_date_column(column: &str) -> bool {
    let column = column.to_ascii_lowercase();
    column == "date" || column.ends_with("_date")
}

/// Parse an aggregate delivered as text; anything unparsable is `0`
fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Epoch milliseconds to `YYYY-MM-DD` (UTC)
pub fn epoch_millis_to_date(ms: f64) -> Option<String> {
    if !ms.is_finite() {
        return None;
    }
    let nanos = (ms.floor() as i128).checked_mul(1_000_000)?;
    let date = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?.date();
    Some(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    ))
}
