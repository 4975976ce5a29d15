//! DataEngine types for query results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tsify::Tsify;

/// A JSON-safe scalar cell value
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Lifecycle of the engine service
#[derive(Tsify, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

/// One result row: column name to scalar value
pub type NormalizedRow = BTreeMap<String, Scalar>;

/// Rows returned by a query, ready for the presentation layer
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct QueryRows {
    /// Normalized rows in result order
    pub rows: Vec<NormalizedRow>,
}

impl From<Vec<NormalizedRow>> for QueryRows {
    fn from(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_serialize_as_plain_json() {
        let mut row = NormalizedRow::new();
        row.insert("region".into(), Scalar::from("Tokyo"));
        row.insert("total".into(), Scalar::Float(12953.0));
        row.insert("count".into(), Scalar::Int(20));
        row.insert("note".into(), Scalar::Null);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"count": 20, "note": null, "region": "Tokyo", "total": 12953.0})
        );
    }

    #[test]
    fn scalars_deserialize_untagged() {
        let row: NormalizedRow =
            serde_json::from_str(r#"{"a": 1, "b": 1.5, "c": "x", "d": true, "e": null}"#).unwrap();
        assert_eq!(row["a"], Scalar::Int(1));
        assert_eq!(row["b"], Scalar::Float(1.5));
        assert_eq!(row["c"], Scalar::from("x"));
        assert_eq!(row["d"], Scalar::Bool(true));
        assert!(row["e"].is_null());
    }

    #[test]
    fn default_scalar_is_null() {
        assert_eq!(Scalar::default(), Scalar::Null);
        assert_eq!(Scalar::default().to_string(), "");
    }

}
