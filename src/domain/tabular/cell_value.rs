// ============================================================
// CELL VALUE
// ============================================================
// A single loosely typed table cell

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell as read from CSV or a spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String handed to the classifier; missing cells become `""`
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }

    #[cfg(test)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Int(i) => write!(f, "{}", i),
            // Keep integral floats recognisable as floats after a CSV round trip
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{:.1}", v)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_empty_text() {
        assert_eq!(CellValue::Null.as_text(), "");
        assert!(CellValue::Null.is_null());
    }

    #[test]
    fn test_float_display() {
        assert_eq!(CellValue::Float(1.0).to_string(), "1.0");
        assert_eq!(CellValue::Float(0.9876).to_string(), "0.9876");
        assert_eq!(CellValue::Float(0.0).to_string(), "0.0");
        assert_eq!(CellValue::Int(42).as_text(), "42");
    }

    #[test]
    fn test_serializes_as_bare_values() {
        let cells = vec![
            CellValue::Null,
            CellValue::Text("hi".to_string()),
            CellValue::Int(3),
            CellValue::Bool(true),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,"hi",3,true]"#);
    }
}
