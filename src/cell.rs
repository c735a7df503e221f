//! Tagged cell values.
//!
//! Every cell is stored as text. Numeric interpretation only happens through
//! [`CellValue::parse`], so a failed parse is an ordinary value rather than an
//! error.

use std::cmp::Ordering;

/// A cell interpreted for comparison purposes
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text that parsed as an integer or decimal number
    Number(f64),
    /// Anything else, including empty text and `NaN`
    Text(String),
}

impl CellValue {
    /// Parses a raw cell. Surrounding whitespace is ignored for the numeric
    /// attempt but kept in the `Text` fallback.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if !value.is_nan() => CellValue::Number(value),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Numeric value, if the cell parsed as one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

/// Ascending order on optional numbers where `None` sorts after every number.
pub fn compare_numeric_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
