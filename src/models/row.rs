//! Row records and typed cell values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One exportable record keyed by field name.
///
/// Rows are schemaless: they may omit header keys or carry extra keys.
/// Values are read per key through [`Row::cell`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets a field value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Resolves the cell for `key`.
    #[must_use]
    pub fn cell(&self, key: &str) -> CellValue<'_> {
        self.0.get(key).map_or(CellValue::Missing, CellValue::from)
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Typed view of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    /// The row has no value for the key.
    Missing,
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(&'a Number),
    /// String value.
    Text(&'a str),
    /// Array or object; not expected in export rows but tolerated.
    Composite(&'a Value),
}

impl<'a> From<&'a Value> for CellValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(_) | Value::Object(_) => Self::Composite(value),
        }
    }
}

/// Converts cell values to text.
///
/// Each value kind has a fixed textual form. Only the placeholders used for
/// missing and null cells are configurable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellFormatter {
    /// Text emitted when the row lacks the key.
    pub missing: String,
    /// Text emitted for explicit nulls.
    pub null: String,
}

impl CellFormatter {
    /// Creates a formatter that renders missing and null cells as empty text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder for missing cells.
    #[must_use]
    pub fn with_missing(mut self, text: impl Into<String>) -> Self {
        self.missing = text.into();
        self
    }

    /// Sets the placeholder for null cells.
    #[must_use]
    pub fn with_null(mut self, text: impl Into<String>) -> Self {
        self.null = text.into();
        self
    }

    /// Formats one cell.
    #[must_use]
    pub fn format(&self, cell: CellValue<'_>) -> String {
        match cell {
            CellValue::Missing => self.missing.clone(),
            CellValue::Null => self.null.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(n),
            CellValue::Text(s) => s.to_string(),
            CellValue::Composite(v) => v.to_string(),
        }
    }
}

/// Shortest decimal text for a number, without a trailing `.0` or an
/// exponent. `100.00` renders as `100`, `-0.0` as `0`.
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // f64 Display is shortest round-trip and never uses an exponent.
    match n.as_f64().map(|f| f.to_string()) {
        Some(text) if text == "-0" => "0".to_string(),
        Some(text) => text,
        None => n.to_string(),
    }
}
