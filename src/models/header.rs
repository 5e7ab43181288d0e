//! Ordered export column definitions.

use crate::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single export column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field key looked up in each row.
    pub key: String,
    /// Display label written to the header line.
    pub label: String,
}

/// Ordered mapping from field key to display label.
///
/// Insertion order defines column order in every rendered document. Keys are
/// unique; labels may repeat.
///
/// Deserializing from a JSON, YAML or TOML object keeps the order in which
/// the keys appear in the source document.
///
/// # Example
///
/// ```rust
/// use rowexport::HeaderMap;
///
/// let headers = HeaderMap::new()
///     .with("glCode", "GL Code")?
///     .with("debit", "Debit")?;
/// assert_eq!(headers.labels().collect::<Vec<_>>(), ["GL Code", "Debit"]);
/// # Ok::<(), rowexport::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<Column>,
}

impl HeaderMap {
    /// Creates an empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(Error::InvalidInput(format!("duplicate header key: {key}")));
        }
        self.columns.push(Column {
            key,
            label: label.into(),
        });
        Ok(())
    }

    /// Builder form of [`HeaderMap::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `key` is already present.
    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Result<Self> {
        self.insert(key, label)?;
        Ok(self)
    }

    /// Builds a header map from `(key, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on the first duplicate key.
    pub fn from_pairs<I, K, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        let mut map = Self::new();
        for (key, label) in pairs {
            map.insert(key, label)?;
        }
        Ok(map)
    }

    /// Columns of the accounting period quick action export.
    #[must_use]
    pub fn accounting_period() -> Self {
        Self::from_static(&[
            ("rowDate", "Effective Datetime"),
            ("glCode", "GL Code"),
            ("debit", "Debit"),
            ("credit", "Credit"),
            ("exportInformation", "Export Information"),
        ])
    }

    /// Columns of the journal summary spreadsheet export.
    #[must_use]
    pub fn journal_summary() -> Self {
        Self::from_static(&[("glCode", "GL Code"), ("debit", "Debit"), ("credit", "Credit")])
    }

    /// Presets have unique keys by construction.
    fn from_static(pairs: &[(&str, &str)]) -> Self {
        Self {
            columns: pairs
                .iter()
                .map(|(key, label)| Column {
                    key: (*key).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        }
    }

    /// Looks up a preset by name.
    ///
    /// Accepts `accounting-period` and `journal-summary` (underscores and
    /// case are ignored).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "accounting-period" | "period" => Some(Self::accounting_period()),
            "journal-summary" | "journal" => Some(Self::journal_summary()),
            _ => None,
        }
    }

    /// Returns whether `key` is one of the columns.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    /// Field keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    /// Display labels in column order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether there are no columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.key, &column.label)?;
        }
        map.end()
    }
}

struct HeaderMapVisitor;

impl<'de> Visitor<'de> for HeaderMapVisitor {
    type Value = HeaderMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field keys to display labels")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<HeaderMap, A::Error> {
        let mut headers = HeaderMap::new();
        while let Some((key, label)) = access.next_entry::<String, String>()? {
            headers.insert(key, label).map_err(serde::de::Error::custom)?;
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(HeaderMapVisitor)
    }
}
