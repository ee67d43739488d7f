//! Records and source metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata about the source the record stream was read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Source identifier (file path or object key).
    pub source: String,
    /// SHA-256 hash of the bytes consumed.
    pub hash: String,
    /// Number of bytes consumed.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows read (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was read.
    pub read_at: DateTime<Utc>,
}

/// One row of the input: column names paired with raw string values.
///
/// Headers are shared between all records of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Headers must be unique and `values` must have one entry per header.
    pub(crate) fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(headers.len(), values.len());
        Self { headers, values }
    }

    /// Build a standalone record from `(column, value)` pairs.
    ///
    /// A repeated column keeps its first position and its last value.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields: IndexMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let (headers, values): (Vec<String>, Vec<String>) = fields.into_iter().unzip();
        Self {
            headers: headers.into(),
            values,
        }
    }

    /// Get the value for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.values.get(index).map(|s| s.as_str())
    }

    /// Iterate `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|s| s.as_str())
            .zip(self.values.iter().map(|s| s.as_str()))
    }

    /// Column names of this record.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if a value counts as null: empty or whitespace-only.
    pub fn is_null_value(value: &str) -> bool {
        value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookup_by_column() {
        let record = Record::from_pairs([("a", "1"), ("b", ""), ("c", "3")]);

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some(""));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_from_pairs_repeated_column_keeps_last_value() {
        let record = Record::from_pairs([("id", "1"), ("note", ""), ("note", "x")]);

        assert_eq!(record.headers(), &["id", "note"]);
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(pairs, vec![("id", "1"), ("note", "x")]);
    }

    #[test]
    fn test_is_null_value() {
        assert!(Record::is_null_value(""));
        assert!(Record::is_null_value("   "));
        assert!(Record::is_null_value("\t"));
        assert!(!Record::is_null_value("NA"));
        assert!(!Record::is_null_value("0"));
    }
}
