//! Finalized profile types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::inference::TypeTag;

/// Immutable per-column summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Type inferred from the first value seen.
    #[serde(rename = "type")]
    pub column_type: TypeTag,
    /// Number of empty or whitespace-only values.
    pub null_count: usize,
    /// Number of distinct raw values, nulls included.
    pub unique_count: usize,
    /// `null_count / row_count * 100`.
    pub null_percentage: f64,
}

/// Statistical snapshot of one record stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Number of records consumed.
    pub row_count: usize,
    /// Column summaries in header order.
    pub columns: IndexMap<String, ColumnProfile>,
}

impl Profile {
    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.get(name)
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let mut columns = IndexMap::new();
        columns.insert(
            "id".to_string(),
            ColumnProfile {
                column_type: TypeTag::Number,
                null_count: 0,
                unique_count: 2,
                null_percentage: 0.0,
            },
        );
        let profile = Profile {
            row_count: 2,
            columns,
        };

        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({
                "rowCount": 2,
                "columns": {
                    "id": {
                        "type": "number",
                        "nullCount": 0,
                        "uniqueCount": 2,
                        "nullPercentage": 0.0
                    }
                }
            })
        );
    }

    #[test]
    fn test_column_order_preserved() {
        let json = r#"{"rowCount":1,"columns":{
            "z":{"type":"string","nullCount":0,"uniqueCount":1,"nullPercentage":0.0},
            "a":{"type":"string","nullCount":0,"uniqueCount":1,"nullPercentage":0.0}}}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.column_names(), vec!["z", "a"]);
    }
}
