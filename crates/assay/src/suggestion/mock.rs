//! Deterministic suggester for tests and offline runs.

use serde_json::{json, Value};

use crate::error::Result;
use crate::inference::TypeTag;
use crate::profile::Profile;

use super::suggester::{parse_directives, TransformationSuggester};

/// Suggester that never leaves the process.
///
/// By default it derives simple directives from the profile. With
/// [`MockSuggester::with_reply`] it parses a fixed reply instead, which lets
/// tests exercise malformed service output.
#[derive(Debug, Clone, Default)]
pub struct MockSuggester {
    reply: Option<String>,
}

impl MockSuggester {
    pub fn new() -> Self {
        Self { reply: None }
    }

    /// Answer every request with `reply`, parsed as a service reply would be.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl TransformationSuggester for MockSuggester {
    fn suggest(&self, profile: &Profile) -> Result<Value> {
        if let Some(reply) = &self.reply {
            return parse_directives(reply);
        }

        let mut transformations = Vec::new();
        for (name, column) in &profile.columns {
            if column.column_type == TypeTag::Date {
                transformations.push(json!({
                    "column": name,
                    "action": "standardize",
                    "format": "YYYY-MM-DD"
                }));
            }
            if column.null_count > 0 {
                transformations.push(json!({
                    "column": name,
                    "action": "fill_nulls"
                }));
            }
        }

        Ok(json!({ "transformations": transformations }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssayError;
    use crate::profile::ColumnProfile;
    use indexmap::IndexMap;

    fn profile() -> Profile {
        let mut columns = IndexMap::new();
        columns.insert(
            "joined".to_string(),
            ColumnProfile {
                column_type: TypeTag::Date,
                null_count: 1,
                unique_count: 2,
                null_percentage: 50.0,
            },
        );
        columns.insert(
            "name".to_string(),
            ColumnProfile {
                column_type: TypeTag::String,
                null_count: 0,
                unique_count: 2,
                null_percentage: 0.0,
            },
        );
        Profile {
            row_count: 2,
            columns,
        }
    }

    #[test]
    fn test_derived_directives() {
        let value = MockSuggester::new().suggest(&profile()).unwrap();
        let list = value["transformations"].as_array().unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["action"], "standardize");
        assert_eq!(list[1]["action"], "fill_nulls");
        assert!(list.iter().all(|t| t["column"] == "joined"));
    }

    #[test]
    fn test_fixed_reply() {
        let value = MockSuggester::with_reply("```json\n{\"a\": 1}\n```")
            .suggest(&profile())
            .unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fixed_non_json_reply() {
        let result = MockSuggester::with_reply("not json").suggest(&profile());
        assert!(matches!(
            result,
            Err(AssayError::TransformationFormat { .. })
        ));
    }
}
