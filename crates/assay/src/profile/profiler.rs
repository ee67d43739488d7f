//! Stream profiler: one pass over a record stream into a [`Profile`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AssayError, Result};
use crate::inference::TypeInference;
use crate::input::Record;

use super::accumulator::ColumnAccumulator;
use super::model::Profile;

/// Profiler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilerConfig {
    /// Distinct values kept exactly per column before switching to an
    /// estimate (None = always exact).
    pub max_exact_distinct: Option<usize>,
}

/// Builds a [`Profile`] from a lazy record stream.
pub struct StreamProfiler {
    config: ProfilerConfig,
    inference: TypeInference,
}

impl StreamProfiler {
    /// Create a profiler with exact distinct counting.
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Create a profiler with custom configuration.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            config,
            inference: TypeInference::new(),
        }
    }

    /// Consume the stream and finalize a profile.
    ///
    /// Any read error aborts the whole run; no partial profile is returned.
    /// A stream without data rows is rejected.
    pub fn profile<I>(&self, records: I) -> Result<Profile>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        info!("Starting data profiling");

        let mut row_count = 0usize;
        let mut columns: IndexMap<String, ColumnAccumulator> = IndexMap::new();

        for record in records {
            let record = record?;
            row_count += 1;

            for (column, value) in record.iter() {
                match columns.get_mut(column) {
                    Some(acc) => acc.observe(value),
                    None => {
                        let mut acc = ColumnAccumulator::from_first_value(
                            value,
                            &self.inference,
                            self.config.max_exact_distinct,
                        );
                        acc.observe(value);
                        columns.insert(column.to_string(), acc);
                    }
                }
            }
        }

        if row_count == 0 {
            return Err(AssayError::EmptyData("No records to profile".to_string()));
        }

        let profile = Profile {
            row_count,
            columns: columns
                .iter()
                .map(|(name, acc)| {
                    let (min_length, max_length) = acc.length_bounds();
                    debug!(
                        column = %name,
                        column_type = %acc.inferred_type(),
                        min_length,
                        max_length,
                        exact_distinct = acc.distinct_is_exact(),
                        "column finalized"
                    );
                    (name.clone(), acc.finalize(row_count))
                })
                .collect(),
        };

        info!(
            rows = profile.row_count,
            columns = profile.column_count(),
            "Data profiling completed"
        );
        Ok(profile)
    }
}

impl Default for StreamProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TypeTag;
    use crate::input::Parser;

    fn profile_csv(data: &str) -> Result<Profile> {
        let stream = Parser::new().stream_bytes(data.as_bytes())?;
        StreamProfiler::new().profile(stream)
    }

    #[test]
    fn test_profile_basic() {
        let profile = profile_csv("id,name,active\n1,Alice,true\n2,,false\n3,Carol,true\n").unwrap();

        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.column_names(), vec!["id", "name", "active"]);

        let id = profile.column("id").unwrap();
        assert_eq!(id.column_type, TypeTag::Number);
        assert_eq!(id.unique_count, 3);
        assert_eq!(id.null_count, 0);

        let name = profile.column("name").unwrap();
        assert_eq!(name.column_type, TypeTag::String);
        assert_eq!(name.null_count, 1);
        assert_eq!(name.unique_count, 3);
        assert!((name.null_percentage - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(profile.column("active").unwrap().column_type, TypeTag::Boolean);
    }

    #[test]
    fn test_type_fixed_by_first_value() {
        let profile = profile_csv("code\n123\nabc\nxyz\n").unwrap();
        assert_eq!(profile.column("code").unwrap().column_type, TypeTag::Number);

        let profile = profile_csv("code\nabc\n123\n456\n").unwrap();
        assert_eq!(profile.column("code").unwrap().column_type, TypeTag::String);
    }

    #[test]
    fn test_empty_first_value_is_string() {
        let profile = profile_csv("amount,x\n,1\n5,2\n").unwrap();
        let amount = profile.column("amount").unwrap();
        assert_eq!(amount.column_type, TypeTag::String);
        assert_eq!(amount.null_count, 1);
        assert_eq!(amount.null_percentage, 50.0);
    }

    #[test]
    fn test_whitespace_counts_as_null_but_is_distinct() {
        let profile = profile_csv("v,k\n ,1\n,2\n  ,3\n").unwrap();
        let v = profile.column("v").unwrap();
        assert_eq!(v.null_count, 3);
        assert_eq!(v.unique_count, 3);
        assert_eq!(v.null_percentage, 100.0);
    }

    #[test]
    fn test_repeated_column_counts_once_per_row() {
        let profile = profile_csv("id,note,note\n1,,\n2,,x\n").unwrap();

        assert_eq!(profile.column_names(), vec!["id", "note"]);
        let note = profile.column("note").unwrap();
        assert_eq!(note.null_count, 1);
        assert_eq!(note.null_percentage, 50.0);
        assert!(note.null_count <= profile.row_count);
    }

    #[test]
    fn test_blank_lines_count_as_null_rows() {
        let profile = profile_csv("note\nx\n\n\ny\n").unwrap();

        assert_eq!(profile.row_count, 4);
        let note = profile.column("note").unwrap();
        assert_eq!(note.null_count, 2);
        assert_eq!(note.null_percentage, 50.0);
    }

    #[test]
    fn test_zero_rows_rejected() {
        let result = profile_csv("a,b\n");
        assert!(matches!(result, Err(AssayError::EmptyData(_))));
    }

    #[test]
    fn test_stream_error_aborts() {
        let records = vec![
            Ok(Record::from_pairs([("a", "1")])),
            Err(AssayError::StreamRead {
                row: 2,
                message: "broken".to_string(),
            }),
            Ok(Record::from_pairs([("a", "3")])),
        ];
        let result = StreamProfiler::new().profile(records);
        assert!(matches!(result, Err(AssayError::StreamRead { row: 2, .. })));
    }

    #[test]
    fn test_bounded_distinct_exact_for_small_inputs() {
        let profiler = StreamProfiler::with_config(ProfilerConfig {
            max_exact_distinct: Some(16),
        });
        let stream = Parser::new()
            .stream_bytes(b"id\n1\n2\n2\n3\n")
            .unwrap();
        let profile = profiler.profile(stream).unwrap();
        assert_eq!(profile.column("id").unwrap().unique_count, 3);
    }
}
