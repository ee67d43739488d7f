//! Property-based tests for inference, profiling and the rule engine.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p assay --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p assay --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use assay::{infer_type, QualityEngine, Record, Result, StreamProfiler, TypeTag};

// =============================================================================
// Test Strategies
// =============================================================================

/// Short cell values, blank ones included.
fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        "[0-9]{1,4}",
        "[a-z]{1,3}",
        Just("true".to_string()),
        Just("2024-01-15".to_string()),
    ]
}

/// A table of 1..20 rows and 1..5 columns.
fn table() -> impl Strategy<Value = (usize, Vec<Vec<String>>)> {
    (1usize..5).prop_flat_map(|cols| {
        (
            Just(cols),
            prop::collection::vec(prop::collection::vec(cell(), cols), 1..20),
        )
    })
}

fn records(cols: usize, rows: &[Vec<String>]) -> Vec<Result<Record>> {
    rows.iter()
        .map(|row| {
            Ok(Record::from_pairs(
                (0..cols).map(|c| (format!("c{c}"), row[c].clone())),
            ))
        })
        .collect()
}

// =============================================================================
// Type inference
// =============================================================================

proptest! {
    #[test]
    fn inference_never_panics_and_is_deterministic(value in any::<String>()) {
        let first = infer_type(&value);
        prop_assert_eq!(first, infer_type(&value));
    }

    #[test]
    fn finite_floats_are_numbers(n in prop::num::f64::NORMAL) {
        prop_assert_eq!(infer_type(&n.to_string()), TypeTag::Number);
    }

    #[test]
    fn blank_values_are_strings(spaces in "[ \t]{0,8}") {
        prop_assert_eq!(infer_type(&spaces), TypeTag::String);
    }
}

// =============================================================================
// Profile invariants
// =============================================================================

proptest! {
    #[test]
    fn profile_invariants_hold((cols, rows) in table()) {
        let profile = StreamProfiler::new().profile(records(cols, &rows)).unwrap();

        prop_assert_eq!(profile.row_count, rows.len());
        let expected_names: Vec<String> = (0..cols).map(|c| format!("c{c}")).collect();
        prop_assert_eq!(profile.column_names(), expected_names.iter().map(|s| s.as_str()).collect::<Vec<_>>());

        for (c, name) in expected_names.iter().enumerate() {
            let column = profile.column(name).unwrap();
            let values: Vec<&str> = rows.iter().map(|r| r[c].as_str()).collect();

            let nulls = values.iter().filter(|v| v.trim().is_empty()).count();
            let distinct: HashSet<&str> = values.iter().copied().collect();

            prop_assert_eq!(column.null_count, nulls);
            prop_assert_eq!(column.unique_count, distinct.len());
            prop_assert!(column.unique_count >= 1 && column.unique_count <= profile.row_count);
            prop_assert!((0.0..=100.0).contains(&column.null_percentage));
            prop_assert_eq!(column.column_type, infer_type(values[0]));
        }
    }

    #[test]
    fn report_passes_only_when_every_rule_passes((cols, rows) in table()) {
        let profile = StreamProfiler::new().profile(records(cols, &rows)).unwrap();
        let report = QualityEngine::new().check(&profile);

        prop_assert_eq!(report.results.len(), 3);
        prop_assert_eq!(report.passed, report.results.iter().all(|r| r.passed));
        for result in &report.results {
            prop_assert_eq!(result.passed, result.failures.is_empty());
        }
    }
}
