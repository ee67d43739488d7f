//! Built-in quality rules and the rule trait.

use crate::inference::TypeTag;
use crate::profile::Profile;

use super::report::{RuleFailure, RuleResult};

/// A pure check of a profile.
///
/// Rules must not depend on each other or on evaluation order.
pub trait QualityRule: Send + Sync {
    /// Name reported in the rule's result.
    fn name(&self) -> &str;

    /// Evaluate the rule against a profile.
    fn evaluate(&self, profile: &Profile) -> RuleResult;
}

/// Default null percentage threshold.
pub const DEFAULT_NULL_THRESHOLD: f64 = 20.0;

/// Default columns expected to hold unique values.
pub const DEFAULT_UNIQUE_COLUMNS: &[&str] = &["id", "email"];

/// Fails every column whose null percentage is strictly above the threshold.
#[derive(Debug, Clone)]
pub struct NullThresholdRule {
    threshold: f64,
}

impl NullThresholdRule {
    pub const NAME: &'static str = "Null Threshold Check";

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for NullThresholdRule {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_THRESHOLD)
    }
}

impl QualityRule for NullThresholdRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, profile: &Profile) -> RuleResult {
        let failures = profile
            .columns
            .iter()
            .filter(|(_, stats)| stats.null_percentage > self.threshold)
            .map(|(column, stats)| {
                RuleFailure::new(
                    column,
                    format!(
                        "Null percentage ({}%) exceeds threshold",
                        stats.null_percentage
                    ),
                )
            })
            .collect();

        RuleResult::from_failures(self.name(), failures)
    }
}

/// Fails target columns that contain duplicate values.
///
/// Targets missing from the profile are skipped.
#[derive(Debug, Clone)]
pub struct UniqueConstraintRule {
    columns: Vec<String>,
}

impl UniqueConstraintRule {
    pub const NAME: &'static str = "Unique Constraints Check";

    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Default for UniqueConstraintRule {
    fn default() -> Self {
        Self::new(DEFAULT_UNIQUE_COLUMNS.iter().copied())
    }
}

impl QualityRule for UniqueConstraintRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, profile: &Profile) -> RuleResult {
        let mut failures = Vec::new();

        for column in &self.columns {
            let Some(stats) = profile.column(column) else {
                continue;
            };
            let unique_ratio = stats.unique_count as f64 / profile.row_count as f64;
            if unique_ratio < 1.0 {
                failures.push(RuleFailure::new(
                    column,
                    "Column should contain unique values",
                ));
            }
        }

        RuleResult::from_failures(self.name(), failures)
    }
}

/// Fails columns whose name marks them as dates but whose inferred type is not date.
///
/// The name match is a case-sensitive substring test.
#[derive(Debug, Clone)]
pub struct DataTypeRule {
    marker: String,
}

impl DataTypeRule {
    pub const NAME: &'static str = "Data Type Check";

    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for DataTypeRule {
    fn default() -> Self {
        Self::new("date")
    }
}

impl QualityRule for DataTypeRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, profile: &Profile) -> RuleResult {
        let failures = profile
            .columns
            .iter()
            .filter(|(column, stats)| {
                column.contains(self.marker.as_str()) && stats.column_type != TypeTag::Date
            })
            .map(|(column, stats)| {
                RuleFailure::new(
                    column,
                    format!("Column should be of type date, found {}", stats.column_type),
                )
            })
            .collect();

        RuleResult::from_failures(self.name(), failures)
    }
}

/// A rule backed by a closure returning the failures it finds.
pub struct FnRule<F> {
    name: String,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Profile) -> Vec<RuleFailure> + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> QualityRule for FnRule<F>
where
    F: Fn(&Profile) -> Vec<RuleFailure> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, profile: &Profile) -> RuleResult {
        RuleResult::from_failures(self.name.clone(), (self.check)(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ColumnProfile;
    use indexmap::IndexMap;

    fn column(column_type: TypeTag, null_count: usize, unique_count: usize, rows: usize) -> ColumnProfile {
        ColumnProfile {
            column_type,
            null_count,
            unique_count,
            null_percentage: null_count as f64 / rows as f64 * 100.0,
        }
    }

    fn make_profile(rows: usize, columns: Vec<(&str, ColumnProfile)>) -> Profile {
        Profile {
            row_count: rows,
            columns: columns
                .into_iter()
                .map(|(name, c)| (name.to_string(), c))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn test_null_threshold_exactly_at_threshold_passes() {
        // 1 of 5 rows null = 20%.
        let profile = make_profile(5, vec![("notes", column(TypeTag::String, 1, 5, 5))]);
        let result = NullThresholdRule::default().evaluate(&profile);
        assert!(result.passed);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_null_threshold_above_fails() {
        // 21 of 100 rows null = 21%.
        let profile = make_profile(100, vec![
            ("ok", column(TypeTag::String, 20, 80, 100)),
            ("notes", column(TypeTag::String, 21, 80, 100)),
        ]);
        let result = NullThresholdRule::default().evaluate(&profile);

        assert!(!result.passed);
        assert_eq!(result.name, "Null Threshold Check");
        assert_eq!(
            result.failures,
            vec![RuleFailure::new("notes", "Null percentage (21%) exceeds threshold")]
        );
    }

    #[test]
    fn test_null_threshold_configurable() {
        let profile = make_profile(10, vec![("a", column(TypeTag::String, 1, 10, 10))]);
        assert!(!NullThresholdRule::new(5.0).evaluate(&profile).passed);
        assert!(NullThresholdRule::new(10.0).evaluate(&profile).passed);
    }

    #[test]
    fn test_unique_constraint_duplicates_fail() {
        let profile = make_profile(3, vec![
            ("id", column(TypeTag::Number, 0, 2, 3)),
            ("email", column(TypeTag::String, 0, 3, 3)),
        ]);
        let result = UniqueConstraintRule::default().evaluate(&profile);

        assert!(!result.passed);
        assert_eq!(
            result.failures,
            vec![RuleFailure::new("id", "Column should contain unique values")]
        );
    }

    #[test]
    fn test_unique_constraint_all_distinct_passes() {
        let profile = make_profile(3, vec![("id", column(TypeTag::Number, 0, 3, 3))]);
        assert!(UniqueConstraintRule::default().evaluate(&profile).passed);
    }

    #[test]
    fn test_unique_constraint_absent_column_skipped() {
        let profile = make_profile(3, vec![("name", column(TypeTag::String, 0, 1, 3))]);
        let result = UniqueConstraintRule::default().evaluate(&profile);
        assert!(result.passed);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_unique_constraint_custom_targets() {
        let profile = make_profile(3, vec![("sku", column(TypeTag::String, 0, 1, 3))]);
        let rule = UniqueConstraintRule::new(["sku"]);
        assert_eq!(rule.columns(), &["sku"]);
        assert!(!rule.evaluate(&profile).passed);
    }

    #[test]
    fn test_data_type_rule() {
        let profile = make_profile(3, vec![("signup_date", column(TypeTag::String, 0, 3, 3))]);
        let result = DataTypeRule::default().evaluate(&profile);

        assert!(!result.passed);
        assert_eq!(result.failures[0].column, "signup_date");
        assert_eq!(
            result.failures[0].message,
            "Column should be of type date, found string"
        );
    }

    #[test]
    fn test_data_type_rule_renamed_column_passes() {
        let profile = make_profile(3, vec![("signup_day", column(TypeTag::String, 0, 3, 3))]);
        assert!(DataTypeRule::default().evaluate(&profile).passed);
    }

    #[test]
    fn test_data_type_rule_case_sensitive() {
        let profile = make_profile(3, vec![("SignupDate", column(TypeTag::String, 0, 3, 3))]);
        assert!(DataTypeRule::default().evaluate(&profile).passed);
    }

    #[test]
    fn test_data_type_rule_date_column_passes() {
        let profile = make_profile(3, vec![("updated", column(TypeTag::Date, 0, 3, 3))]);
        let profile_named = make_profile(3, vec![("date", column(TypeTag::Date, 0, 3, 3))]);
        assert!(DataTypeRule::default().evaluate(&profile).passed);
        assert!(DataTypeRule::default().evaluate(&profile_named).passed);
    }

    #[test]
    fn test_fn_rule() {
        let rule = FnRule::new("Row Count Check", |profile: &Profile| {
            if profile.row_count < 10 {
                vec![RuleFailure::new("*", "too few rows")]
            } else {
                Vec::new()
            }
        });
        let profile = make_profile(3, vec![("a", column(TypeTag::String, 0, 1, 3))]);
        let result = rule.evaluate(&profile);

        assert_eq!(result.name, "Row Count Check");
        assert!(!result.passed);
    }
}
