//! Ordered rule registry.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::profile::Profile;

use super::report::QualityReport;
use super::rules::{
    DataTypeRule, NullThresholdRule, QualityRule, UniqueConstraintRule, DEFAULT_NULL_THRESHOLD,
    DEFAULT_UNIQUE_COLUMNS,
};

/// Configuration for the built-in rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityConfig {
    /// Maximum allowed null percentage per column.
    pub null_threshold: f64,
    /// Columns that must not contain duplicates.
    pub unique_columns: Vec<String>,
    /// Substring that marks a column as a date column.
    pub date_column_marker: String,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            null_threshold: DEFAULT_NULL_THRESHOLD,
            unique_columns: DEFAULT_UNIQUE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            date_column_marker: "date".to_string(),
        }
    }
}

/// Evaluates every registered rule, in registration order, against a profile.
///
/// Rules run sequentially and all of them run; the report order is the
/// registry order so that reports for the same profile are reproducible.
pub struct QualityEngine {
    rules: Vec<Box<dyn QualityRule>>,
}

impl QualityEngine {
    /// Create an engine with the built-in rules at their defaults.
    pub fn new() -> Self {
        Self::with_config(&QualityConfig::default())
    }

    /// Create an engine with the built-in rules configured.
    pub fn with_config(config: &QualityConfig) -> Self {
        Self {
            rules: vec![
                Box::new(NullThresholdRule::new(config.null_threshold)),
                Box::new(UniqueConstraintRule::new(config.unique_columns.iter().cloned())),
                Box::new(DataTypeRule::new(config.date_column_marker.clone())),
            ],
        }
    }

    /// Create an engine with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones.
    pub fn register(&mut self, rule: impl QualityRule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_rule(mut self, rule: impl QualityRule + 'static) -> Self {
        self.register(rule);
        self
    }

    /// Names of the registered rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules and collect their results.
    pub fn check(&self, profile: &Profile) -> QualityReport {
        info!("Starting quality checks");

        let mut results = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let result = rule.evaluate(profile);
            debug!(
                rule = %result.name,
                passed = result.passed,
                failures = result.failures.len(),
                "rule evaluated"
            );
            results.push(result);
        }

        let report = QualityReport::new(results, Utc::now());
        if report.passed {
            info!("Quality checks completed");
        } else {
            let summary = report.summary();
            warn!(
                rules_failed = summary.rules_failed,
                failures = summary.failures,
                "Quality checks completed with failures"
            );
        }
        report
    }
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new()
    }
}
