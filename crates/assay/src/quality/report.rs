//! Rule results and the aggregate quality report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One failing column within a rule result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Affected column name.
    pub column: String,
    /// Human-readable description.
    pub message: String,
}

impl RuleFailure {
    pub fn new(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Verdict of a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Rule name.
    pub name: String,
    /// True when there are no failures.
    pub passed: bool,
    /// Failures in evaluation order.
    pub failures: Vec<RuleFailure>,
}

impl RuleResult {
    /// Build a result; it passes exactly when `failures` is empty.
    pub fn from_failures(name: impl Into<String>, failures: Vec<RuleFailure>) -> Self {
        Self {
            name: name.into(),
            passed: failures.is_empty(),
            failures,
        }
    }
}

/// Aggregate of every rule's verdict for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Logical AND of all rule results.
    pub passed: bool,
    /// Results in registry order.
    pub results: Vec<RuleResult>,
    /// When the rules were evaluated.
    pub timestamp: DateTime<Utc>,
}

/// Counts for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub rules: usize,
    pub rules_failed: usize,
    pub failures: usize,
}

impl QualityReport {
    /// Assemble a report, deriving `passed` from the results.
    pub fn new(results: Vec<RuleResult>, timestamp: DateTime<Utc>) -> Self {
        Self {
            passed: results.iter().all(|r| r.passed),
            results,
            timestamp,
        }
    }

    /// Find a rule result by name.
    pub fn result(&self, name: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Every failure paired with the name of the rule that produced it.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RuleFailure)> {
        self.results
            .iter()
            .flat_map(|r| r.failures.iter().map(move |f| (r.name.as_str(), f)))
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            rules: self.results.len(),
            rules_failed: self.results.iter().filter(|r| !r.passed).count(),
            failures: self.results.iter().map(|r| r.failures.len()).sum(),
        }
    }
}
