//! Quality rule engine: ordered rules evaluated against a [`Profile`](crate::Profile).

mod engine;
mod report;
mod rules;

pub use engine::{QualityConfig, QualityEngine};
pub use report::{QualityReport, ReportSummary, RuleFailure, RuleResult};
pub use rules::{
    DataTypeRule, FnRule, NullThresholdRule, QualityRule, UniqueConstraintRule,
    DEFAULT_NULL_THRESHOLD, DEFAULT_UNIQUE_COLUMNS,
};
