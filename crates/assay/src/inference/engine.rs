//! Single-value type classification.
//!
//! Candidates are tried in a fixed priority order and the first validator
//! that accepts the value wins. The order is part of the contract: a
//! numeric-looking date such as `20240115` is a number because number is
//! tried before date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::TypeTag;

/// Validator for one candidate type.
type Validator = fn(&str) -> bool;

/// Candidate types in priority order. `String` accepts anything and must stay last.
const CANDIDATES: &[(TypeTag, Validator)] = &[
    (TypeTag::Number, is_number),
    (TypeTag::Date, is_date),
    (TypeTag::Boolean, is_boolean),
    (TypeTag::String, is_string),
];

// Shapes are checked before chrono so that `%Y` cannot match a short year.
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static SLASH_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}/\d{2}/\d{2}$").unwrap());
static US_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());
static NAIVE_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?$").unwrap()
});
static RFC3339: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[Tt ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})$").unwrap()
});

/// Classifies raw string values into a [`TypeTag`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeInference;

impl TypeInference {
    pub fn new() -> Self {
        Self
    }

    /// Classify a value. Never fails; unparseable and empty values are strings.
    pub fn infer(&self, value: &str) -> TypeTag {
        CANDIDATES
            .iter()
            .find(|(_, accepts)| accepts(value))
            .map(|(tag, _)| *tag)
            .unwrap_or(TypeTag::String)
    }

    /// The candidate types in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = TypeTag> {
        CANDIDATES.iter().map(|(tag, _)| *tag)
    }
}

/// Classify a value with the default engine.
pub fn infer_type(value: &str) -> TypeTag {
    TypeInference.infer(value)
}

fn is_number(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_date(value: &str) -> bool {
    let trimmed = value.trim();
    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
    }
    if SLASH_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y/%m/%d").is_ok();
    }
    if US_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").is_ok();
    }
    if NAIVE_DATETIME.is_match(trimmed) {
        return NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f").is_ok();
    }
    if RFC3339.is_match(trimmed) {
        return DateTime::parse_from_rfc3339(trimmed).is_ok();
    }
    false
}

fn is_boolean(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false")
}

fn is_string(_value: &str) -> bool {
    true
}
