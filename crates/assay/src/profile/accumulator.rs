//! Per-column running state during a profiling run.

use crate::inference::{TypeInference, TypeTag};
use crate::input::Record;

use super::distinct::DistinctTracker;
use super::model::ColumnProfile;

/// Running state for one column.
///
/// Type and length bounds are taken from the first value seen and are not
/// revised afterwards.
#[derive(Debug, Clone)]
pub struct ColumnAccumulator {
    inferred_type: TypeTag,
    min_length: usize,
    max_length: usize,
    null_count: usize,
    distinct: DistinctTracker,
}

impl ColumnAccumulator {
    /// Create the accumulator from the first value observed for a column.
    ///
    /// The first value is not counted; pass it to [`observe`](Self::observe) too.
    pub(crate) fn from_first_value(
        value: &str,
        inference: &TypeInference,
        distinct_limit: Option<usize>,
    ) -> Self {
        let length = value.chars().count();
        Self {
            inferred_type: inference.infer(value),
            min_length: length,
            max_length: length,
            null_count: 0,
            distinct: DistinctTracker::new(distinct_limit),
        }
    }

    /// Fold one value into the running state.
    pub(crate) fn observe(&mut self, value: &str) {
        if Record::is_null_value(value) {
            self.null_count += 1;
        }
        self.distinct.insert(value);
    }

    pub fn inferred_type(&self) -> TypeTag {
        self.inferred_type
    }

    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Length bounds fixed at the first value, as `(min, max)`.
    pub fn length_bounds(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }

    /// Whether the distinct count is exact (no sketch fallback).
    pub fn distinct_is_exact(&self) -> bool {
        self.distinct.is_exact()
    }

    /// Freeze into the summary for a run of `row_count` rows.
    pub(crate) fn finalize(&self, row_count: usize) -> ColumnProfile {
        let unique_count = self.distinct.count().clamp(1, row_count.max(1));
        ColumnProfile {
            column_type: self.inferred_type,
            null_count: self.null_count,
            unique_count,
            null_percentage: (self.null_count as f64 / row_count as f64) * 100.0,
        }
    }
}
