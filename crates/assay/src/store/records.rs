//! Persisted record types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::quality::QualityReport;

/// Identity of a stored profile, returned by `save_profile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Write request for the transformations table.
///
/// The profile id must be the one returned when the profile was saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationMetadata {
    pub profile_id: ProfileId,
    pub quality_report: QualityReport,
    pub output_location: String,
}

impl TransformationMetadata {
    pub fn new(
        profile_id: ProfileId,
        quality_report: QualityReport,
        output_location: impl Into<String>,
    ) -> Self {
        Self {
            profile_id,
            quality_report,
            output_location: output_location.into(),
        }
    }
}

/// A row of the profiles table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfileRecord {
    pub id: ProfileId,
    pub timestamp: DateTime<Utc>,
    pub profile: Profile,
}

/// A row of the transformations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransformationRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub profile_id: ProfileId,
    pub quality_report: QualityReport,
    pub output_location: String,
}
