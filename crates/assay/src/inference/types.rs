//! Semantic type tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred semantic type of a raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Finite numeric value.
    Number,
    /// Calendar date or date-time.
    Date,
    /// `true` / `false`.
    Boolean,
    /// Anything else.
    #[default]
    String,
}

impl TypeTag {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Number => "number",
            TypeTag::Date => "date",
            TypeTag::Boolean => "boolean",
            TypeTag::String => "string",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
