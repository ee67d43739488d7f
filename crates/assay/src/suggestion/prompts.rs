//! Prompt templates for transformation suggestions.

use crate::error::Result;
use crate::profile::Profile;

/// System prompt shared by all chat-style services.
pub fn system_prompt() -> &'static str {
    "You are a data engineering assistant. You review column profiles of \
     tabular datasets and propose transformations. Reply with JSON only."
}

/// Build the user prompt asking for transformations of a profiled dataset.
pub fn transformation_prompt(profile: &Profile) -> Result<String> {
    let profile_json = serde_json::to_string_pretty(profile)?;

    Ok(format!(
        r#"Given the following data profile, suggest transformations:
{profile_json}

Focus on:
1. Data type conversions
2. Standardization
3. Enrichment opportunities
4. Quality improvements

Return the transformations in JSON format."#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TypeTag;
    use crate::profile::ColumnProfile;
    use indexmap::IndexMap;

    #[test]
    fn test_prompt_embeds_profile_and_focus_areas() {
        let mut columns = IndexMap::new();
        columns.insert(
            "signup_date".to_string(),
            ColumnProfile {
                column_type: TypeTag::String,
                null_count: 0,
                unique_count: 3,
                null_percentage: 0.0,
            },
        );
        let profile = Profile {
            row_count: 3,
            columns,
        };

        let prompt = transformation_prompt(&profile).unwrap();
        assert!(prompt.contains("\"signup_date\""));
        assert!(prompt.contains("\"rowCount\": 3"));
        for area in [
            "Data type conversions",
            "Standardization",
            "Enrichment opportunities",
            "Quality improvements",
        ] {
            assert!(prompt.contains(area), "missing focus area {area}");
        }
        assert!(prompt.ends_with("Return the transformations in JSON format."));
    }
}
