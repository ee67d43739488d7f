//! Suggester trait, configuration and reply parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AssayError, Result};
use crate::profile::Profile;

/// Configuration shared by the HTTP-backed suggesters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-4").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

/// Asks an external service for transformation directives for a profile.
///
/// Implementations must be thread-safe (Send + Sync). The returned value is
/// whatever JSON the service produced; its content is not interpreted.
pub trait TransformationSuggester: Send + Sync {
    /// Request directives for `profile`.
    fn suggest(&self, profile: &Profile) -> Result<Value>;

    /// Name of this suggester (for logging/debugging).
    fn name(&self) -> &str;
}

/// Parse a service reply as JSON, unwrapping a markdown code fence if present.
///
/// A reply that is not JSON yields `TransformationFormat` carrying the raw text.
pub fn parse_directives(reply: &str) -> Result<Value> {
    let body = if reply.contains("```json") {
        reply
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(reply)
    } else if reply.contains("```") {
        reply.split("```").nth(1).unwrap_or(reply)
    } else {
        reply
    };

    serde_json::from_str(body.trim()).map_err(|e| AssayError::TransformationFormat {
        message: e.to_string(),
        raw: reply.to_string(),
    })
}
