//! Transformation suggestions from external generative-text services.
//!
//! The pipeline works without a suggester; when one is configured it is asked
//! for transformation directives after the profile and report are stored.
//!
//! # Supported Services
//!
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//! - **Mock** - Deterministic, offline

mod mock;
mod ollama;
mod openai;
mod prompts;
mod suggester;

pub use mock::MockSuggester;
pub use ollama::OllamaSuggester;
pub use openai::OpenAiSuggester;
pub use prompts::{system_prompt, transformation_prompt};
pub use suggester::{parse_directives, LlmConfig, TransformationSuggester};
