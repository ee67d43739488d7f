//! Type inference for raw string values.

mod engine;
mod types;

pub use engine::{infer_type, TypeInference};
pub use types::TypeTag;
