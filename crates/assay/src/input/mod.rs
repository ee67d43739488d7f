//! Input parsing and record streams.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig, RecordStream};
pub use source::{Record, SourceMetadata};
