//! Stream profiling: per-column accumulators folded into a [`Profile`].

mod accumulator;
mod distinct;
mod model;
mod profiler;

pub use accumulator::ColumnAccumulator;
pub use model::{ColumnProfile, Profile};
pub use profiler::{ProfilerConfig, StreamProfiler};
