//! CLI library components for the coverage pipeline.

pub mod logging;
pub mod pipeline;
