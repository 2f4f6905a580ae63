//! Pipeline orchestration

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineConfig, PipelineRun, DEFAULT_CONCURRENCY};
