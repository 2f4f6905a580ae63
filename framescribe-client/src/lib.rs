//! framescribe-client library interface
//!
//! Exposes the pipeline building blocks for the CLI and for integration
//! testing:
//! - `decoder`: incremental decoder for the backend's event stream
//! - `pool`: bounded-concurrency task pool
//! - `reducer`: pure snapshot reducer
//! - `workflow`: orchestrator tying the three together
//! - `services`: HTTP collaborators (video backend, enrichment endpoint)

pub mod config;
pub mod decoder;
pub mod error;
pub mod models;
pub mod pool;
pub mod reducer;
pub mod services;
pub mod workflow;

pub use crate::error::PipelineError;
pub use crate::models::{Annotation, PipelineEvent, Snapshot, Status};
pub use crate::workflow::{Pipeline, PipelineConfig, PipelineRun};
