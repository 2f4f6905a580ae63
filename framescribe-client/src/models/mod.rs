//! Data models for framescribe-client

pub mod pipeline_event;
pub mod snapshot;

pub use pipeline_event::PipelineEvent;
pub use snapshot::{annotation_id, Annotation, Snapshot, Status};
