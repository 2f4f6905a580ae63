//! External collaborators of the pipeline

pub mod enrichment_client;
pub mod video_backend;

pub use enrichment_client::{FrameEnricher, HttpFrameEnricher};
pub use video_backend::{HealthStatus, HttpVideoBackend, VideoBackend};
