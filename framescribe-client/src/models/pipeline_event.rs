//! Inputs of the progress reducer
//!
//! Stream events come straight from the decoder; the remaining variants are
//! produced by the orchestrator around the primary stream and by the
//! enrichment pool.

use framescribe_common::events::{EnrichmentResult, StreamEvent};

/// Everything that can move the snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Upload of the video began
    UploadStarted,
    /// Event decoded from the primary stream
    Stream(StreamEvent),
    /// Enrichment counters (sent once with `enriched = 0` when the phase starts)
    EnrichProgress { enriched: usize, total: usize },
    /// One enrichment call finished; `None` means it failed
    EnrichDone {
        annotation_id: String,
        result: Option<EnrichmentResult>,
    },
    /// Run-level failure (upload rejected, stream unreadable)
    Failed { message: String },
}

impl From<StreamEvent> for PipelineEvent {
    fn from(event: StreamEvent) -> Self {
        PipelineEvent::Stream(event)
    }
}
