//! Error types for framescribe-client
//!
//! Failure classes and how far they propagate:
//! - [`DecodeError`]: event stream absent or unreadable. Fatal to the run.
//! - [`FrameParseError`]: one malformed stream line. Dropped, never surfaced.
//! - [`EnrichmentError`]: one enrichment call failed. Becomes a `None`
//!   result for that item only.
//! - [`PipelineError`]: anything that ends a run before or during the
//!   primary stream (upload rejected, network down, decode failure).
//!
//! Upstream `error` events are data, not errors: they reach the reducer as
//! ordinary stream events. Cancellation is not an error either.

use thiserror::Error;

/// Event stream could not be read
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Response carried no readable body
    #[error("Response has no readable body")]
    MissingBody,

    /// Reading a chunk of the body failed mid-stream
    #[error("Stream read failed: {0}")]
    Read(String),
}

/// One stream line whose payload is not a valid event
#[derive(Debug, Error)]
#[error("Malformed frame payload: {source}")]
pub struct FrameParseError {
    #[from]
    source: serde_json::Error,
}

/// Enrichment call failure for a single frame
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Enrichment endpoint returned {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Run-level failure
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Backend rejected the upload (message is the backend's error text)
    #[error("{0}")]
    Upload(String),

    /// Backend unreachable
    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
