//! Pipeline Orchestrator
//!
//! Drives one analysis run end to end and publishes every intermediate
//! snapshot.
//!
//! # Architecture
//! - **Phase 1**: Upload the video and consume the backend's event stream.
//!   Every decoded event is reduced immediately; detected frames are kept in
//!   arrival order for phase 2.
//! - **Phase 2**: Enrich each detected frame through the task pool, at most
//!   `concurrency` calls in flight, reducing each result as it completes.
//!
//! # Error Handling
//! - Upload or stream failure: `Failed` is reduced, the run ends
//! - Upstream `error` event: reduced as-is, the run ends without enrichment
//! - Per-frame enrichment failure: reported as an empty result, the run goes on
//! - Cancellation: the snapshot is left as it was, nothing is rolled back
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(backend, enricher, PipelineConfig::default());
//! let mut updates = pipeline.subscribe();
//! let run = pipeline.run(Path::new("lecture.mp4"), &CancellationToken::new()).await;
//! ```

use crate::decoder::decode_stream;
use crate::models::{annotation_id, PipelineEvent, Snapshot};
use crate::pool::{PoolSummary, TaskPool};
use crate::reducer::reduce;
use crate::services::{FrameEnricher, VideoBackend};
use framescribe_common::events::{BackendFrame, StreamEvent};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Default number of concurrent enrichment calls
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum enrichment calls in flight
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub run_id: Uuid,
    /// Last published snapshot
    pub snapshot: Snapshot,
    pub cancelled: bool,
    /// Enrichment counters, when the enrichment phase ran
    pub enrichment: Option<PoolSummary>,
}

/// How the primary phase ended
enum PrimaryOutcome {
    /// Stream ended normally; frames in arrival order
    Finished(Vec<BackendFrame>),
    /// Run ended with an error status
    Stopped,
    Cancelled,
}

/// Pipeline orchestrator
pub struct Pipeline {
    backend: Arc<dyn VideoBackend>,
    enricher: Arc<dyn FrameEnricher>,
    config: PipelineConfig,
    state_tx: watch::Sender<Snapshot>,
}

impl Pipeline {
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        enricher: Arc<dyn FrameEnricher>,
        config: PipelineConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(Snapshot::new());
        Self {
            backend,
            enricher,
            config,
            state_tx,
        }
    }

    /// Receive every snapshot this pipeline publishes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.state_tx.borrow().clone()
    }

    /// Publish a fresh snapshot
    pub fn reset(&self) {
        self.state_tx.send_replace(Snapshot::new());
    }

    /// Run the whole pipeline for `video`
    pub async fn run(&self, video: &Path, cancel: &CancellationToken) -> PipelineRun {
        let run_id = Uuid::new_v4();
        let mut snapshot = Snapshot::new();
        self.state_tx.send_replace(snapshot.clone());

        info!(run_id = %run_id, video = %video.display(), "Pipeline run started");

        self.apply(&mut snapshot, PipelineEvent::UploadStarted);

        let frames = match self.primary_phase(run_id, video, &mut snapshot, cancel).await {
            PrimaryOutcome::Finished(frames) => frames,
            PrimaryOutcome::Stopped => return self.finish(run_id, snapshot, false, None),
            PrimaryOutcome::Cancelled => return self.finish(run_id, snapshot, true, None),
        };

        let enrichment = self
            .enrichment_phase(run_id, &frames, &mut snapshot, cancel)
            .await;
        let cancelled = enrichment.as_ref().map(|s| s.cancelled).unwrap_or(false);

        self.finish(run_id, snapshot, cancelled, enrichment)
    }

    /// Upload, then consume the event stream until it ends
    async fn primary_phase(
        &self,
        run_id: Uuid,
        video: &Path,
        snapshot: &mut Snapshot,
        cancel: &CancellationToken,
    ) -> PrimaryOutcome {
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PrimaryOutcome::Cancelled,
            opened = self.backend.open_event_stream(video) => opened,
        };

        let chunks = match opened {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(run_id = %run_id, error = %e, "Failed to open event stream");
                self.apply(
                    snapshot,
                    PipelineEvent::Failed {
                        message: e.to_string(),
                    },
                );
                return PrimaryOutcome::Stopped;
            }
        };

        let events = decode_stream(chunks);
        futures::pin_mut!(events);

        let mut frames = Vec::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return PrimaryOutcome::Cancelled,
                next = events.next() => next,
            };

            let event = match next {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    error!(run_id = %run_id, error = %e, "Event stream failed");
                    self.apply(
                        snapshot,
                        PipelineEvent::Failed {
                            message: e.to_string(),
                        },
                    );
                    return PrimaryOutcome::Stopped;
                }
                None => break,
            };

            debug!(run_id = %run_id, event = event.event_type(), "Stream event");

            match &event {
                StreamEvent::FrameDetected { frame } => frames.push(frame.clone()),
                StreamEvent::Error { message } => {
                    warn!(run_id = %run_id, message = %message, "Backend reported an error");
                }
                _ => {}
            }

            let upstream_error = matches!(event, StreamEvent::Error { .. });
            let finished = matches!(event, StreamEvent::Complete { .. });

            self.apply(snapshot, event.into());

            if upstream_error {
                return PrimaryOutcome::Stopped;
            }
            if finished {
                break;
            }
        }

        info!(
            run_id = %run_id,
            frames = frames.len(),
            total_scenes = snapshot.total_scenes,
            "Primary stream finished"
        );

        PrimaryOutcome::Finished(frames)
    }

    /// Describe every detected frame, reducing results as they complete
    async fn enrichment_phase(
        &self,
        run_id: Uuid,
        frames: &[BackendFrame],
        snapshot: &mut Snapshot,
        cancel: &CancellationToken,
    ) -> Option<PoolSummary> {
        let total = frames.len();
        self.apply(snapshot, PipelineEvent::EnrichProgress { enriched: 0, total });

        if total == 0 {
            info!(run_id = %run_id, "No frames to enrich");
            return None;
        }

        let pool = TaskPool::new(self.config.concurrency);
        info!(
            run_id = %run_id,
            frames = total,
            concurrency = pool.limit(),
            "Enrichment started"
        );

        let enricher = &self.enricher;
        let summary = pool
            .run(
                frames,
                |frame, _| enricher.enrich(frame),
                |index, frame, result| {
                    debug!(
                        run_id = %run_id,
                        index = index,
                        described = result.is_some(),
                        "Enrichment finished for frame"
                    );
                    self.apply(
                        snapshot,
                        PipelineEvent::EnrichDone {
                            annotation_id: annotation_id(index, frame.timestamp),
                            result,
                        },
                    );
                },
                cancel,
            )
            .await;

        info!(
            run_id = %run_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Enrichment finished"
        );

        Some(summary)
    }

    /// Reduce one event and publish the result
    fn apply(&self, snapshot: &mut Snapshot, event: PipelineEvent) {
        let next = reduce(std::mem::take(snapshot), &event);
        *snapshot = next;
        self.state_tx.send_replace(snapshot.clone());
    }

    fn finish(
        &self,
        run_id: Uuid,
        snapshot: Snapshot,
        cancelled: bool,
        enrichment: Option<PoolSummary>,
    ) -> PipelineRun {
        info!(
            run_id = %run_id,
            status = ?snapshot.status,
            annotations = snapshot.annotations.len(),
            cancelled = cancelled,
            "Pipeline run finished"
        );

        PipelineRun {
            run_id,
            snapshot,
            cancelled,
            enrichment,
        }
    }
}
