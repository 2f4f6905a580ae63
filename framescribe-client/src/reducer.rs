//! Progress reducer
//!
//! `reduce(snapshot, event) -> snapshot` is the only way the snapshot
//! changes. It performs no I/O and holds no state of its own, so every
//! ordering question (stream order, completion order) is decided by the
//! caller feeding events one at a time.

use crate::models::{Annotation, PipelineEvent, Snapshot, Status};
use framescribe_common::events::{BackendFrame, EnrichmentResult, ProgressStage, StreamEvent};

/// Apply one event to a snapshot, returning the next snapshot.
pub fn reduce(snapshot: Snapshot, event: &PipelineEvent) -> Snapshot {
    let mut next = snapshot;

    // Error absorbs everything except further error reports.
    if next.status == Status::Error {
        match event {
            PipelineEvent::Stream(StreamEvent::Error { message }) => {
                next.error_message = Some(message.clone());
                next.message = message.clone();
            }
            PipelineEvent::Failed { message } => {
                next.error_message = Some(message.clone());
                next.message = FAILED_MESSAGE.to_string();
            }
            _ => {}
        }
        return next;
    }

    match event {
        PipelineEvent::UploadStarted => {
            next.status = next.status.advance_to(Status::Uploading);
            next.message = "Uploading video for processing...".to_string();
        }
        PipelineEvent::Stream(stream_event) => apply_stream_event(&mut next, stream_event),
        PipelineEvent::EnrichProgress { enriched, total } => {
            apply_enrich_progress(&mut next, *enriched, *total)
        }
        PipelineEvent::EnrichDone {
            annotation_id,
            result,
        } => apply_enrich_done(&mut next, annotation_id, result.as_ref()),
        PipelineEvent::Failed { message } => {
            if next.status != Status::Complete {
                next.status = Status::Error;
                next.error_message = Some(message.clone());
                next.message = FAILED_MESSAGE.to_string();
            }
        }
    }

    next
}

/// Fold a sequence of events into a snapshot
pub fn reduce_all<'a, I>(snapshot: Snapshot, events: I) -> Snapshot
where
    I: IntoIterator<Item = &'a PipelineEvent>,
{
    events.into_iter().fold(snapshot, reduce)
}

const FAILED_MESSAGE: &str = "Error during processing.";

fn apply_stream_event(next: &mut Snapshot, event: &StreamEvent) {
    match event {
        StreamEvent::Progress {
            stage,
            current,
            total,
            message,
        } => {
            let target = match stage {
                ProgressStage::Upload => Some(Status::Uploading),
                ProgressStage::Scenes => Some(Status::DetectingScenes),
                ProgressStage::Yolo => Some(Status::DetectingElements),
                ProgressStage::Ai | ProgressStage::Done | ProgressStage::Unknown => None,
            };
            if let Some(target) = target {
                next.status = next.status.advance_to(target);
            }
            if let Some(current) = current {
                next.current_scene = *current;
            }
            if let Some(total) = total {
                next.total_scenes = *total;
            }
            next.message = message.clone();
        }
        StreamEvent::SceneCount { total_scenes } => {
            next.total_scenes = *total_scenes;
            next.status = next.status.advance_to(Status::DetectingElements);
            next.message = format!("{} scenes detected. Analyzing frames...", total_scenes);
        }
        StreamEvent::FrameDetected { frame } => insert_annotation(next, frame),
        StreamEvent::Complete { summary } => {
            next.processing_time = summary.processing_time;
            next.total_scenes = summary.total_scenes;
            next.total_analyzed = summary.total_analyzed;
            next.frames_with_elements = summary.frames_with_elements;
            next.message = format!(
                "Discovery finished: {} elements in {} scenes.",
                summary.frames_with_elements, summary.total_scenes
            );
        }
        StreamEvent::Error { message } => {
            if next.status != Status::Complete {
                next.status = Status::Error;
                next.error_message = Some(message.clone());
                next.message = message.clone();
            }
        }
    }
}

/// Append the annotation for a detected frame, keeping timestamp order.
/// Equal timestamps keep arrival order.
fn insert_annotation(next: &mut Snapshot, frame: &BackendFrame) {
    let index = next.annotations.len();
    let annotation = Annotation::from_frame(frame, index);
    let position = next
        .annotations
        .partition_point(|existing| existing.timestamp <= annotation.timestamp);
    next.annotations.insert(position, annotation);
    next.frames_with_elements += 1;
}

fn apply_enrich_progress(next: &mut Snapshot, enriched: usize, total: usize) {
    next.enrich_total = total;
    next.enriched_count = enriched.min(total);

    if total == 0 {
        next.status = next.status.advance_to(Status::Complete);
        next.message = "Processing finished. No visual elements found.".to_string();
        return;
    }

    next.status = next.status.advance_to(Status::AnalyzingAi);
    update_enrich_status(next);
}

fn apply_enrich_done(next: &mut Snapshot, annotation_id: &str, result: Option<&EnrichmentResult>) {
    // Completions for unknown ids leave the count alone
    let Some(annotation) = next
        .annotations
        .iter_mut()
        .find(|annotation| annotation.id == annotation_id)
    else {
        return;
    };

    if let Some(result) = result {
        if let Some(description) = result.description.as_deref().filter(|d| !d.is_empty()) {
            annotation.description = description.to_string();
        }
        if let Some(element_type) = result.element_type.as_deref().filter(|t| !t.is_empty()) {
            annotation.element_type = element_type.to_string();
        }
        annotation.confidence = if result.has_element() { 1.0 } else { 0.0 };
    }

    // Each id counts toward the total once
    if !annotation.enrichment_settled {
        annotation.enrichment_settled = true;
        next.enriched_count = (next.enriched_count + 1).min(next.enrich_total);
    }
    update_enrich_status(next);
}

fn update_enrich_status(next: &mut Snapshot) {
    if next.enrich_total > 0 && next.enriched_count >= next.enrich_total {
        next.status = next.status.advance_to(Status::Complete);
        next.message = format!("Done! {} descriptions generated.", next.described_count());
    } else {
        next.message = format!(
            "Generating accessible descriptions... ({}/{})",
            next.enriched_count, next.enrich_total
        );
    }
}
