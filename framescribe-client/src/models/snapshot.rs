//! Progress snapshot state machine
//!
//! A run progresses through 6 states:
//! IDLE → UPLOADING → DETECTING_SCENES → DETECTING_ELEMENTS → ANALYZING_AI → COMPLETE
//!
//! ERROR is reachable from every non-terminal state and absorbs everything
//! after it. The snapshot is only ever replaced through
//! [`crate::reducer::reduce`].

use framescribe_common::events::{element_label, BackendFrame, Detection};
use serde::{Deserialize, Serialize};

/// Pipeline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing started yet
    #[default]
    Idle,
    /// Video being sent to the backend
    Uploading,
    /// Backend looking for scene transitions
    DetectingScenes,
    /// Backend looking for visual elements per scene
    DetectingElements,
    /// Descriptions being generated per detected frame
    AnalyzingAi,
    /// Everything finished
    Complete,
    /// Run failed (upload, stream or upstream-signaled)
    Error,
}

impl Status {
    /// Position in the forward order. `Error` sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            Status::Idle => Some(0),
            Status::Uploading => Some(1),
            Status::DetectingScenes => Some(2),
            Status::DetectingElements => Some(3),
            Status::AnalyzingAi => Some(4),
            Status::Complete => Some(5),
            Status::Error => None,
        }
    }

    /// Check if status is terminal (until a reset)
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Complete | Status::Error)
    }

    /// Status after trying to move to `next`.
    ///
    /// Forward moves are taken, backward moves and anything after a terminal
    /// state are ignored. `Error` is taken from any non-terminal state.
    pub fn advance_to(self, next: Status) -> Status {
        if self.is_terminal() {
            return self;
        }
        match (self.rank(), next.rank()) {
            (_, None) => Status::Error,
            (Some(current), Some(target)) if target > current => next,
            _ => self,
        }
    }
}

/// One detected frame plus its (eventual) description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// `ann-{arrival index}-{timestamp}`, recomputable from the stream
    pub id: String,
    pub timestamp: f64,
    pub scene_start: f64,
    pub scene_end: f64,
    /// Frame image as a data URL
    pub thumbnail: String,
    pub element_type: String,
    /// Empty until enriched
    pub description: String,
    pub detections: Vec<Detection>,
    pub confidence: f64,
    /// Set once an enrichment completion (successful or not) has been counted
    #[serde(default)]
    pub enrichment_settled: bool,
}

impl Annotation {
    /// Derive the annotation for the `index`-th detected frame of a stream
    pub fn from_frame(frame: &BackendFrame, index: usize) -> Self {
        Self {
            id: annotation_id(index, frame.timestamp),
            timestamp: frame.timestamp,
            scene_start: frame.scene_start,
            scene_end: frame.scene_end,
            thumbnail: frame.image_data_url(),
            element_type: element_label(&frame.detections),
            description: String::new(),
            detections: frame.detections.clone(),
            confidence: 0.0,
            enrichment_settled: false,
        }
    }

    pub fn is_enriched(&self) -> bool {
        !self.description.is_empty()
    }
}

/// Deterministic annotation identity from arrival index and timestamp
pub fn annotation_id(index: usize, timestamp: f64) -> String {
    format!("ann-{}-{}", index, timestamp)
}

/// Externally observed pipeline state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub status: Status,
    pub total_scenes: u32,
    pub current_scene: u32,
    pub frames_with_elements: u32,
    /// Scenes the backend reported as analyzed
    pub total_analyzed: u32,
    pub enriched_count: usize,
    pub enrich_total: usize,
    /// Single human-readable line describing the current state
    pub message: String,
    /// Sorted by timestamp ascending, never shrinks
    pub annotations: Vec<Annotation>,
    /// Backend processing time (seconds)
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Snapshot {
    /// Fresh all-zero snapshot (also what a reset produces)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Number of annotations that received a description
    pub fn described_count(&self) -> usize {
        self.annotations.iter().filter(|a| a.is_enriched()).count()
    }

    /// Overall progress percentage (0.0 - 100.0) weighted by stage
    pub fn overall_progress(&self) -> f64 {
        match self.status {
            Status::Idle | Status::Error => 0.0,
            Status::Uploading => 5.0,
            Status::DetectingScenes => 15.0,
            Status::DetectingElements => {
                if self.total_scenes > 0 {
                    20.0 + (self.current_scene as f64 / self.total_scenes as f64) * 40.0
                } else {
                    30.0
                }
            }
            Status::AnalyzingAi => {
                if self.enrich_total > 0 {
                    60.0 + (self.enriched_count as f64 / self.enrich_total as f64) * 35.0
                } else {
                    70.0
                }
            }
            Status::Complete => 100.0,
        }
    }
}
