//! Event types of the video-analysis stream
//!
//! The backend emits one JSON object per `data:` line, tagged by a `type`
//! field. [`StreamEvent`] mirrors that wire contract one-to-one; anything the
//! client derives from it (annotations, progress snapshot) lives in the
//! client crate.

pub mod enrichment_types;
pub mod frame_types;

pub use enrichment_types::{EnrichmentRequest, EnrichmentResult};
pub use frame_types::{element_label, top_detection, BackendFrame, Detection};

use serde::{Deserialize, Serialize};

/// Processing stage carried by `progress` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// Video upload to the backend
    Upload,
    /// Scene transition detection
    Scenes,
    /// Per-scene visual element detection
    Yolo,
    /// Description generation
    Ai,
    /// Backend finished its own work
    Done,
    /// Stage name this client does not know
    #[serde(other)]
    Unknown,
}

/// Summary attached to the backend `complete` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub total_scenes: u32,
    pub total_analyzed: u32,
    pub frames_with_elements: u32,
    /// Backend processing time in seconds
    pub processing_time: f64,
}

/// One decoded event from the video-analysis stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Progress {
        stage: ProgressStage,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<u32>,
        message: String,
    },
    SceneCount {
        total_scenes: u32,
    },
    FrameDetected {
        frame: BackendFrame,
    },
    Complete {
        summary: SceneSummary,
    },
    Error {
        message: String,
    },
}

impl StreamEvent {
    /// Wire name of the event type (used in log fields)
    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::SceneCount { .. } => "scene_count",
            StreamEvent::FrameDetected { .. } => "frame_detected",
            StreamEvent::Complete { .. } => "complete",
            StreamEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_without_counts() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"progress","stage":"scenes","message":"Analisando video..."}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            StreamEvent::Progress {
                stage: ProgressStage::Scenes,
                current: None,
                total: None,
                message: "Analisando video...".to_string(),
            }
        );
    }

    #[test]
    fn test_progress_with_counts() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"progress","stage":"yolo","current":3,"total":7,"message":"Analisando frame 3/7..."}"#,
        )
        .unwrap();

        match event {
            StreamEvent::Progress { stage, current, total, .. } => {
                assert_eq!(stage, ProgressStage::Yolo);
                assert_eq!(current, Some(3));
                assert_eq!(total, Some(7));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_stage_does_not_fail() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"progress","stage":"warmup","message":"x"}"#).unwrap();
        assert!(matches!(
            event,
            StreamEvent::Progress { stage: ProgressStage::Unknown, .. }
        ));
    }

    #[test]
    fn test_frame_detected() {
        let json = r#"{
            "type": "frame_detected",
            "frame": {
                "timestamp": 12.5,
                "scene_start": 10.0,
                "scene_end": 15.0,
                "scene_index": 2,
                "image_base64": "AAAA",
                "detections": [
                    {"class_name": "table", "confidence": 0.91, "bbox": [1.0, 2.0, 30.0, 40.0]}
                ]
            }
        }"#;

        let event: StreamEvent = serde_json::from_str(json).unwrap();
        match event {
            StreamEvent::FrameDetected { frame } => {
                assert_eq!(frame.timestamp, 12.5);
                assert_eq!(frame.scene_index, 2);
                assert_eq!(frame.detections.len(), 1);
                assert_eq!(frame.detections[0].bbox, [1.0, 2.0, 30.0, 40.0]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_complete_summary() {
        let json = r#"{"type":"complete","summary":{"total_scenes":5,"total_analyzed":5,"frames_with_elements":2,"processing_time":8.4}}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type(), "complete");
        match event {
            StreamEvent::Complete { summary } => {
                assert_eq!(summary.total_scenes, 5);
                assert_eq!(summary.frames_with_elements, 2);
                assert_eq!(summary.processing_time, 8.4);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<StreamEvent>(r#"{"type":"heartbeat"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result = serde_json::from_str::<StreamEvent>(r#"{"type":"scene_count"}"#);
        assert!(result.is_err());
    }
}
