//! Video frame and detection types
//!
//! A "frame" here is one sampled video instant (not a protocol line).

use serde::{Deserialize, Serialize};

/// Label used when a frame carries no detections
pub const DEFAULT_ELEMENT_LABEL: &str = "Element";

/// Display labels for the detector's known classes
const ELEMENT_TYPE_LABELS: &[(&str, &str)] = &[
    ("table", "Table"),
    ("chart-graph", "Chart"),
    ("visual-illustration", "Visual illustration"),
    ("photographic-image", "Photograph"),
];

/// One classified visual element found within a video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    /// Detector confidence (0.0 to 1.0)
    pub confidence: f64,
    /// Bounding box `[x1, y1, x2, y2]` in pixels
    pub bbox: [f64; 4],
}

/// Sampled video frame with its detections, as sent by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendFrame {
    /// Position in the video (seconds)
    pub timestamp: f64,
    pub scene_start: f64,
    pub scene_end: f64,
    pub scene_index: u32,
    /// JPEG image, base64 encoded without a data-URL prefix
    pub image_base64: String,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl BackendFrame {
    /// Image payload as a `data:` URL
    pub fn image_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.image_base64)
    }
}

/// Highest-confidence detection; on equal confidence the earliest wins.
pub fn top_detection(detections: &[Detection]) -> Option<&Detection> {
    detections.iter().fold(None, |best: Option<&Detection>, candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}

/// Human-readable element type for a frame's detections.
pub fn element_label(detections: &[Detection]) -> String {
    match top_detection(detections) {
        Some(top) => ELEMENT_TYPE_LABELS
            .iter()
            .find(|(class, _)| *class == top.class_name)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| top.class_name.clone()),
        None => DEFAULT_ELEMENT_LABEL.to_string(),
    }
}
