//! Enrichment endpoint request/response types
//!
//! The endpoint keeps the field names of the deployed service, so the Rust
//! names are mapped with serde renames.

use serde::{Deserialize, Serialize};

/// Body of one enrichment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    /// Frame image as a `data:image/jpeg;base64,...` URL
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
    /// Position of the frame in the video (seconds)
    pub timestamp: f64,
}

/// Enrichment answer for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(rename = "contem_elemento", default)]
    pub contains_element: Option<bool>,
    #[serde(rename = "tipo_elemento", default)]
    pub element_type: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

impl EnrichmentResult {
    /// Whether the model reported a visual element in the frame
    pub fn has_element(&self) -> bool {
        self.contains_element.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_names() {
        let request = EnrichmentRequest {
            image_base64: "data:image/jpeg;base64,AAAA".to_string(),
            timestamp: 12.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["imageBase64"], "data:image/jpeg;base64,AAAA");
        assert_eq!(value["timestamp"], 12.5);
    }

    #[test]
    fn test_result_with_element() {
        let result: EnrichmentResult = serde_json::from_str(
            r#"{"contem_elemento":true,"tipo_elemento":"Diagrama","descricao":"Um diagrama UML."}"#,
        )
        .unwrap();
        assert!(result.has_element());
        assert_eq!(result.element_type.as_deref(), Some("Diagrama"));
        assert_eq!(result.description.as_deref(), Some("Um diagrama UML."));
    }

    #[test]
    fn test_result_all_null() {
        let result: EnrichmentResult = serde_json::from_str(
            r#"{"contem_elemento":null,"tipo_elemento":null,"descricao":null}"#,
        )
        .unwrap();
        assert!(!result.has_element());
        assert_eq!(result, EnrichmentResult::default());
    }
}
