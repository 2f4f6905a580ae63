//! Video-analysis backend client
//!
//! Uploads a video and hands back the raw body of the event stream the
//! backend answers with. Decoding is the decoder's job; this module only
//! moves bytes.

use crate::decoder::ChunkStream;
use crate::error::{DecodeError, PipelineError};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("framescribe/", env!("CARGO_PKG_VERSION"));
const PROCESS_VIDEO_PATH: &str = "/api/process-video";
const HEALTH_PATH: &str = "/health";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Source of the video-analysis event stream
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Submit `video` and open the event stream produced for it
    async fn open_event_stream(&self, video: &Path) -> Result<ChunkStream, PipelineError>;
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// HTTP implementation talking to the video-analysis service
pub struct HttpVideoBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpVideoBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PipelineError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Probe the backend's health endpoint
    pub async fn health(&self) -> Result<HealthStatus, PipelineError> {
        let response = self
            .http_client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Network(format!(
                "Health check returned {}",
                status.as_u16()
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| PipelineError::Network(format!("Invalid health response: {}", e)))
    }
}

#[async_trait]
impl VideoBackend for HttpVideoBackend {
    async fn open_event_stream(&self, video: &Path) -> Result<ChunkStream, PipelineError> {
        let data = tokio::fs::read(video).await?;
        let file_name = video
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        info!(
            file = %file_name,
            bytes = data.len(),
            backend = %self.base_url,
            "Uploading video"
        );

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.url(PROCESS_VIDEO_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = if error_text.trim().is_empty() {
                format!("Server error: {}", status.as_u16())
            } else {
                error_text
            };
            return Err(PipelineError::Upload(message));
        }

        if response.content_length() == Some(0) {
            return Err(DecodeError::MissingBody.into());
        }

        debug!(status = status.as_u16(), "Event stream opened");

        let chunks = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| DecodeError::Read(e.to_string()))
            })
            .boxed();

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_ignores_trailing_slash() {
        let backend = HttpVideoBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(
            backend.url(PROCESS_VIDEO_PATH),
            "http://localhost:8000/api/process-video"
        );
    }

    #[test]
    fn test_health_status() {
        let ok: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(ok.is_ok());
        let degraded: HealthStatus = serde_json::from_str(r#"{"status":"loading"}"#).unwrap();
        assert!(!degraded.is_ok());
    }
}
