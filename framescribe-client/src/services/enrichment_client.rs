//! Frame enrichment client
//!
//! Sends one detected frame to the description endpoint and returns what it
//! says about the frame. No retries; the pool turns a failure into an empty
//! result for that frame.

use crate::error::EnrichmentError;
use async_trait::async_trait;
use framescribe_common::events::{BackendFrame, EnrichmentRequest, EnrichmentResult};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("framescribe/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Produces a description for one detected frame
#[async_trait]
pub trait FrameEnricher: Send + Sync {
    async fn enrich(&self, frame: &BackendFrame) -> Result<EnrichmentResult, EnrichmentError>;
}

/// HTTP implementation posting to the enrichment endpoint
pub struct HttpFrameEnricher {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpFrameEnricher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FrameEnricher for HttpFrameEnricher {
    async fn enrich(&self, frame: &BackendFrame) -> Result<EnrichmentResult, EnrichmentError> {
        let request = EnrichmentRequest {
            image_base64: frame.image_data_url(),
            timestamp: frame.timestamp,
        };

        debug!(timestamp = frame.timestamp, "Requesting frame description");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Status(status.as_u16(), error_text));
        }

        response
            .json::<EnrichmentResult>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
