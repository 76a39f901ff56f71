//! HTTP transport for the remote preview renderer.
//!
//! Thin `reqwest` wrapper that POSTs the request JSON to the configured
//! endpoint. Pure parsing in `parse_response` for testability.

use std::time::Duration;

use tracing::debug;

use super::types::{PreviewError, PreviewRenderer, PreviewRequest, PreviewResponse};
use crate::config::PreviewConfig;

pub struct HttpPreviewRenderer {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPreviewRenderer {
    /// Build a renderer client from preview config.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::MissingEndpoint`] when no endpoint is
    /// configured, or [`PreviewError::HttpClientBuild`] if the client fails.
    pub fn new(config: &PreviewConfig) -> Result<Self, PreviewError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or(PreviewError::MissingEndpoint)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| PreviewError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl PreviewRenderer for HttpPreviewRenderer {
    async fn render(&self, request: &PreviewRequest) -> Result<PreviewResponse, PreviewError> {
        debug!(product_id = %request.product_id, layers = request.layers.len(), "preview http request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| PreviewError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PreviewError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(PreviewError::Response { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<PreviewResponse, PreviewError> {
    serde_json::from_str(json).map_err(|e| PreviewError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;
