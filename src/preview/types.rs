//! Preview wire types, observable state, and the renderer seam.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::Rect;
use crate::error::ErrorCode;
use crate::layer::{LayerContent, LayerId};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while obtaining a preview.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreviewError {
    /// The HTTP request to the renderer failed.
    #[error("preview request failed: {0}")]
    Request(String),

    /// The renderer returned a non-success HTTP status.
    #[error("preview renderer error: status {status}")]
    Response { status: u16, body: String },

    /// The renderer response body could not be deserialized.
    #[error("preview response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("no preview endpoint configured")]
    MissingEndpoint,
}

impl ErrorCode for PreviewError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_PREVIEW_REQUEST",
            Self::Response { .. } => "E_PREVIEW_RESPONSE",
            Self::Parse(_) => "E_PREVIEW_PARSE",
            Self::HttpClientBuild(_) => "E_PREVIEW_CLIENT_BUILD",
            Self::MissingEndpoint => "E_PREVIEW_MISSING_ENDPOINT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Fast, low-fidelity render used while editing.
    #[default]
    Draft,
    High,
}

/// One visible layer as the renderer sees it.
///
/// Geometry and rotation are rounded to whole units so sub-pixel and
/// sub-degree jitter does not defeat the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLayer {
    pub layer_id: LayerId,
    pub z_index: i64,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation: i64,
    pub opacity: u8,
    /// Never a group; groups are not sent to the renderer.
    #[serde(flatten)]
    pub content: LayerContent,
}

/// Everything needed to ask for a preview, minus the resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewInput {
    pub product_id: String,
    pub design_area: Rect,
    pub layers: Vec<PreviewLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub product_id: String,
    pub design_area: Rect,
    pub resolution: Resolution,
    pub layers: Vec<PreviewLayer>,
}

impl PreviewRequest {
    #[must_use]
    pub fn new(input: PreviewInput, resolution: Resolution) -> Self {
        Self {
            product_id: input.product_id,
            design_area: input.design_area,
            resolution,
            layers: input.layers,
        }
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub preview_id: String,
    pub preview_url: String,
    pub product_id: String,
    #[serde(default)]
    pub design_area: Option<Rect>,
    pub resolution: Resolution,
    /// Renderer-defined; usually an RFC 3339 string.
    #[serde(default)]
    pub timestamp: Value,
    /// Whether the renderer served this from its own cache.
    #[serde(default)]
    pub cached: bool,
}

/// What the host observes about the current preview.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewState {
    pub preview_url: Option<String>,
    /// Display form of the last failure, cleared by the next success.
    pub error: Option<String>,
    pub is_loading: bool,
    pub last_response: Option<PreviewResponse>,
}

// =============================================================================
// RENDERER SEAM
// =============================================================================

/// Remote preview renderer. Enables mocking in tests.
#[async_trait::async_trait]
pub trait PreviewRenderer: Send + Sync {
    /// Render `request` and describe where the result lives.
    ///
    /// # Errors
    ///
    /// Returns a [`PreviewError`] if the request fails, the renderer answers
    /// with an error status, or the response is malformed.
    async fn render(&self, request: &PreviewRequest) -> Result<PreviewResponse, PreviewError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
