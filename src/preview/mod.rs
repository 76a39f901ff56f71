//! Preview generation: payloads, cache keys, and the debounced pipeline.
//!
//! DESIGN
//! ======
//! Editing produces a stream of scene changes; the renderer is slow and
//! remote. `payload` reduces a scene to the minimal renderer input and hashes
//! it, `cache` remembers recent responses by that hash, and `pipeline`
//! debounces, deduplicates and cancels calls so only the latest state is
//! ever rendered. The network sits behind [`PreviewRenderer`];
//! [`HttpPreviewRenderer`] is the production implementation.

pub mod cache;
pub mod http;
pub mod payload;
pub mod pipeline;
pub mod types;

pub use cache::PreviewCache;
pub use http::HttpPreviewRenderer;
pub use payload::{cache_key, canonical_json, serialize_preview_layers};
pub use pipeline::{PreviewOutcome, PreviewPipeline};
pub use types::{
    PreviewError, PreviewInput, PreviewLayer, PreviewRenderer, PreviewRequest, PreviewResponse, PreviewState,
    Resolution,
};
