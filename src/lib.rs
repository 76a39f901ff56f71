//! Interactive design-canvas core for product personalization.
//!
//! A shopper places text, images, clip-art and shapes inside a bounded design
//! area that is later printed onto a product. This crate owns the editing core
//! behind that surface: the portable layer model and its codec, undo/redo
//! history, alignment snapping, multi-touch gesture recognition, and the
//! debounced preview pipeline. The host UI is responsible only for wiring
//! pointer events and layer-panel buttons to [`engine::EditorCore`] and for
//! drawing what the scene contains.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Per-canvas editor context tying every component together |
//! | [`layer`] | Portable [`layer::Layer`] type shared with persistence |
//! | [`scene`] | Live scene objects, typed props access, and the scene store |
//! | [`codec`] | Lossless conversion between scene objects and layers |
//! | [`history`] | Bounded undo/redo over layer snapshots |
//! | [`snap`] | Alignment candidates, nearest-snap offsets, guide lines |
//! | [`gesture`] | Multi-pointer gesture state machine |
//! | [`camera`] | Viewport pan/zoom and coordinate conversions |
//! | [`preview`] | Preview payloads, cache keys, debounced remote rendering |
//! | [`config`] | Typed configuration loaded from environment variables |
//! | [`error`] | Error-code trait shared by the crate's error enums |
//! | [`consts`] | Default thresholds and limits |
//! | [`telemetry`] | Tracing subscriber installation for hosts |

pub mod camera;
pub mod codec;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod history;
pub mod layer;
pub mod preview;
pub mod scene;
pub mod snap;
pub mod telemetry;
