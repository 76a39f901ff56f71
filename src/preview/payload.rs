//! Preview payload extraction and content hashing.
//!
//! The payload is what the renderer needs and nothing more: visible,
//! non-group objects with rounded geometry and their variant fields. Objects
//! that cannot render (blank text, images without a catalog asset) are left
//! out rather than sent half-formed.
//!
//! The cache key is FNV-1a over a canonical JSON rendering: object keys sorted
//! at every depth, layers ordered by zIndex then id. Two requests that differ
//! only in layer list order therefore share a key.

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{PreviewInput, PreviewLayer, PreviewRequest};
use crate::camera::Rect;
use crate::codec::opacity_percent;
use crate::consts::PREVIEW_ROTATION_LIMIT_DEG;
use crate::layer::{ImageContent, LayerContent, LayerType, ShapeContent, TextContent};
use crate::scene::{Scene, SceneObject};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Visible objects as preview layers, in stacking order.
#[must_use]
pub fn serialize_preview_layers(scene: &Scene) -> Vec<PreviewLayer> {
    scene
        .objects()
        .iter()
        .zip(0_i64..)
        .filter(|(obj, _)| obj.visible)
        .filter_map(|(obj, index)| preview_layer(obj, index))
        .collect()
}

impl PreviewInput {
    /// Payload for the current scene.
    #[must_use]
    pub fn from_scene(product_id: &str, design_area: Rect, scene: &Scene) -> Self {
        Self {
            product_id: product_id.to_string(),
            design_area,
            layers: serialize_preview_layers(scene),
        }
    }
}

fn preview_layer(obj: &SceneObject, index: i64) -> Option<PreviewLayer> {
    let layer_id = obj.layer_id()?.to_string();
    let content = preview_content(obj)?;
    Some(PreviewLayer {
        layer_id,
        z_index: index,
        x: round(obj.left),
        y: round(obj.top),
        width: round(obj.width),
        height: round(obj.height),
        rotation: round(obj.angle.clamp(-PREVIEW_ROTATION_LIMIT_DEG, PREVIEW_ROTATION_LIMIT_DEG)),
        opacity: opacity_percent(obj.opacity),
        content,
    })
}

fn preview_content(obj: &SceneObject) -> Option<LayerContent> {
    let props = obj.props();
    let layer_type = obj.layer_type();
    match layer_type {
        LayerType::Text => {
            let text = props.text().trim();
            if text.is_empty() {
                debug!(layer_id = ?obj.layer_id(), "blank text left out of preview");
                return None;
            }
            Some(LayerContent::Text(TextContent {
                text: text.to_string(),
                font_family: props.font_family().to_string(),
                font_size: props.font_size(),
                font_weight: props.font_weight(),
                letter_spacing: props.letter_spacing(),
                color: props.fill().to_string(),
            }))
        }
        LayerType::Image | LayerType::Clipart => {
            let Some(asset_id) = props.asset_id() else {
                debug!(layer_id = ?obj.layer_id(), "image without asset left out of preview");
                return None;
            };
            let image = ImageContent {
                src: props.src().to_string(),
                asset_id: Some(asset_id.to_string()),
                asset_source: props.asset_source().map(str::to_string),
            };
            Some(if layer_type == LayerType::Clipart {
                LayerContent::Clipart(image)
            } else {
                LayerContent::Image(image)
            })
        }
        LayerType::Shape => Some(LayerContent::Shape(ShapeContent {
            shape_kind: obj.kind.shape_kind(),
            fill: props.fill().to_string(),
            stroke: props.stroke().map(str::to_string),
            stroke_width: props.stroke_width(),
        })),
        LayerType::Group => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}

// =============================================================================
// CACHE KEY
// =============================================================================

/// Content hash of a request, independent of layer list order.
#[must_use]
pub fn cache_key(request: &PreviewRequest) -> u64 {
    let mut ordered = request.clone();
    ordered
        .layers
        .sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.layer_id.cmp(&b.layer_id)));
    let value = match serde_json::to_value(&ordered) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "preview request not representable as JSON");
            Value::Null
        }
    };
    let mut canonical = String::new();
    write_canonical(&value, &mut canonical);
    fnv1a(canonical.as_bytes())
}

/// Compact JSON with object keys sorted at every depth.
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                if let Some(child) = map.get(key) {
                    write_canonical(child, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// 64-bit FNV-1a.
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;
