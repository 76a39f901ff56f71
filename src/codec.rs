//! Layer codec: lossless conversion between live scene objects and layers.
//!
//! DESIGN
//! ======
//! A layer carries two descriptions of the same object: the tracked fields
//! (geometry, opacity, visibility, lock, identity, variant payload) and the
//! `render_data` blob, which is the full JSON form of the live object.
//! Serializing writes both. Deserializing rebuilds the object from the blob
//! and then re-applies the tracked fields on top, so tracked fields are the
//! source of truth and the blob only supplies what the layer does not model.
//!
//! Serialization also stamps identity metadata onto the live object: an object
//! that passes through the codec always leaves with a layer id and zIndex.
//!
//! ERROR HANDLING
//! ==============
//! A blob that cannot produce a live object is a `CodecError::Deserialization`.
//! Bulk restores skip such layers and report how many made it.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::fmt;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::consts::LAYER_NAME_TEXT_CHARS;
use crate::error::ErrorCode;
use crate::layer::{
    GroupContent, ImageContent, Layer, LayerContent, LayerId, LayerPosition, LayerType, ShapeContent, TextContent,
};
use crate::scene::{NativeKind, Scene, SceneObject};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("layer {layer_id} could not be reconstructed: {reason}")]
    Deserialization { layer_id: LayerId, reason: String },
}

impl ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Deserialization { .. } => "E_DESERIALIZATION",
        }
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Mint a fresh, never-reused layer id.
#[must_use]
pub fn mint_layer_id() -> LayerId {
    Uuid::new_v4().to_string()
}

/// Return the object's layer id, minting and stamping one if absent.
pub fn ensure_layer_id(obj: &mut SceneObject) -> LayerId {
    obj.meta
        .layer_id
        .get_or_insert_with(mint_layer_id)
        .clone()
}

/// Deep copy of `obj` with fresh layer ids on it and all of its children.
#[must_use]
pub fn clone_with_new_identity(obj: &SceneObject) -> SceneObject {
    let mut copy = obj.clone();
    reassign_ids(&mut copy);
    copy.editing = false;
    copy
}

fn reassign_ids(obj: &mut SceneObject) {
    obj.meta.layer_id = Some(mint_layer_id());
    for child in &mut obj.children {
        reassign_ids(child);
    }
}

// =============================================================================
// SERIALIZE
// =============================================================================

/// Read a live object into a layer, stamping identity metadata onto it.
pub fn serialize_layer(obj: &mut SceneObject, z_index: i64) -> Layer {
    let layer_id = ensure_layer_id(obj);
    obj.meta.z_index = Some(z_index);
    for child in &mut obj.children {
        ensure_layer_id(child);
    }

    let content = read_content(obj, obj.layer_type());
    let layer_name = obj
        .meta
        .layer_name
        .clone()
        .unwrap_or_else(|| default_layer_name(&content));
    let render_data = match serde_json::to_value(&*obj) {
        Ok(value) => value,
        Err(e) => {
            warn!(%layer_id, error = %e, "render data serialization failed");
            Value::Null
        }
    };

    Layer {
        layer_id,
        layer_name,
        is_locked: obj.meta.locked,
        is_hidden: !obj.visible,
        z_index,
        position: LayerPosition {
            x: obj.left,
            y: obj.top,
            width: obj.width,
            height: obj.height,
            rotation_degrees: obj.angle,
        },
        opacity: opacity_to_percent(obj.opacity, obj.meta.explicit_opacity),
        custom_data: obj.meta.custom_data.clone(),
        content,
        render_data,
    }
}

/// Serialize every object in stacking order; zIndex is the stack position.
pub fn serialize_scene(scene: &mut Scene) -> Vec<Layer> {
    scene
        .objects_mut()
        .iter_mut()
        .zip(0_i64..)
        .map(|(obj, z)| serialize_layer(obj, z))
        .collect()
}

fn read_content(obj: &SceneObject, layer_type: LayerType) -> LayerContent {
    let props = obj.props();
    match layer_type {
        LayerType::Text => LayerContent::Text(TextContent {
            text: props.text().to_string(),
            font_family: props.font_family().to_string(),
            font_size: props.font_size(),
            font_weight: props.font_weight(),
            letter_spacing: props.letter_spacing(),
            color: props.fill().to_string(),
        }),
        LayerType::Image | LayerType::Clipart => {
            let image = ImageContent {
                src: props.src().to_string(),
                asset_id: props.asset_id().map(str::to_string),
                asset_source: props.asset_source().map(str::to_string),
            };
            if layer_type == LayerType::Clipart {
                LayerContent::Clipart(image)
            } else {
                LayerContent::Image(image)
            }
        }
        LayerType::Shape => LayerContent::Shape(ShapeContent {
            shape_kind: obj.kind.shape_kind(),
            fill: props.fill().to_string(),
            stroke: props.stroke().map(str::to_string),
            stroke_width: props.stroke_width(),
        }),
        LayerType::Group => LayerContent::Group(GroupContent {
            child_layer_ids: obj
                .children
                .iter()
                .filter_map(|child| child.meta.layer_id.clone())
                .collect(),
        }),
    }
}

/// Default display name: leading text for text layers, else the type label.
#[must_use]
pub fn default_layer_name(content: &LayerContent) -> String {
    if let LayerContent::Text(text) = content {
        let trimmed = text.text.trim();
        if !trimmed.is_empty() {
            return trimmed.chars().take(LAYER_NAME_TEXT_CHARS).collect();
        }
    }
    content.layer_type().label().to_string()
}

/// Opacity fraction to an integer percentage in `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn opacity_percent(opacity: f64) -> u8 {
    (opacity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Fully opaque is reported as absent unless it was stated explicitly.
fn opacity_to_percent(opacity: f64, explicit: bool) -> Option<u8> {
    let percent = opacity_percent(opacity);
    if percent == 100 && !explicit { None } else { Some(percent) }
}

fn percent_to_opacity(percent: u8) -> f64 {
    f64::from(percent.min(100)) / 100.0
}

// =============================================================================
// DESERIALIZE
// =============================================================================

/// Rebuild a live object from a layer.
///
/// # Errors
///
/// Returns [`CodecError::Deserialization`] when `render_data` is missing or
/// does not describe a live object.
pub fn deserialize_layer(layer: &Layer) -> Result<SceneObject, CodecError> {
    if layer.render_data.is_null() {
        return Err(CodecError::Deserialization {
            layer_id: layer.layer_id.clone(),
            reason: "missing render data".into(),
        });
    }
    let mut obj: SceneObject =
        serde_json::from_value(layer.render_data.clone()).map_err(|e| CodecError::Deserialization {
            layer_id: layer.layer_id.clone(),
            reason: e.to_string(),
        })?;
    apply_tracked_fields(&mut obj, layer);
    Ok(obj)
}

fn apply_tracked_fields(obj: &mut SceneObject, layer: &Layer) {
    obj.left = layer.position.x;
    obj.top = layer.position.y;
    obj.width = layer.position.width;
    obj.height = layer.position.height;
    obj.angle = layer.position.rotation_degrees;
    obj.opacity = percent_to_opacity(layer.opacity_percent());
    obj.visible = !layer.is_hidden;
    obj.editing = false;

    obj.meta.layer_id = Some(layer.layer_id.clone());
    obj.meta.layer_type = Some(layer.layer_type());
    // A name equal to the derived one stays derived so it follows content edits.
    obj.meta.layer_name = (layer.layer_name != default_layer_name(&layer.content)).then(|| layer.layer_name.clone());
    obj.meta.explicit_opacity = layer.opacity.is_some();
    obj.meta.locked = layer.is_locked;
    obj.meta.z_index = Some(layer.z_index);
    obj.meta.custom_data = layer.custom_data.clone();

    match &layer.content {
        LayerContent::Text(text) => {
            set_str(obj, "text", Some(&text.text));
            set_str(obj, "fontFamily", Some(&text.font_family));
            obj.props
                .insert("fontSize".into(), Value::from(text.font_size));
            set_str(obj, "fontWeight", text.font_weight.as_deref());
            set_f64(obj, "letterSpacing", text.letter_spacing);
            set_str(obj, "fill", Some(&text.color));
        }
        LayerContent::Image(image) | LayerContent::Clipart(image) => {
            set_str(obj, "src", Some(&image.src));
            set_str(obj, "assetId", image.asset_id.as_deref());
            set_str(obj, "assetSource", image.asset_source.as_deref());
        }
        LayerContent::Shape(shape) => {
            if obj.kind.shape_kind() != shape.shape_kind {
                obj.kind = NativeKind::from_shape_kind(shape.shape_kind);
            }
            set_str(obj, "fill", Some(&shape.fill));
            set_str(obj, "stroke", shape.stroke.as_deref());
            obj.props
                .insert("strokeWidth".into(), Value::from(shape.stroke_width));
        }
        // Membership is owned by the live group; the id list is informational.
        LayerContent::Group(_) => {}
    }
}

fn set_str(obj: &mut SceneObject, key: &str, value: Option<&str>) {
    match value {
        Some(v) => {
            obj.props.insert(key.to_string(), Value::from(v));
        }
        None => {
            obj.props.remove(key);
        }
    }
}

fn set_f64(obj: &mut SceneObject, key: &str, value: Option<f64>) {
    match value {
        Some(v) => {
            obj.props.insert(key.to_string(), Value::from(v));
        }
        None => {
            obj.props.remove(key);
        }
    }
}

// =============================================================================
// BULK RESTORE
// =============================================================================

/// Outcome of restoring a batch of layers.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub total: usize,
    pub restored: usize,
    pub failures: Vec<CodecError>,
}

impl RestoreReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} layers restored", self.restored, self.total)
    }
}

/// Rebuild live objects for `layers` in zIndex order, skipping layers that
/// fail to deserialize.
pub fn restore_layers(layers: &[Layer]) -> (Vec<SceneObject>, RestoreReport) {
    let mut ordered: Vec<&Layer> = layers.iter().collect();
    ordered.sort_by_key(|layer| layer.z_index);

    let mut report = RestoreReport { total: layers.len(), ..RestoreReport::default() };
    let mut objects = Vec::with_capacity(layers.len());
    for layer in ordered {
        match deserialize_layer(layer) {
            Ok(obj) => {
                objects.push(obj);
                report.restored += 1;
            }
            Err(e) => {
                warn!(layer_id = %layer.layer_id, error = %e, "skipping layer that failed to restore");
                report.failures.push(e);
            }
        }
    }
    if !report.is_complete() {
        info!(restored = report.restored, total = report.total, "partial layer restore");
    }
    (objects, report)
}
