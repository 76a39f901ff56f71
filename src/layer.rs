//! Portable layer model: the unit of design content shared with persistence.
//!
//! A [`Layer`] is what leaves the editor: it is saved with a design, stored in
//! history snapshots, and turned back into a live scene object on load. Fields
//! the layer models explicitly ("tracked" fields) are authoritative; everything
//! else about the live object rides along in the opaque `render_data` blob so
//! the round trip is lossless.
//!
//! The JSON shape is camelCase with the variant discriminated by `layerType`.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable, globally unique layer identifier.
pub type LayerId = String;

/// Variant discriminator for [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Image,
    Clipart,
    Text,
    Shape,
    Group,
}

impl LayerType {
    /// Wire name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Clipart => "clipart",
            Self::Text => "text",
            Self::Shape => "shape",
            Self::Group => "group",
        }
    }

    /// Human label used for default layer names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Clipart => "Clipart",
            Self::Text => "Text",
            Self::Shape => "Shape",
            Self::Group => "Group",
        }
    }
}

/// Geometry of a layer in design units. Rotation is unnormalized degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    pub color: String,
}

/// Payload shared by image and clip-art layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub src: String,
    /// Catalog or upload id of the source asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Where the asset came from (`"upload"`, `"library"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    pub shape_kind: ShapeKind,
    pub fill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
}

/// Group membership. Informational only: the live scene owns grouping and it
/// is never rebuilt from this list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContent {
    #[serde(default)]
    pub child_layer_ids: Vec<LayerId>,
}

/// Variant-specific layer fields, tagged by `layerType` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layerType", rename_all = "lowercase")]
pub enum LayerContent {
    Image(ImageContent),
    Clipart(ImageContent),
    Text(TextContent),
    Shape(ShapeContent),
    Group(GroupContent),
}

impl LayerContent {
    #[must_use]
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Image(_) => LayerType::Image,
            Self::Clipart(_) => LayerType::Clipart,
            Self::Text(_) => LayerType::Text,
            Self::Shape(_) => LayerType::Shape,
            Self::Group(_) => LayerType::Group,
        }
    }
}

/// A portable design element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub layer_id: LayerId,
    pub layer_name: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_hidden: bool,
    /// Stacking order; dense `[0, N)` across a settled scene.
    pub z_index: i64,
    pub position: LayerPosition,
    /// Integer percentage 0–100. Absent means fully opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    /// Opaque extension metadata carried through untouched.
    #[serde(default)]
    pub custom_data: Map<String, Value>,
    #[serde(flatten)]
    pub content: LayerContent,
    /// Full live-object representation used for lossless reconstruction.
    #[serde(default)]
    pub render_data: Value,
}

impl Layer {
    #[must_use]
    pub fn layer_type(&self) -> LayerType {
        self.content.layer_type()
    }

    /// Opacity percentage with the "absent means opaque" default applied.
    #[must_use]
    pub fn opacity_percent(&self) -> u8 {
        self.opacity.unwrap_or(100).min(100)
    }

    /// Copy of this layer with the render blob dropped, leaving only the
    /// tracked fields. Used to compare layers for round-trip equality.
    #[must_use]
    pub fn tracked(&self) -> Layer {
        Layer { render_data: Value::Null, ..self.clone() }
    }
}
