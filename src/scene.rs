//! Live scene: renderable objects, their props, and the in-memory scene store.
//!
//! This module defines what is on the editing surface right now
//! (`SceneObject`, `NativeKind`), the identity metadata the editor stamps onto
//! each object (`ObjectMeta`), a typed accessor for the open-ended `props` bag
//! (`Props`), and the ordered store that owns all live objects (`Scene`).
//!
//! Stacking order is the position in the object list: index 0 is drawn first.
//! Every mutation through `Scene` appends a [`SceneEvent`] to the event feed;
//! the editor drains the feed to decide when to capture history.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::camera::Rect;
use crate::layer::{LayerId, LayerType, ShapeKind};

/// Native kind of a live object as the rendering surface understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeKind {
    /// Editable text box.
    Text,
    /// Raster or vector image.
    Image,
    /// Container of child objects.
    Group,
    Rect,
    Circle,
    Polygon,
    /// Free-form vector path.
    Path,
}

impl NativeKind {
    #[must_use]
    pub fn is_text_like(self) -> bool {
        matches!(self, Self::Text)
    }

    #[must_use]
    pub fn is_image_like(self) -> bool {
        matches!(self, Self::Image)
    }

    #[must_use]
    pub fn is_group_like(self) -> bool {
        matches!(self, Self::Group)
    }

    /// Layer type inferred when the object carries no explicit metadata.
    #[must_use]
    pub fn inferred_layer_type(self) -> LayerType {
        if self.is_text_like() {
            LayerType::Text
        } else if self.is_image_like() {
            LayerType::Image
        } else if self.is_group_like() {
            LayerType::Group
        } else {
            LayerType::Shape
        }
    }

    /// Shape kind for geometric natives. Paths render as polygons.
    #[must_use]
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            Self::Circle => ShapeKind::Circle,
            Self::Polygon | Self::Path => ShapeKind::Polygon,
            _ => ShapeKind::Rect,
        }
    }

    #[must_use]
    pub fn from_shape_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rect => Self::Rect,
            ShapeKind::Circle => Self::Circle,
            ShapeKind::Polygon => Self::Polygon,
        }
    }
}

/// Identity metadata the editor keeps on every object it has touched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
    /// Explicit layer type; wins over inference from the native kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<LayerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_data: Map<String, Value>,
    /// Opacity was stated on the layer even when fully opaque.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub explicit_opacity: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A live, renderable object on the editing surface.
///
/// Geometry is in design units; `angle` is clockwise degrees around the
/// bounding-box center; `opacity` is a 0.0–1.0 fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub kind: NativeKind,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Style and every property the layer model does not track.
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneObject>,
    #[serde(default)]
    pub meta: ObjectMeta,
    /// In-progress text editing. Transient, never serialized.
    #[serde(skip)]
    pub editing: bool,
}

impl SceneObject {
    /// Create a bare object of `kind` occupying `bounds`.
    #[must_use]
    pub fn new(kind: NativeKind, bounds: Rect) -> Self {
        Self {
            kind,
            left: bounds.x,
            top: bounds.y,
            width: bounds.width,
            height: bounds.height,
            angle: 0.0,
            opacity: 1.0,
            visible: true,
            props: Map::new(),
            children: Vec::new(),
            meta: ObjectMeta::default(),
            editing: false,
        }
    }

    /// A text box with the given content and font.
    #[must_use]
    pub fn text(text: &str, font_family: &str, font_size: f64, bounds: Rect) -> Self {
        let mut obj = Self::new(NativeKind::Text, bounds);
        obj.props.insert("text".into(), Value::from(text));
        obj.props.insert("fontFamily".into(), Value::from(font_family));
        obj.props.insert("fontSize".into(), Value::from(font_size));
        obj.props.insert("fill".into(), Value::from(DEFAULT_TEXT_COLOR));
        obj
    }

    /// An image sourced from `src`, optionally tied to a catalog asset.
    #[must_use]
    pub fn image(src: &str, asset_id: Option<&str>, bounds: Rect) -> Self {
        let mut obj = Self::new(NativeKind::Image, bounds);
        obj.props.insert("src".into(), Value::from(src));
        if let Some(asset_id) = asset_id {
            obj.props.insert("assetId".into(), Value::from(asset_id));
        }
        obj
    }

    /// A filled geometric shape.
    #[must_use]
    pub fn shape(kind: ShapeKind, fill: &str, bounds: Rect) -> Self {
        let mut obj = Self::new(NativeKind::from_shape_kind(kind), bounds);
        obj.props.insert("fill".into(), Value::from(fill));
        obj
    }

    /// A group containing `children`.
    #[must_use]
    pub fn group(children: Vec<SceneObject>, bounds: Rect) -> Self {
        let mut obj = Self::new(NativeKind::Group, bounds);
        obj.children = children;
        obj
    }

    #[must_use]
    pub fn layer_id(&self) -> Option<&str> {
        self.meta.layer_id.as_deref()
    }

    /// Layer type from explicit metadata, else inferred from the native kind.
    #[must_use]
    pub fn layer_type(&self) -> LayerType {
        self.meta
            .layer_type
            .unwrap_or_else(|| self.kind.inferred_layer_type())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.meta.locked
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        !self.visible
    }

    /// Whether double-tap may enter text editing on this object.
    #[must_use]
    pub fn is_editable_text(&self) -> bool {
        self.kind.is_text_like()
    }

    /// Unrotated geometry.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Axis-aligned bounding box including rotation.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        self.bounds().rotated_bounds(self.angle)
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.left = bounds.x;
        self.top = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    /// Typed view of the props bag.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.props)
    }
}

// =============================================================================
// PROPS
// =============================================================================

pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_FILL: &str = "#000000";
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Typed access to common props fields.
pub struct Props<'a> {
    value: &'a Map<String, Value>,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a Map<String, Value>) -> Self {
        Self { value }
    }

    fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    fn opt_str(&self, key: &str) -> Option<&'a str> {
        self.value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Text content. Empty string when absent.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.str_or("text", "")
    }

    #[must_use]
    pub fn font_family(&self) -> &'a str {
        self.str_or("fontFamily", DEFAULT_FONT_FAMILY)
    }

    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.value
            .get("fontSize")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Font weight as written by the host (`"bold"`, `"600"`, ...).
    #[must_use]
    pub fn font_weight(&self) -> Option<String> {
        match self.value.get("fontWeight") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn letter_spacing(&self) -> Option<f64> {
        self.value.get("letterSpacing").and_then(Value::as_f64)
    }

    /// Fill color; doubles as text color for text objects.
    #[must_use]
    pub fn fill(&self) -> &'a str {
        self.str_or("fill", DEFAULT_FILL)
    }

    #[must_use]
    pub fn stroke(&self) -> Option<&'a str> {
        self.opt_str("stroke")
    }

    /// Stroke width in design units. Defaults to `0.0` when absent.
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.value
            .get("strokeWidth")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn src(&self) -> &'a str {
        self.str_or("src", "")
    }

    #[must_use]
    pub fn asset_id(&self) -> Option<&'a str> {
        self.opt_str("assetId")
    }

    #[must_use]
    pub fn asset_source(&self) -> Option<&'a str> {
        self.opt_str("assetSource")
    }
}

// =============================================================================
// SCENE STORE
// =============================================================================

/// Change notification emitted by every [`Scene`] mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    Added(Option<LayerId>),
    Removed(Option<LayerId>),
    Modified(LayerId),
    Reordered(LayerId),
}

/// Where to move a layer in the stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Absolute index, clamped to the valid range.
    Index(usize),
    Forward,
    Backward,
    Front,
    Back,
}

/// Ordered store of live objects plus the current selection.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Option<LayerId>,
    events: Vec<SceneEvent>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in stacking order, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mutable access for metadata stamping. Emits no events.
    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.objects
            .iter()
            .position(|obj| obj.layer_id() == Some(id))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.layer_id() == Some(id))
    }

    /// Place an object on top of the stack.
    pub fn add(&mut self, obj: SceneObject) {
        self.events
            .push(SceneEvent::Added(obj.meta.layer_id.clone()));
        self.objects.push(obj);
    }

    /// Place an object at `index`, clamped to the stack size.
    pub fn insert_at(&mut self, index: usize, obj: SceneObject) {
        let index = index.min(self.objects.len());
        self.events
            .push(SceneEvent::Added(obj.meta.layer_id.clone()));
        self.objects.insert(index, obj);
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        let obj = self.objects.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.events
            .push(SceneEvent::Removed(obj.meta.layer_id.clone()));
        Some(obj)
    }

    /// Remove every object and drop the selection.
    pub fn clear(&mut self) {
        for obj in self.objects.drain(..) {
            self.events.push(SceneEvent::Removed(obj.meta.layer_id));
        }
        self.selected = None;
    }

    /// Apply `f` to the object with `id` and record a modification.
    /// Returns false if the object doesn't exist.
    pub fn modify<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut SceneObject),
    {
        let Some(obj) = self
            .objects
            .iter_mut()
            .find(|obj| obj.layer_id() == Some(id))
        else {
            return false;
        };
        f(obj);
        self.events.push(SceneEvent::Modified(id.to_string()));
        true
    }

    #[must_use]
    pub fn geometry(&self, id: &str) -> Option<Rect> {
        self.get(id).map(SceneObject::bounds)
    }

    pub fn set_geometry(&mut self, id: &str, bounds: Rect) -> bool {
        self.modify(id, |obj| obj.set_bounds(bounds))
    }

    pub fn set_angle(&mut self, id: &str, angle: f64) -> bool {
        self.modify(id, |obj| obj.angle = angle)
    }

    /// Move an object within the stacking order. Returns false if the object
    /// doesn't exist; a move to its current slot is still reported as a reorder.
    pub fn reorder(&mut self, id: &str, target: ReorderTarget) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let last = self.objects.len() - 1;
        let to = match target {
            ReorderTarget::Index(index) => index.min(last),
            ReorderTarget::Forward => (from + 1).min(last),
            ReorderTarget::Backward => from.saturating_sub(1),
            ReorderTarget::Front => last,
            ReorderTarget::Back => 0,
        };
        let obj = self.objects.remove(from);
        self.objects.insert(to, obj);
        self.events.push(SceneEvent::Reordered(id.to_string()));
        true
    }

    /// Currently selected layer id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select an object by id, or clear the selection with `None`.
    /// Unknown ids clear the selection.
    pub fn set_selection(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.index_of(id).is_some())
            .map(str::to_string);
    }

    /// The selected object, if any.
    #[must_use]
    pub fn active_object(&self) -> Option<&SceneObject> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Drain pending change notifications.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether any change notification is pending.
    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}
