#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn rect() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 80.0)
}

fn with_id(mut obj: SceneObject, id: &str) -> SceneObject {
    obj.meta.layer_id = Some(id.to_string());
    obj
}

fn scene_with(ids: &[&str]) -> Scene {
    let mut scene = Scene::new();
    for id in ids {
        scene.add(with_id(SceneObject::shape(ShapeKind::Rect, "#fff", rect()), id));
    }
    scene.take_events();
    scene
}

fn order(scene: &Scene) -> Vec<&str> {
    scene
        .objects()
        .iter()
        .filter_map(SceneObject::layer_id)
        .collect()
}

// =============================================================
// NativeKind
// =============================================================

#[test]
fn inferred_layer_types() {
    assert_eq!(NativeKind::Text.inferred_layer_type(), LayerType::Text);
    assert_eq!(NativeKind::Image.inferred_layer_type(), LayerType::Image);
    assert_eq!(NativeKind::Group.inferred_layer_type(), LayerType::Group);
    assert_eq!(NativeKind::Rect.inferred_layer_type(), LayerType::Shape);
    assert_eq!(NativeKind::Path.inferred_layer_type(), LayerType::Shape);
}

#[test]
fn shape_kind_mapping_round_trips() {
    for kind in [ShapeKind::Rect, ShapeKind::Circle, ShapeKind::Polygon] {
        assert_eq!(NativeKind::from_shape_kind(kind).shape_kind(), kind);
    }
    assert_eq!(NativeKind::Path.shape_kind(), ShapeKind::Polygon);
}

// =============================================================
// SceneObject
// =============================================================

#[test]
fn explicit_layer_type_wins_over_inference() {
    let mut obj = SceneObject::image("a.png", None, rect());
    assert_eq!(obj.layer_type(), LayerType::Image);
    obj.meta.layer_type = Some(LayerType::Clipart);
    assert_eq!(obj.layer_type(), LayerType::Clipart);
}

#[test]
fn editing_flag_is_not_serialized() {
    let mut obj = SceneObject::text("Hi", "Inter", 32.0, rect());
    obj.editing = true;
    let value = serde_json::to_value(&obj).unwrap();
    assert!(value.get("editing").is_none());
    let back: SceneObject = serde_json::from_value(value).unwrap();
    assert!(!back.editing);
}

#[test]
fn deserialize_applies_defaults() {
    let obj: SceneObject = serde_json::from_value(json!({
        "kind": "rect", "left": 1, "top": 2, "width": 3, "height": 4
    }))
    .unwrap();
    assert_eq!(obj.opacity, 1.0);
    assert!(obj.visible);
    assert_eq!(obj.angle, 0.0);
    assert!(obj.meta.layer_id.is_none());
}

#[test]
fn bounding_box_accounts_for_rotation() {
    let mut obj = SceneObject::new(NativeKind::Rect, Rect::new(0.0, 0.0, 100.0, 20.0));
    obj.angle = 90.0;
    let bb = obj.bounding_box();
    assert!((bb.width - 20.0).abs() < 1e-9);
    assert!((bb.height - 100.0).abs() < 1e-9);
}

// =============================================================
// Props
// =============================================================

#[test]
fn props_defaults_when_absent() {
    let obj = SceneObject::new(NativeKind::Text, rect());
    let props = obj.props();
    assert_eq!(props.text(), "");
    assert_eq!(props.font_family(), DEFAULT_FONT_FAMILY);
    assert_eq!(props.font_size(), DEFAULT_FONT_SIZE);
    assert_eq!(props.fill(), DEFAULT_FILL);
    assert!(props.stroke().is_none());
    assert_eq!(props.stroke_width(), 0.0);
    assert!(props.asset_id().is_none());
    assert!(props.font_weight().is_none());
}

#[test]
fn props_read_values() {
    let mut obj = SceneObject::text("Hello", "Inter", 18.0, rect());
    obj.props.insert("fontWeight".into(), json!(700));
    obj.props.insert("letterSpacing".into(), json!(1.5));
    obj.props.insert("stroke".into(), json!(""));
    let props = obj.props();
    assert_eq!(props.text(), "Hello");
    assert_eq!(props.font_family(), "Inter");
    assert_eq!(props.font_size(), 18.0);
    assert_eq!(props.font_weight().as_deref(), Some("700"));
    assert_eq!(props.letter_spacing(), Some(1.5));
    assert!(props.stroke().is_none(), "empty stroke counts as absent");
}

// =============================================================
// Scene store
// =============================================================

#[test]
fn add_and_remove_emit_events() {
    let mut scene = Scene::new();
    scene.add(with_id(SceneObject::image("a.png", Some("a"), rect()), "a"));
    assert_eq!(scene.len(), 1);
    assert!(scene.remove("a").is_some());
    assert!(scene.is_empty());
    assert_eq!(
        scene.take_events(),
        vec![SceneEvent::Added(Some("a".into())), SceneEvent::Removed(Some("a".into()))]
    );
    assert!(!scene.has_pending_events());
}

#[test]
fn remove_unknown_is_noop() {
    let mut scene = scene_with(&["a"]);
    assert!(scene.remove("zzz").is_none());
    assert!(scene.take_events().is_empty());
}

#[test]
fn remove_clears_matching_selection() {
    let mut scene = scene_with(&["a", "b"]);
    scene.set_selection(Some("a"));
    scene.remove("a");
    assert!(scene.selection().is_none());
}

#[test]
fn set_selection_ignores_unknown_ids() {
    let mut scene = scene_with(&["a"]);
    scene.set_selection(Some("a"));
    assert_eq!(scene.selection(), Some("a"));
    scene.set_selection(Some("missing"));
    assert!(scene.selection().is_none());
}

#[test]
fn insert_at_clamps_index() {
    let mut scene = scene_with(&["a", "b"]);
    scene.insert_at(99, with_id(SceneObject::new(NativeKind::Rect, rect()), "c"));
    scene.insert_at(0, with_id(SceneObject::new(NativeKind::Rect, rect()), "z"));
    assert_eq!(order(&scene), vec!["z", "a", "b", "c"]);
}

#[test]
fn reorder_targets() {
    let mut scene = scene_with(&["a", "b", "c", "d"]);
    assert!(scene.reorder("a", ReorderTarget::Front));
    assert_eq!(order(&scene), vec!["b", "c", "d", "a"]);
    assert!(scene.reorder("d", ReorderTarget::Back));
    assert_eq!(order(&scene), vec!["d", "b", "c", "a"]);
    assert!(scene.reorder("b", ReorderTarget::Forward));
    assert_eq!(order(&scene), vec!["d", "c", "b", "a"]);
    assert!(scene.reorder("c", ReorderTarget::Backward));
    assert_eq!(order(&scene), vec!["c", "d", "b", "a"]);
    assert!(scene.reorder("a", ReorderTarget::Index(1)));
    assert_eq!(order(&scene), vec!["c", "a", "d", "b"]);
    assert!(scene.reorder("c", ReorderTarget::Index(50)));
    assert_eq!(order(&scene), vec!["a", "d", "b", "c"]);
}

#[test]
fn reorder_unknown_is_noop() {
    let mut scene = scene_with(&["a"]);
    assert!(!scene.reorder("x", ReorderTarget::Front));
    assert!(scene.take_events().is_empty());
}

#[test]
fn set_geometry_and_angle_modify() {
    let mut scene = scene_with(&["a"]);
    assert!(scene.set_geometry("a", Rect::new(5.0, 6.0, 7.0, 8.0)));
    assert!(scene.set_angle("a", 30.0));
    assert_eq!(scene.geometry("a"), Some(Rect::new(5.0, 6.0, 7.0, 8.0)));
    assert_eq!(scene.get("a").map(|o| o.angle), Some(30.0));
    assert_eq!(scene.take_events().len(), 2);
    assert!(!scene.set_angle("nope", 1.0));
}

#[test]
fn clear_removes_everything() {
    let mut scene = scene_with(&["a", "b"]);
    scene.set_selection(Some("b"));
    scene.clear();
    assert!(scene.is_empty());
    assert!(scene.selection().is_none());
    assert_eq!(scene.take_events().len(), 2);
}
