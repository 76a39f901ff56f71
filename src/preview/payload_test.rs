#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::layer::ShapeKind;
use crate::preview::types::Resolution;
use crate::scene::{NativeKind, ReorderTarget};

fn area() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 300.0)
}

fn with_id(mut obj: SceneObject, id: &str) -> SceneObject {
    obj.meta.layer_id = Some(id.into());
    obj
}

fn text(id: &str, content: &str) -> SceneObject {
    with_id(SceneObject::text(content, "Inter", 32.0, Rect::new(10.0, 10.0, 100.0, 40.0)), id)
}

fn request(layers: Vec<PreviewLayer>) -> PreviewRequest {
    PreviewRequest { product_id: "mug".into(), design_area: area(), resolution: Resolution::Draft, layers }
}

// =============================================================
// serialize_preview_layers
// =============================================================

#[test]
fn single_text_layer_scenario() {
    let mut scene = Scene::new();
    scene.add(text("t", "Hi"));
    let layers = serialize_preview_layers(&scene);
    assert_eq!(layers.len(), 1);
    assert!(matches!(&layers[0].content, LayerContent::Text(t) if t.text == "Hi"));

    scene.modify("t", |obj| obj.visible = false);
    assert!(serialize_preview_layers(&scene).is_empty());
}

#[test]
fn geometry_is_rounded_and_rotation_clamped() {
    let mut scene = Scene::new();
    let mut obj = with_id(SceneObject::shape(ShapeKind::Rect, "#f00", Rect::new(10.4, 10.6, 99.5, 40.49)), "s");
    obj.angle = 725.0;
    obj.opacity = 0.5;
    scene.add(obj);
    let layer = &serialize_preview_layers(&scene)[0];
    assert_eq!((layer.x, layer.y, layer.width, layer.height), (10, 11, 100, 40));
    assert_eq!(layer.rotation, 360);
    assert_eq!(layer.opacity, 50);
}

#[test]
fn fractional_rotation_is_rounded() {
    let mut scene = Scene::new();
    let mut obj = with_id(SceneObject::shape(ShapeKind::Rect, "#f00", area()), "s");
    obj.angle = 12.7;
    scene.add(obj);
    let first = serialize_preview_layers(&scene);
    assert_eq!(first[0].rotation, 13);

    scene.objects_mut()[0].angle = 13.2;
    let jittered = serialize_preview_layers(&scene);
    assert_eq!(cache_key(&request(first)), cache_key(&request(jittered)));
}

#[test]
fn incomplete_objects_are_excluded() {
    let mut scene = Scene::new();
    scene.add(text("blank", "   "));
    scene.add(with_id(SceneObject::image("a.png", None, area()), "no-asset"));
    scene.add(with_id(SceneObject::group(vec![text("child", "x")], area()), "group"));
    scene.add(SceneObject::text("no id", "Inter", 12.0, area()));
    scene.add(with_id(SceneObject::image("b.png", Some("asset-1"), area()), "ok"));
    let layers = serialize_preview_layers(&scene);
    let ids: Vec<&str> = layers.iter().map(|l| l.layer_id.as_str()).collect();
    assert_eq!(ids, vec!["ok"]);
}

#[test]
fn text_is_trimmed_and_styled() {
    let mut scene = Scene::new();
    let mut obj = text("t", "  Hello  ");
    obj.props.insert("fontWeight".into(), json!("bold"));
    obj.props.insert("fill".into(), json!("#123456"));
    scene.add(obj);
    let LayerContent::Text(content) = &serialize_preview_layers(&scene)[0].content else {
        panic!("expected text");
    };
    assert_eq!(content.text, "Hello");
    assert_eq!(content.font_weight.as_deref(), Some("bold"));
    assert_eq!(content.color, "#123456");
}

#[test]
fn shapes_carry_kind_and_stroke() {
    let mut scene = Scene::new();
    let mut obj = with_id(SceneObject::new(NativeKind::Circle, area()), "c");
    obj.props.insert("fill".into(), json!("#00ff00"));
    obj.props.insert("stroke".into(), json!("#000"));
    obj.props.insert("strokeWidth".into(), json!(2.0));
    scene.add(obj);
    let LayerContent::Shape(shape) = &serialize_preview_layers(&scene)[0].content else {
        panic!("expected shape");
    };
    assert_eq!(shape.shape_kind, ShapeKind::Circle);
    assert_eq!(shape.stroke.as_deref(), Some("#000"));
    assert_eq!(shape.stroke_width, 2.0);
}

#[test]
fn z_index_follows_stack_position_over_stale_meta() {
    let mut scene = Scene::new();
    let mut a = text("a", "A");
    a.meta.z_index = Some(0);
    let mut b = text("b", "B");
    b.meta.z_index = Some(1);
    scene.add(a);
    scene.add(b);
    scene.reorder("b", ReorderTarget::Back);
    let layers = serialize_preview_layers(&scene);
    let z: Vec<(&str, i64)> = layers
        .iter()
        .map(|l| (l.layer_id.as_str(), l.z_index))
        .collect();
    assert_eq!(z, vec![("b", 0), ("a", 1)]);
}

// =============================================================
// cache_key
// =============================================================

#[test]
fn cache_key_ignores_layer_order() {
    let mut scene = Scene::new();
    scene.add(text("a", "A"));
    scene.add(text("b", "B"));
    scene.add(text("c", "C"));
    let layers = serialize_preview_layers(&scene);
    let mut reversed = layers.clone();
    reversed.reverse();
    assert_eq!(cache_key(&request(layers)), cache_key(&request(reversed)));
}

#[test]
fn cache_key_tracks_content() {
    let mut scene = Scene::new();
    scene.add(text("a", "A"));
    let base = request(serialize_preview_layers(&scene));

    let mut high = base.clone();
    high.resolution = Resolution::High;
    assert_ne!(cache_key(&base), cache_key(&high));

    let mut other_product = base.clone();
    other_product.product_id = "shirt".into();
    assert_ne!(cache_key(&base), cache_key(&other_product));

    let mut moved = base.clone();
    moved.layers[0].x += 1;
    assert_ne!(cache_key(&base), cache_key(&moved));
}

#[test]
fn canonical_json_sorts_keys_recursively() {
    let value = json!({ "b": 1, "a": { "z": [ { "y": 1, "x": 2 } ], "c": "s" } });
    assert_eq!(canonical_json(&value), r#"{"a":{"c":"s","z":[{"x":2,"y":1}]},"b":1}"#);
}

#[test]
fn fnv1a_known_vectors() {
    assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
}
