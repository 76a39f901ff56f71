#![allow(clippy::float_cmp)]

use super::*;
use crate::layer::ShapeKind;
use crate::scene::SceneObject;

const THRESHOLD_PX: f64 = 8.0;

fn design_area() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 500.0)
}

fn shape(id: &str, bounds: Rect) -> SceneObject {
    let mut obj = SceneObject::shape(ShapeKind::Rect, "#fff", bounds);
    obj.meta.layer_id = Some(id.into());
    obj
}

// =============================================================
// Target collection
// =============================================================

#[test]
fn collect_skips_hidden_and_excluded() {
    let mut scene = Scene::new();
    scene.add(shape("moving", Rect::new(10.0, 10.0, 50.0, 50.0)));
    scene.add(shape("other", Rect::new(200.0, 200.0, 50.0, 50.0)));
    let mut hidden = shape("hidden", Rect::new(300.0, 300.0, 20.0, 20.0));
    hidden.visible = false;
    scene.add(hidden);

    let targets = SnapTargets::collect(design_area(), &scene, "moving");
    assert_eq!(targets.len(), 2);
}

// =============================================================
// Move
// =============================================================

#[test]
fn left_edge_snaps_to_design_area() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let result = targets.snap_move(Rect::new(5.0, 137.0, 60.0, 40.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(-5.0));
    assert_eq!(result.dy, None);
    assert_eq!(result.guides.len(), 1);
    assert_eq!(result.guides[0].orientation, Orientation::Vertical);
    assert_eq!(result.guides[0].position, 0.0);
    assert_eq!((result.guides[0].start, result.guides[0].end), (0.0, 500.0));
}

#[test]
fn centers_align() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    // Moving center sits exactly on the design-area center line.
    let result = targets.snap_move(Rect::new(167.0, 300.0, 66.0, 10.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(0.0));
    let result = targets.snap_move(Rect::new(164.0, 300.0, 66.0, 10.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(3.0));
}

#[test]
fn beyond_threshold_leaves_axis_alone() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let result = targets.snap_move(Rect::new(20.0, 120.0, 60.0, 40.0), THRESHOLD_PX, 1.0);
    assert!(result.is_empty());
    assert!(result.guides.is_empty());
    assert_eq!(result.offset(), (0.0, 0.0));
}

#[test]
fn offset_reads_missing_axis_as_zero() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let result = targets.snap_move(Rect::new(5.0, 137.0, 60.0, 40.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.offset(), (-5.0, 0.0));
}

#[test]
fn threshold_scales_with_zoom() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let moving = Rect::new(12.0, 120.0, 60.0, 40.0);
    assert!(targets.snap_move(moving, THRESHOLD_PX, 1.0).dx.is_none());
    // At half zoom 8px on screen covers 16 design units.
    assert_eq!(targets.snap_move(moving, THRESHOLD_PX, 0.5).dx, Some(-12.0));
}

#[test]
fn closest_candidate_wins() {
    let targets = SnapTargets::from_rects(vec![
        design_area(),
        Rect::new(103.0, 300.0, 50.0, 50.0),
    ]);
    // Right edge of moving = 105; object left edge 103 is closer than anything else.
    let result = targets.snap_move(Rect::new(55.0, 50.0, 50.0, 20.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(-2.0));
    let guide = result.guides[0];
    assert_eq!(guide.position, 103.0);
    assert_eq!((guide.start, guide.end), (50.0, 350.0));
}

#[test]
fn ties_go_to_first_target() {
    let targets = SnapTargets::from_rects(vec![
        Rect::new(100.0, 0.0, 10.0, 10.0),
        Rect::new(104.0, 50.0, 10.0, 10.0),
    ]);
    // Left edge at 102 is 2 away from both 100 and 104.
    let result = targets.snap_move(Rect::new(102.0, 200.0, 30.0, 30.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(-2.0));
}

#[test]
fn axes_resolve_independently() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let result = targets.snap_move(Rect::new(3.0, 494.0, 50.0, 4.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(-3.0));
    assert_eq!(result.dy, Some(2.0));
    assert_eq!(result.guides.len(), 2);
    assert_eq!(result.guides[1].orientation, Orientation::Horizontal);
    assert_eq!(result.guides[1].position, 500.0);
}

#[test]
fn snapped_edges_coincide_exactly() {
    let other = Rect::new(150.0, 150.0, 80.0, 80.0);
    let targets = SnapTargets::from_rects(vec![other]);
    let moving = Rect::new(233.5, 20.0, 40.0, 40.0);
    let result = targets.snap_move(moving, THRESHOLD_PX, 1.0);
    let snapped_x = moving.x + result.dx.unwrap_or(0.0);
    assert_eq!(snapped_x, other.right());
}

#[test]
fn rotated_targets_use_bounding_box() {
    let mut scene = Scene::new();
    let mut rotated = shape("r", Rect::new(100.0, 100.0, 100.0, 20.0));
    rotated.angle = 90.0;
    scene.add(rotated);
    let targets = SnapTargets::collect(Rect::new(-1000.0, -1000.0, 1.0, 1.0), &scene, "none");
    // Rotated box spans x 140..160.
    let result = targets.snap_move(Rect::new(162.0, 400.0, 10.0, 10.0), THRESHOLD_PX, 1.0);
    let dx = result.dx.unwrap_or(f64::NAN);
    assert!((dx + 2.0).abs() < 1e-9);
}

// =============================================================
// Scale
// =============================================================

#[test]
fn scale_snaps_trailing_edges_only() {
    let targets = SnapTargets::from_rects(vec![design_area()]);
    let result = targets.snap_scale(Rect::new(3.0, 10.0, 394.0, 100.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dx, Some(3.0), "right edge grows to 400");
    assert_eq!(result.dy, None, "leading edges are anchored");
}

#[test]
fn scale_guides_span_resized_rect() {
    let targets = SnapTargets::from_rects(vec![Rect::new(0.0, 300.0, 100.0, 100.0)]);
    let result = targets.snap_scale(Rect::new(0.0, 0.0, 50.0, 296.0), THRESHOLD_PX, 1.0);
    assert_eq!(result.dy, Some(4.0));
    let guide = result.guides[result.guides.len() - 1];
    assert_eq!(guide.orientation, Orientation::Horizontal);
    assert_eq!((guide.start, guide.end), (0.0, 100.0));
}
