#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_empty_uses_defaults() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[]));
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.history.max_entries, 40);
    assert_eq!(cfg.preview.debounce_ms, 1000);
    assert!(cfg.snap.enabled);
    assert!(cfg.preview.endpoint.is_none());
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("DESIGN_HISTORY_MAX_ENTRIES", "12"),
        ("DESIGN_SNAP_ENABLED", "false"),
        ("DESIGN_SNAP_THRESHOLD_PX", "4.5"),
        ("DESIGN_GESTURE_DOUBLE_TAP_MS", "250"),
        ("DESIGN_GESTURE_ROTATION_SNAP_DEG", "45"),
        ("DESIGN_PREVIEW_DEBOUNCE_MS", "300"),
        ("DESIGN_PREVIEW_CACHE_CAPACITY", "5"),
        ("DESIGN_PREVIEW_URL", " https://render.example.test/preview/ "),
        ("DESIGN_PREVIEW_REQUEST_TIMEOUT_SECS", "9"),
    ]));
    assert_eq!(cfg.history.max_entries, 12);
    assert!(!cfg.snap.enabled);
    assert_eq!(cfg.snap.threshold_px, 4.5);
    assert_eq!(cfg.gesture.double_tap_window_ms, 250.0);
    assert_eq!(cfg.gesture.rotation_snap_deg, 45.0);
    assert_eq!(cfg.preview.debounce_ms, 300);
    assert_eq!(cfg.preview.cache_capacity, 5);
    assert_eq!(cfg.preview.endpoint.as_deref(), Some("https://render.example.test/preview"));
    assert_eq!(cfg.preview.request_timeout_secs, 9);
    assert_eq!(cfg.preview.connect_timeout_secs, 10);
}

#[test]
fn from_lookup_invalid_values_fall_back() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("DESIGN_HISTORY_MAX_ENTRIES", "lots"),
        ("DESIGN_SNAP_ENABLED", "maybe"),
        ("DESIGN_GESTURE_LONG_PRESS_MS", ""),
        ("DESIGN_PREVIEW_URL", "   "),
    ]));
    assert_eq!(cfg.history.max_entries, 40);
    assert!(cfg.snap.enabled);
    assert_eq!(cfg.gesture.long_press_ms, 550.0);
    assert!(cfg.preview.endpoint.is_none());
}

#[test]
fn zero_capacities_are_raised_to_one() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("DESIGN_HISTORY_MAX_ENTRIES", "0"),
        ("DESIGN_PREVIEW_CACHE_CAPACITY", "0"),
    ]));
    assert_eq!(cfg.history.max_entries, 1);
    assert_eq!(cfg.preview.cache_capacity, 1);
}

#[test]
fn gesture_presets_differ_from_default() {
    let base = GestureConfig::default();
    let compact = GestureConfig::compact();
    let tablet = GestureConfig::tablet();
    assert!(compact.swipe_min_distance_px < base.swipe_min_distance_px);
    assert!(tablet.swipe_min_distance_px > base.swipe_min_distance_px);
    assert!(compact.tap_tolerance_px < tablet.tap_tolerance_px);
    assert_eq!(compact.rotation_snap_deg, base.rotation_snap_deg);
}
