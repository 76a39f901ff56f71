//! Editor configuration parsed from environment variables.
//!
//! Every knob has a default; a missing or unparsable variable falls back to it
//! rather than failing, so an embedding can set only what it wants to change.
//! Hosts that configure per layout (phone vs tablet) build the sections in code
//! and skip the environment entirely.

use std::str::FromStr;

use crate::consts::{
    DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_HISTORY_MAX_ENTRIES, DEFAULT_LONG_PRESS_MS, DEFAULT_PREVIEW_CACHE_CAPACITY,
    DEFAULT_PREVIEW_CONNECT_TIMEOUT_SECS, DEFAULT_PREVIEW_DEBOUNCE_MS, DEFAULT_PREVIEW_REQUEST_TIMEOUT_SECS,
    DEFAULT_ROTATION_SNAP_DEG, DEFAULT_SNAP_THRESHOLD_PX, DEFAULT_SWIPE_MAX_DRIFT_PX, DEFAULT_SWIPE_MIN_DISTANCE_PX,
    DEFAULT_TAP_TOLERANCE_PX, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR,
};

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Cap applied independently to the undo and redo stacks.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: DEFAULT_HISTORY_MAX_ENTRIES }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    pub enabled: bool,
    /// Snap distance in screen pixels.
    pub threshold_px: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self { enabled: true, threshold_px: DEFAULT_SNAP_THRESHOLD_PX }
    }
}

/// Gesture thresholds. Distances are screen pixels, durations milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub swipe_min_distance_px: f64,
    pub swipe_max_drift_px: f64,
    pub long_press_ms: f64,
    pub tap_tolerance_px: f64,
    pub double_tap_window_ms: f64,
    pub rotation_snap_deg: f64,
    pub min_zoom_factor: f64,
    pub max_zoom_factor: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance_px: DEFAULT_SWIPE_MIN_DISTANCE_PX,
            swipe_max_drift_px: DEFAULT_SWIPE_MAX_DRIFT_PX,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            tap_tolerance_px: DEFAULT_TAP_TOLERANCE_PX,
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            rotation_snap_deg: DEFAULT_ROTATION_SNAP_DEG,
            min_zoom_factor: MIN_ZOOM_FACTOR,
            max_zoom_factor: MAX_ZOOM_FACTOR,
        }
    }
}

impl GestureConfig {
    /// Thresholds for a dense phone layout: shorter swipes, tighter taps.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            swipe_min_distance_px: 40.0,
            swipe_max_drift_px: 30.0,
            tap_tolerance_px: 12.0,
            ..Self::default()
        }
    }

    /// Thresholds for a tablet layout: longer swipes, looser taps.
    #[must_use]
    pub fn tablet() -> Self {
        Self {
            swipe_min_distance_px: 90.0,
            swipe_max_drift_px: 50.0,
            tap_tolerance_px: 24.0,
            double_tap_window_ms: 360.0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub debounce_ms: u64,
    pub cache_capacity: usize,
    /// Remote renderer endpoint. `None` until the host configures one.
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_PREVIEW_DEBOUNCE_MS,
            cache_capacity: DEFAULT_PREVIEW_CACHE_CAPACITY,
            endpoint: None,
            request_timeout_secs: DEFAULT_PREVIEW_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_PREVIEW_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Full per-canvas configuration handed to [`crate::engine::EditorCore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorConfig {
    pub history: HistoryConfig,
    pub snap: SnapConfig,
    pub gesture: GestureConfig,
    pub preview: PreviewConfig,
}

// =============================================================================
// LOADING
// =============================================================================

impl EditorConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DESIGN_HISTORY_MAX_ENTRIES`: default 40
    /// - `DESIGN_SNAP_ENABLED`: `true` (default) or `false`
    /// - `DESIGN_SNAP_THRESHOLD_PX`: default 8
    /// - `DESIGN_GESTURE_*`: see [`GestureConfig`]
    /// - `DESIGN_PREVIEW_DEBOUNCE_MS`: default 1000
    /// - `DESIGN_PREVIEW_CACHE_CAPACITY`: default 50
    /// - `DESIGN_PREVIEW_URL`: renderer endpoint, unset by default
    /// - `DESIGN_PREVIEW_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DESIGN_PREVIEW_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let history = HistoryConfig {
            max_entries: parse_or(&lookup, "DESIGN_HISTORY_MAX_ENTRIES", DEFAULT_HISTORY_MAX_ENTRIES).max(1),
        };

        let snap = SnapConfig {
            enabled: parse_bool_or(&lookup, "DESIGN_SNAP_ENABLED", true),
            threshold_px: parse_or(&lookup, "DESIGN_SNAP_THRESHOLD_PX", DEFAULT_SNAP_THRESHOLD_PX),
        };

        let defaults = GestureConfig::default();
        let gesture = GestureConfig {
            swipe_min_distance_px: parse_or(&lookup, "DESIGN_GESTURE_SWIPE_MIN_PX", defaults.swipe_min_distance_px),
            swipe_max_drift_px: parse_or(&lookup, "DESIGN_GESTURE_SWIPE_MAX_DRIFT_PX", defaults.swipe_max_drift_px),
            long_press_ms: parse_or(&lookup, "DESIGN_GESTURE_LONG_PRESS_MS", defaults.long_press_ms),
            tap_tolerance_px: parse_or(&lookup, "DESIGN_GESTURE_TAP_TOLERANCE_PX", defaults.tap_tolerance_px),
            double_tap_window_ms: parse_or(&lookup, "DESIGN_GESTURE_DOUBLE_TAP_MS", defaults.double_tap_window_ms),
            rotation_snap_deg: parse_or(&lookup, "DESIGN_GESTURE_ROTATION_SNAP_DEG", defaults.rotation_snap_deg),
            ..defaults
        };

        let preview = PreviewConfig {
            debounce_ms: parse_or(&lookup, "DESIGN_PREVIEW_DEBOUNCE_MS", DEFAULT_PREVIEW_DEBOUNCE_MS),
            cache_capacity: parse_or(&lookup, "DESIGN_PREVIEW_CACHE_CAPACITY", DEFAULT_PREVIEW_CACHE_CAPACITY).max(1),
            endpoint: lookup("DESIGN_PREVIEW_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            request_timeout_secs: parse_or(
                &lookup,
                "DESIGN_PREVIEW_REQUEST_TIMEOUT_SECS",
                DEFAULT_PREVIEW_REQUEST_TIMEOUT_SECS,
            ),
            connect_timeout_secs: parse_or(
                &lookup,
                "DESIGN_PREVIEW_CONNECT_TIMEOUT_SECS",
                DEFAULT_PREVIEW_CONNECT_TIMEOUT_SECS,
            ),
        };

        Self { history, snap, gesture, preview }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
