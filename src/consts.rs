//! Shared numeric constants for the design-canvas crate.

// ── History ─────────────────────────────────────────────────────

/// Default cap for both the undo and the redo stack.
pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 40;

// ── Snapping ────────────────────────────────────────────────────

/// On-screen snap distance in pixels; divided by zoom to get design units.
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 8.0;

// ── Gestures ────────────────────────────────────────────────────

/// Minimum horizontal travel for a one-finger swipe, in screen pixels.
pub const DEFAULT_SWIPE_MIN_DISTANCE_PX: f64 = 60.0;

/// Maximum vertical drift still accepted as a horizontal swipe.
pub const DEFAULT_SWIPE_MAX_DRIFT_PX: f64 = 40.0;

/// Hold time before a stationary press becomes a long-press.
pub const DEFAULT_LONG_PRESS_MS: f64 = 550.0;

/// Radius within which a press and release still count as a tap.
pub const DEFAULT_TAP_TOLERANCE_PX: f64 = 18.0;

/// Maximum gap between two taps forming a double-tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: f64 = 320.0;

/// Two-finger rotation snaps to multiples of this many degrees.
pub const DEFAULT_ROTATION_SNAP_DEG: f64 = 15.0;

/// Lower pinch-zoom bound as a multiple of the base scale.
pub const MIN_ZOOM_FACTOR: f64 = 0.25;

/// Upper pinch-zoom bound as a multiple of the base scale.
pub const MAX_ZOOM_FACTOR: f64 = 4.0;

// ── Preview ─────────────────────────────────────────────────────

/// Quiet period after the last edit before a preview is requested.
pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 1000;

/// Number of preview responses kept in the content-hash cache.
pub const DEFAULT_PREVIEW_CACHE_CAPACITY: usize = 50;

pub const DEFAULT_PREVIEW_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PREVIEW_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Preview geometry rotation is clamped to ±this many degrees.
pub const PREVIEW_ROTATION_LIMIT_DEG: f64 = 360.0;

// ── Layers ──────────────────────────────────────────────────────

/// Offset applied to a duplicated layer so the copy is visible.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Characters of text used when deriving a default layer name.
pub const LAYER_NAME_TEXT_CHARS: usize = 24;
