//! Touch gesture recognizer: raw pointer events to editing intents.
//!
//! DESIGN
//! ======
//! A per-canvas state machine (`Idle`, `OneTouch`, `TwoTouch`) fed with
//! pointer events that carry their own timestamp. Nothing here reads a clock:
//! the long-press deadline is checked at the start of every event and by
//! `poll(now)`, so hosts drive it from their frame loop and tests drive it
//! with plain numbers.
//!
//! Two-finger input pinches the viewport and, when an unlocked object is
//! selected, rotates it in fixed steps. Single-finger releases are read as
//! taps (double-tap enters text editing), swipes (only with nothing
//! selected), or swallowed after a long-press. The last release of a
//! multi-touch sequence is never read as a tap or swipe.
//!
//! Mouse and pen input is ignored; the host's native drag handling owns it.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use tracing::debug;

use crate::camera::{Camera, Point};
use crate::config::GestureConfig;
use crate::layer::LayerId;
use crate::scene::Scene;

pub type PointerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    Touch,
    Pen,
    Mouse,
    /// Hosts that cannot tell report this; treated as touch.
    Unknown,
}

impl PointerType {
    fn is_handled(self) -> bool {
        matches!(self, Self::Touch | Self::Unknown)
    }
}

/// One pointer sample in screen pixels, stamped with host time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub pointer_type: PointerType,
    pub position: Point,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Intents emitted for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureAction {
    /// Route subsequent events for this pointer to the canvas.
    CapturePointer(PointerId),
    /// A press held still past the deadline with nothing selected.
    LongPress { position: Point },
    Swipe(SwipeDirection),
    /// Double-tap on editable text; the object is now in editing mode.
    EnterTextEdit(LayerId),
    /// Pinch changed the camera; carries the new state.
    ViewportChanged(Camera),
    ObjectRotated { id: LayerId, angle: f64 },
}

/// Everything captured when the second finger lands.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchFrame {
    pub start_distance: f64,
    pub start_angle: f64,
    pub start_midpoint: Point,
    pub camera: Camera,
    /// Selected object and its rotation at gesture start.
    pub object: Option<(LayerId, f64)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    OneTouch,
    TwoTouch(PinchFrame),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    /// Armed only when nothing was selected at press time.
    long_press_deadline: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Tap {
    position: Point,
    time_ms: f64,
}

#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    /// Active pointers in press order with their last screen position.
    pointers: Vec<(PointerId, Point)>,
    state: GestureState,
    press: Option<Press>,
    long_press_fired: bool,
    multi_touch: bool,
    last_tap: Option<Tap>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self { config, ..Self::default() }
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    pub fn pointer_down(&mut self, ev: &PointerEvent, scene: &mut Scene, camera: &mut Camera) -> Vec<GestureAction> {
        if !ev.pointer_type.is_handled() {
            return Vec::new();
        }
        let mut actions = self.poll(ev.time_ms);
        self.set_pointer(ev.pointer_id, ev.position);
        actions.push(GestureAction::CapturePointer(ev.pointer_id));

        match self.pointers.len() {
            1 => {
                self.state = GestureState::OneTouch;
                self.long_press_fired = false;
                self.multi_touch = false;
                let deadline = scene
                    .selection()
                    .is_none()
                    .then(|| ev.time_ms + self.config.long_press_ms);
                self.press = Some(Press { origin: ev.position, long_press_deadline: deadline });
            }
            2 => {
                self.cancel_long_press();
                self.multi_touch = true;
                self.state = self.pinch_frame(scene, camera);
            }
            _ => self.multi_touch = true,
        }
        actions
    }

    pub fn pointer_move(&mut self, ev: &PointerEvent, scene: &mut Scene, camera: &mut Camera) -> Vec<GestureAction> {
        if !ev.pointer_type.is_handled() {
            return Vec::new();
        }
        let mut actions = self.poll(ev.time_ms);
        if !self.update_pointer(ev.pointer_id, ev.position) {
            return actions;
        }

        if self.state == GestureState::OneTouch {
            if let Some(press) = self.press {
                if press.long_press_deadline.is_some()
                    && press.origin.distance(ev.position) > self.config.tap_tolerance_px
                {
                    self.cancel_long_press();
                }
            }
        } else if let GestureState::TwoTouch(frame) = &self.state {
            if self.pointers.len() == 2 {
                let frame = frame.clone();
                self.apply_pinch(&frame, scene, camera, &mut actions);
            }
        }
        actions
    }

    pub fn pointer_up(&mut self, ev: &PointerEvent, scene: &mut Scene, camera: &mut Camera) -> Vec<GestureAction> {
        if !ev.pointer_type.is_handled() {
            return Vec::new();
        }
        let mut actions = self.poll(ev.time_ms);
        if !self.remove_pointer(ev.pointer_id) {
            return actions;
        }

        if self.pointers.is_empty() {
            if !self.multi_touch && !self.long_press_fired {
                self.interpret_release(ev, scene, &mut actions);
            }
            self.reset_session();
        } else {
            self.settle_after_release(scene, camera);
        }
        actions
    }

    /// Drop a pointer the platform cancelled. Nothing is interpreted.
    pub fn pointer_cancel(&mut self, ev: &PointerEvent, scene: &mut Scene, camera: &mut Camera) {
        if !self.remove_pointer(ev.pointer_id) {
            return;
        }
        if self.pointers.is_empty() {
            self.reset_session();
        } else {
            self.settle_after_release(scene, camera);
        }
    }

    /// Fire a long-press whose deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> Vec<GestureAction> {
        let Some(press) = self.press else {
            return Vec::new();
        };
        let due = press
            .long_press_deadline
            .is_some_and(|deadline| now_ms >= deadline);
        if !due || self.state != GestureState::OneTouch {
            return Vec::new();
        }
        self.cancel_long_press();
        self.long_press_fired = true;
        debug!(x = press.origin.x, y = press.origin.y, "long press");
        vec![GestureAction::LongPress { position: press.origin }]
    }

    // =========================================================================
    // INTERPRETATION
    // =========================================================================

    fn interpret_release(&mut self, ev: &PointerEvent, scene: &mut Scene, actions: &mut Vec<GestureAction>) {
        let Some(press) = self.press else {
            return;
        };
        let tolerance = self.config.tap_tolerance_px;

        if press.origin.distance(ev.position) <= tolerance {
            let is_double = self.last_tap.is_some_and(|tap| {
                tap.position.distance(ev.position) <= tolerance
                    && ev.time_ms - tap.time_ms <= self.config.double_tap_window_ms
            });
            if is_double {
                self.last_tap = None;
                if let Some(id) = enter_text_edit(scene) {
                    actions.push(GestureAction::EnterTextEdit(id));
                }
            } else {
                self.last_tap = Some(Tap { position: ev.position, time_ms: ev.time_ms });
            }
            return;
        }

        if scene.selection().is_some() {
            return;
        }
        let dx = ev.position.x - press.origin.x;
        let dy = ev.position.y - press.origin.y;
        if dx.abs() >= self.config.swipe_min_distance_px && dy.abs() < self.config.swipe_max_drift_px {
            let direction = if dx < 0.0 { SwipeDirection::Left } else { SwipeDirection::Right };
            debug!(?direction, dx, dy, "swipe");
            actions.push(GestureAction::Swipe(direction));
        }
    }

    fn apply_pinch(&self, frame: &PinchFrame, scene: &mut Scene, camera: &mut Camera, actions: &mut Vec<GestureAction>) {
        let (a, b) = (self.pointers[0].1, self.pointers[1].1);
        let distance = a.distance(b);
        let midpoint = a.midpoint(b);

        if frame.start_distance > f64::EPSILON {
            let zoom = frame.camera.zoom * (distance / frame.start_distance);
            let zoom = frame
                .camera
                .clamp_zoom(zoom, self.config.min_zoom_factor, self.config.max_zoom_factor);
            let anchor = frame.camera.screen_to_world(frame.start_midpoint);
            camera.zoom = zoom;
            camera.pan_x = midpoint.x - anchor.x * zoom;
            camera.pan_y = midpoint.y - anchor.y * zoom;
            actions.push(GestureAction::ViewportChanged(*camera));
        }

        let Some((id, start_rotation)) = &frame.object else {
            return;
        };
        let Some(obj) = scene.get(id) else {
            return;
        };
        if obj.is_locked() || obj.editing {
            return;
        }
        let delta = normalize_delta(a.angle_to_deg(b) - frame.start_angle);
        let angle = snap_angle(start_rotation + delta, self.config.rotation_snap_deg);
        if angle != obj.angle && scene.set_angle(id, angle) {
            actions.push(GestureAction::ObjectRotated { id: id.clone(), angle });
        }
    }

    // =========================================================================
    // SESSION BOOKKEEPING
    // =========================================================================

    fn pinch_frame(&self, scene: &Scene, camera: &Camera) -> GestureState {
        let (a, b) = (self.pointers[0].1, self.pointers[1].1);
        let object = scene
            .active_object()
            .and_then(|obj| obj.layer_id().map(|id| (id.to_string(), obj.angle)));
        GestureState::TwoTouch(PinchFrame {
            start_distance: a.distance(b),
            start_angle: a.angle_to_deg(b),
            start_midpoint: a.midpoint(b),
            camera: *camera,
            object,
        })
    }

    /// State after a pointer leaves while others remain.
    fn settle_after_release(&mut self, scene: &Scene, camera: &Camera) {
        self.state = if self.pointers.len() >= 2 {
            self.pinch_frame(scene, camera)
        } else {
            GestureState::OneTouch
        };
    }

    fn reset_session(&mut self) {
        self.state = GestureState::Idle;
        self.press = None;
        self.long_press_fired = false;
        self.multi_touch = false;
    }

    fn cancel_long_press(&mut self) {
        if let Some(press) = &mut self.press {
            press.long_press_deadline = None;
        }
    }

    fn set_pointer(&mut self, id: PointerId, position: Point) {
        if !self.update_pointer(id, position) {
            self.pointers.push((id, position));
        }
    }

    fn update_pointer(&mut self, id: PointerId, position: Point) -> bool {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => {
                entry.1 = position;
                true
            }
            None => false,
        }
    }

    fn remove_pointer(&mut self, id: PointerId) -> bool {
        let before = self.pointers.len();
        self.pointers.retain(|(pid, _)| *pid != id);
        self.pointers.len() != before
    }
}

/// Put the selected text object into editing mode, returning its id.
fn enter_text_edit(scene: &mut Scene) -> Option<LayerId> {
    let id = scene.selection()?.to_string();
    let obj = scene
        .objects_mut()
        .iter_mut()
        .find(|obj| obj.layer_id() == Some(id.as_str()))?;
    if !obj.is_editable_text() || obj.editing {
        return None;
    }
    obj.editing = true;
    debug!(layer_id = %id, "enter text edit");
    Some(id)
}

/// Map an angle difference into (-180, 180].
fn normalize_delta(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

fn snap_angle(angle: f64, step: f64) -> f64 {
    if step > 0.0 { (angle / step).round() * step } else { angle }
}
