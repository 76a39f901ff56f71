//! Per-canvas editor context.
//!
//! `EditorCore` owns the scene, camera, history, gesture recognizer and the
//! guides of the current interaction. Hosts forward layer-panel actions and
//! pointer events here and render whatever the scene contains afterwards.
//!
//! Every mutating operation ends in `sync`, which drains the scene's event
//! feed and records a renormalized snapshot unless a history restore is in
//! progress. Unknown layer ids are no-ops that return `false`/`None`.

use tracing::{debug, info};

use crate::camera::{Camera, Rect};
use crate::codec::{self, RestoreReport};
use crate::config::EditorConfig;
use crate::consts::DUPLICATE_OFFSET;
use crate::gesture::{GestureAction, GestureRecognizer, PointerEvent};
use crate::history::HistoryEngine;
use crate::layer::{Layer, LayerId};
use crate::preview::PreviewInput;
use crate::scene::{ReorderTarget, Scene, SceneObject};
use crate::snap::{GuideLine, SnapResult, SnapTargets};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Core editor state for one canvas.
pub struct EditorCore {
    pub scene: Scene,
    pub camera: Camera,
    history: HistoryEngine,
    gestures: GestureRecognizer,
    config: EditorConfig,
    design_area: Rect,
    guides: Vec<GuideLine>,
    /// Snap targets captured when the current drag or resize began.
    interaction: Option<(LayerId, SnapTargets)>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Rect::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new(config: EditorConfig, design_area: Rect) -> Self {
        let mut history = HistoryEngine::new(config.history);
        history.reset(Vec::new());
        Self {
            scene: Scene::new(),
            camera: Camera::default(),
            history,
            gestures: GestureRecognizer::new(config.gesture),
            config,
            design_area,
            guides: Vec::new(),
            interaction: None,
        }
    }

    /// Editor with default configuration around `design_area`.
    #[must_use]
    pub fn with_defaults(design_area: Rect) -> Self {
        Self::new(EditorConfig::default(), design_area)
    }

    // --- Persistence ---

    /// Replace the scene with `layers` and start a fresh history from the
    /// result. Layers that fail to restore are skipped and counted.
    pub fn load_layers(&mut self, layers: &[Layer]) -> RestoreReport {
        let (objects, report) = codec::restore_layers(layers);
        self.scene.clear();
        for obj in objects {
            self.scene.add(obj);
        }
        self.scene.take_events();
        self.clear_interaction();
        self.history.reset(codec::serialize_scene(&mut self.scene));
        info!(restored = report.restored, total = report.total, "layers loaded");
        report
    }

    /// Serialize every object, zIndex equal to its stacking index.
    pub fn layers(&mut self) -> Vec<Layer> {
        codec::serialize_scene(&mut self.scene)
    }

    /// Payload for the preview pipeline from the current scene.
    #[must_use]
    pub fn preview_input(&self, product_id: &str) -> PreviewInput {
        PreviewInput::from_scene(product_id, self.design_area, &self.scene)
    }

    // --- Layer panel ---

    /// Place `obj` on top of the stack, stamping an id if it has none.
    pub fn add_object(&mut self, mut obj: SceneObject) -> LayerId {
        let id = codec::ensure_layer_id(&mut obj);
        self.scene.add(obj);
        self.sync();
        id
    }

    pub fn remove_layer(&mut self, id: &str) -> bool {
        if self.scene.remove(id).is_none() {
            debug!(%id, "remove: unknown layer");
            return false;
        }
        self.sync();
        true
    }

    /// Copy a layer with a fresh identity, offset so it is visible, and place
    /// it directly above the source. Returns the new id.
    pub fn duplicate_layer(&mut self, id: &str) -> Option<LayerId> {
        let Some(index) = self.scene.index_of(id) else {
            debug!(%id, "duplicate: unknown layer");
            return None;
        };
        let mut copy = codec::clone_with_new_identity(&self.scene.objects()[index]);
        copy.left += DUPLICATE_OFFSET;
        copy.top += DUPLICATE_OFFSET;
        copy.meta.layer_name = copy.meta.layer_name.map(|name| format!("{name} copy"));
        let new_id = codec::ensure_layer_id(&mut copy);
        self.scene.insert_at(index + 1, copy);
        self.sync();
        Some(new_id)
    }

    pub fn reorder_layer(&mut self, id: &str, target: ReorderTarget) -> bool {
        if !self.scene.reorder(id, target) {
            debug!(%id, ?target, "reorder: unknown layer");
            return false;
        }
        self.sync();
        true
    }

    pub fn set_layer_hidden(&mut self, id: &str, hidden: bool) -> bool {
        self.modify_layer(id, "hide", |obj| obj.visible = !hidden)
    }

    pub fn set_layer_locked(&mut self, id: &str, locked: bool) -> bool {
        self.modify_layer(id, "lock", |obj| obj.meta.locked = locked)
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim().to_string();
        self.modify_layer(id, "rename", |obj| obj.meta.layer_name = Some(name))
    }

    /// Commit edited text and leave editing mode.
    pub fn commit_text(&mut self, id: &str, text: &str) -> bool {
        let text = text.to_string();
        self.modify_layer(id, "commit text", |obj| {
            obj.props.insert("text".into(), text.into());
            obj.editing = false;
        })
    }

    /// Select a layer, or clear the selection with `None`. Returns whether
    /// the selection now matches the request.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.scene.set_selection(id);
        let matched = self.scene.selection() == id;
        if !matched {
            debug!(?id, "select: unknown layer");
        }
        matched
    }

    // --- Interaction ---

    /// Move an object by `(dx, dy)` design units, snapping to the design area
    /// and other objects. Locked objects refuse to move.
    pub fn drag_object(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        let Some(obj) = self.scene.get(id) else {
            debug!(%id, "drag: unknown layer");
            return false;
        };
        if obj.is_locked() {
            debug!(%id, "drag: layer is locked");
            return false;
        }
        let bbox = obj.bounding_box();
        let moving = Rect::new(bbox.x + dx, bbox.y + dy, bbox.width, bbox.height);
        let snap = self.snap_with(id, |targets, threshold, zoom| targets.snap_move(moving, threshold, zoom));
        let (snap_dx, snap_dy) = snap.offset();
        let (sx, sy) = (dx + snap_dx, dy + snap_dy);
        self.guides = snap.guides;
        self.scene.modify(id, |obj| {
            obj.left += sx;
            obj.top += sy;
        });
        self.sync();
        true
    }

    /// Resize an object from its top-left anchor, snapping the trailing
    /// edges. Locked objects refuse to resize.
    pub fn scale_object(&mut self, id: &str, width: f64, height: f64) -> bool {
        let Some(obj) = self.scene.get(id) else {
            debug!(%id, "scale: unknown layer");
            return false;
        };
        if obj.is_locked() {
            debug!(%id, "scale: layer is locked");
            return false;
        }
        let scaling = Rect::new(obj.left, obj.top, width.max(0.0), height.max(0.0));
        let snap = self.snap_with(id, |targets, threshold, zoom| targets.snap_scale(scaling, threshold, zoom));
        let (snap_dw, snap_dh) = snap.offset();
        let bounds = Rect::new(scaling.x, scaling.y, scaling.width + snap_dw, scaling.height + snap_dh);
        self.guides = snap.guides;
        self.scene.set_geometry(id, bounds);
        self.sync();
        true
    }

    /// Drop guides and captured snap targets at the end of a drag or resize.
    pub fn end_interaction(&mut self) {
        self.clear_interaction();
    }

    #[must_use]
    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    fn snap_with<F>(&mut self, id: &str, snap: F) -> SnapResult
    where
        F: FnOnce(&SnapTargets, f64, f64) -> SnapResult,
    {
        if !self.config.snap.enabled {
            return SnapResult::default();
        }
        let stale = self
            .interaction
            .as_ref()
            .is_none_or(|(current, _)| current != id);
        if stale {
            let targets = SnapTargets::collect(self.design_area, &self.scene, id);
            self.interaction = Some((id.to_string(), targets));
        }
        match &self.interaction {
            Some((_, targets)) => snap(targets, self.config.snap.threshold_px, self.camera.zoom),
            None => SnapResult::default(),
        }
    }

    fn clear_interaction(&mut self) {
        self.guides.clear();
        self.interaction = None;
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_snapshot(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_snapshot(&snapshot);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    /// Call once per rendered frame; ends any history restore.
    pub fn on_frame_tick(&mut self) {
        self.history.on_frame_tick();
    }

    fn apply_snapshot(&mut self, snapshot: &[Layer]) {
        self.history.begin_restore();
        let selected = self.scene.selection().map(str::to_string);
        let (objects, report) = codec::restore_layers(snapshot);
        self.scene.clear();
        for obj in objects {
            self.scene.add(obj);
        }
        self.scene.set_selection(selected.as_deref());
        self.clear_interaction();
        if !report.is_complete() {
            info!(%report, "history restore incomplete");
        }
        self.sync();
    }

    // --- Gestures ---

    pub fn pointer_down(&mut self, ev: &PointerEvent) -> Vec<GestureAction> {
        let actions = self.gestures.pointer_down(ev, &mut self.scene, &mut self.camera);
        self.sync();
        actions
    }

    pub fn pointer_move(&mut self, ev: &PointerEvent) -> Vec<GestureAction> {
        let actions = self.gestures.pointer_move(ev, &mut self.scene, &mut self.camera);
        self.sync();
        actions
    }

    pub fn pointer_up(&mut self, ev: &PointerEvent) -> Vec<GestureAction> {
        let actions = self.gestures.pointer_up(ev, &mut self.scene, &mut self.camera);
        self.sync();
        actions
    }

    pub fn pointer_cancel(&mut self, ev: &PointerEvent) {
        self.gestures.pointer_cancel(ev, &mut self.scene, &mut self.camera);
        self.sync();
    }

    /// Fire a due long-press. Hosts call this from their frame loop.
    pub fn poll_gestures(&mut self, now_ms: f64) -> Vec<GestureAction> {
        self.gestures.poll(now_ms)
    }

    #[must_use]
    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.scene.selection()
    }

    #[must_use]
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    #[must_use]
    pub fn design_area(&self) -> Rect {
        self.design_area
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Internals ---

    fn modify_layer<F>(&mut self, id: &str, op: &str, f: F) -> bool
    where
        F: FnOnce(&mut SceneObject),
    {
        if !self.scene.modify(id, f) {
            debug!(%id, op, "unknown layer");
            return false;
        }
        self.sync();
        true
    }

    /// Drain scene events and record a snapshot when anything changed.
    fn sync(&mut self) {
        if self.scene.take_events().is_empty() || self.history.is_restoring() {
            return;
        }
        let snapshot = codec::serialize_scene(&mut self.scene);
        self.history.record(snapshot);
    }
}
