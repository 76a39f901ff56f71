//! Bounded undo/redo over full-scene layer snapshots.
//!
//! DESIGN
//! ======
//! Two `VecDeque<Entry>` stacks. The back of `undo` is the current state; the
//! front of `redo` is the most recently undone state. Each stack is capped at
//! `max_entries` and evicts its oldest entry on overflow.
//!
//! Every entry carries a signature of the layers it holds. A snapshot whose
//! signature matches the current state is a no-op and is not recorded, so
//! selection changes and other event noise never produce empty undo steps.
//!
//! TRADE-OFFS
//! ==========
//! Restoring a snapshot mutates the scene, which would itself be captured. A
//! re-entrancy guard is raised by `undo`/`redo` and lowered by the next
//! `on_frame_tick`. Any mutation made in the same tick as a restore is not
//! captured; hosts call `on_frame_tick` once per animation frame, which keeps
//! that window below one frame.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::config::HistoryConfig;
use crate::layer::{Layer, LayerContent, LayerId, LayerType, ShapeKind};

/// Ordered, deep-copied list of every layer in the scene.
pub type Snapshot = Vec<Layer>;

// =============================================================================
// SIGNATURE
// =============================================================================

/// What makes a layer "the same content" across snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identity {
    Text(String),
    Asset(String),
    Shape(ShapeKind, String),
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerSignature {
    layer_id: LayerId,
    layer_type: LayerType,
    z_index: i64,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    rotation: i64,
    hidden: bool,
    locked: bool,
    identity: Identity,
}

#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}

impl LayerSignature {
    fn of(layer: &Layer) -> Self {
        let identity = match &layer.content {
            LayerContent::Text(text) => Identity::Text(text.text.clone()),
            LayerContent::Image(image) | LayerContent::Clipart(image) => Identity::Asset(image.src.clone()),
            LayerContent::Shape(shape) => Identity::Shape(shape.shape_kind, shape.fill.clone()),
            LayerContent::Group(_) => Identity::Group,
        };
        Self {
            layer_id: layer.layer_id.clone(),
            layer_type: layer.layer_type(),
            z_index: layer.z_index,
            x: round(layer.position.x),
            y: round(layer.position.y),
            width: round(layer.position.width),
            height: round(layer.position.height),
            rotation: round(layer.position.rotation_degrees),
            hidden: layer.is_hidden,
            locked: layer.is_locked,
            identity,
        }
    }
}

fn signature(layers: &[Layer]) -> Vec<LayerSignature> {
    layers.iter().map(LayerSignature::of).collect()
}

#[derive(Debug, Clone)]
struct Entry {
    layers: Snapshot,
    signature: Vec<LayerSignature>,
}

impl Entry {
    fn new(layers: Snapshot) -> Self {
        let signature = signature(&layers);
        Self { layers, signature }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Debug)]
pub struct HistoryEngine {
    undo: VecDeque<Entry>,
    redo: VecDeque<Entry>,
    max_entries: usize,
    restoring: bool,
}

impl HistoryEngine {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_entries: config.max_entries.max(1),
            restoring: false,
        }
    }

    /// Capture `snapshot` as the new current state.
    ///
    /// Returns false when the snapshot was ignored: a restore is in progress,
    /// or nothing tracked changed since the current state.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        if self.restoring {
            debug!("history record ignored during restore");
            return false;
        }
        let entry = Entry::new(snapshot);
        if self
            .undo
            .back()
            .is_some_and(|current| current.signature == entry.signature)
        {
            return false;
        }
        push_capped(&mut self.undo, entry, self.max_entries);
        self.redo.clear();
        true
    }

    /// Step back one snapshot. Returns the state to restore, or `None` when
    /// there is nothing before the current state.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.undo.len() < 2 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push_front(current);
        self.redo.truncate(self.max_entries);
        let target = self.undo.back()?.layers.clone();
        self.restoring = true;
        debug!(undo = self.undo.len(), redo = self.redo.len(), "history undo");
        Some(target)
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.redo.pop_front()?;
        let target = entry.layers.clone();
        push_capped(&mut self.undo, entry, self.max_entries);
        self.restoring = true;
        debug!(undo = self.undo.len(), redo = self.redo.len(), "history redo");
        Some(target)
    }

    /// Drop both stacks and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push_back(Entry::new(initial));
        self.restoring = false;
    }

    /// Lower the restore guard. Call once per rendered frame.
    pub fn on_frame_tick(&mut self) {
        self.restoring = false;
    }

    /// Mark a restore as in progress so its scene mutations are not recorded.
    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots on the undo stack, current state included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The current state, if any has been recorded.
    #[must_use]
    pub fn current(&self) -> Option<&[Layer]> {
        self.undo.back().map(|entry| entry.layers.as_slice())
    }
}

fn push_capped(stack: &mut VecDeque<Entry>, entry: Entry, max: usize) {
    stack.push_back(entry);
    while stack.len() > max {
        stack.pop_front();
    }
}
