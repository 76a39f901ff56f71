//! Alignment snapping for drag and scale interactions.
//!
//! Targets are collected once per interaction: the design area first, then the
//! rotated bounding box of every other visible object in stacking order. Each
//! target contributes three lines per axis (leading edge, center, trailing
//! edge). A moving rectangle offers the same three reference lines; the
//! closest target line within the threshold wins, ties going to the target
//! found first. Axes resolve independently.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::camera::Rect;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Constant x, drawn top to bottom.
    Vertical,
    /// Constant y, drawn left to right.
    Horizontal,
}

/// Alignment guide to draw while a snap is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub orientation: Orientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    pub start: f64,
    pub end: f64,
}

/// Nudge to apply on each axis, plus the guides that explain it.
///
/// For moves the offsets shift the rectangle; for scaling they grow or shrink
/// its width and height.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub guides: Vec<GuideLine>,
}

impl SnapResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dx.is_none() && self.dy.is_none()
    }

    /// Offsets with "no snap" read as zero.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        (self.dx.unwrap_or(0.0), self.dy.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    /// Leading edge, center and trailing edge of `rect` along this axis.
    fn lines(self, rect: &Rect) -> [f64; 3] {
        match self {
            Self::X => [rect.x, rect.x + rect.width * 0.5, rect.right()],
            Self::Y => [rect.y, rect.y + rect.height * 0.5, rect.bottom()],
        }
    }

    /// Extent of `rect` across this axis, which is where a guide runs.
    fn span(self, rect: &Rect) -> (f64, f64) {
        match self {
            Self::X => (rect.y, rect.bottom()),
            Self::Y => (rect.x, rect.right()),
        }
    }

    fn orientation(self) -> Orientation {
        match self {
            Self::X => Orientation::Vertical,
            Self::Y => Orientation::Horizontal,
        }
    }
}

struct Hit {
    delta: f64,
    position: f64,
    target: Rect,
}

/// Snap targets captured at the start of an interaction.
#[derive(Debug, Clone, Default)]
pub struct SnapTargets {
    rects: Vec<Rect>,
}

impl SnapTargets {
    /// Design area, then every visible object except `exclude`.
    #[must_use]
    pub fn collect(design_area: Rect, scene: &Scene, exclude: &str) -> Self {
        let mut rects = vec![design_area];
        rects.extend(
            scene
                .objects()
                .iter()
                .filter(|obj| obj.visible && obj.layer_id() != Some(exclude))
                .map(|obj| obj.bounding_box()),
        );
        Self { rects }
    }

    #[must_use]
    pub fn from_rects(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Snap a rectangle being dragged. `threshold_px` is in screen pixels.
    #[must_use]
    pub fn snap_move(&self, moving: Rect, threshold_px: f64, zoom: f64) -> SnapResult {
        let threshold = world_threshold(threshold_px, zoom);
        let x = self.closest(Axis::X, &Axis::X.lines(&moving), threshold);
        let y = self.closest(Axis::Y, &Axis::Y.lines(&moving), threshold);
        let snapped = Rect::new(
            moving.x + x.as_ref().map_or(0.0, |hit| hit.delta),
            moving.y + y.as_ref().map_or(0.0, |hit| hit.delta),
            moving.width,
            moving.height,
        );
        finish(x, y, &snapped)
    }

    /// Snap the trailing edges of a rectangle being resized from its
    /// top-left anchor.
    #[must_use]
    pub fn snap_scale(&self, scaling: Rect, threshold_px: f64, zoom: f64) -> SnapResult {
        let threshold = world_threshold(threshold_px, zoom);
        let x = self.closest(Axis::X, &[scaling.right()], threshold);
        let y = self.closest(Axis::Y, &[scaling.bottom()], threshold);
        let snapped = Rect::new(
            scaling.x,
            scaling.y,
            scaling.width + x.as_ref().map_or(0.0, |hit| hit.delta),
            scaling.height + y.as_ref().map_or(0.0, |hit| hit.delta),
        );
        finish(x, y, &snapped)
    }

    fn closest(&self, axis: Axis, refs: &[f64], threshold: f64) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for target in &self.rects {
            for line in axis.lines(target) {
                for reference in refs {
                    let delta = line - reference;
                    if delta.abs() > threshold {
                        continue;
                    }
                    if best.as_ref().is_none_or(|hit| delta.abs() < hit.delta.abs()) {
                        best = Some(Hit { delta, position: line, target: *target });
                    }
                }
            }
        }
        best
    }
}

fn world_threshold(threshold_px: f64, zoom: f64) -> f64 {
    if zoom > 0.0 { threshold_px / zoom } else { threshold_px }
}

fn finish(x: Option<Hit>, y: Option<Hit>, snapped: &Rect) -> SnapResult {
    let mut result = SnapResult::default();
    if let Some(hit) = x {
        result.dx = Some(hit.delta);
        result.guides.push(guide(Axis::X, &hit, snapped));
    }
    if let Some(hit) = y {
        result.dy = Some(hit.delta);
        result.guides.push(guide(Axis::Y, &hit, snapped));
    }
    result
}

fn guide(axis: Axis, hit: &Hit, snapped: &Rect) -> GuideLine {
    let (a_start, a_end) = axis.span(snapped);
    let (b_start, b_end) = axis.span(&hit.target);
    GuideLine {
        orientation: axis.orientation(),
        position: hit.position,
        start: a_start.min(b_start),
        end: a_end.max(b_end),
    }
}
