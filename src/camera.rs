//! Viewport camera, points, and axis-aligned rectangles.
//!
//! Design space is the coordinate system layers are stored in; screen space is
//! CSS pixels on the host surface. The camera maps between them with a uniform
//! zoom and a pan offset.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or design space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector from `self` to `other`, in degrees.
    #[must_use]
    pub fn angle_to_deg(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point { x: (self.x + other.x) * 0.5, y: (self.y + other.y) * 0.5 }
    }
}

/// Axis-aligned rectangle in design space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width * 0.5, y: self.y + self.height * 0.5 }
    }

    /// Bounding box of this rectangle rotated by `angle_deg` around its center.
    #[must_use]
    pub fn rotated_bounds(&self, angle_deg: f64) -> Rect {
        if angle_deg.rem_euclid(360.0) == 0.0 {
            return *self;
        }
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let w = (self.width * cos).abs() + (self.height * sin).abs();
        let h = (self.width * sin).abs() + (self.height * cos).abs();
        let c = self.center();
        Rect { x: c.x - w * 0.5, y: c.y - h * 0.5, width: w, height: h }
    }
}

/// Camera state for pan/zoom over the design area.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor; `base_zoom` is the fit-to-screen scale that pinch
/// limits are expressed relative to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub base_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0, base_zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to design coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a design-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to design-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Clamp `zoom` to `[min_factor, max_factor] * base_zoom`.
    ///
    /// Swapped bounds are reordered and a NaN bound is ignored, so a bad
    /// config never panics mid-pinch.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64, min_factor: f64, max_factor: f64) -> f64 {
        let lo = self.base_zoom * min_factor;
        let hi = self.base_zoom * max_factor;
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        // f64::max/min return the other operand for NaN.
        zoom.max(lo).min(hi)
    }
}
