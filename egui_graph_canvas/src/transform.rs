//! Pan/zoom transform between canvas space and screen space.

use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom range used by [`CanvasTransform::fit`], tighter than the manual range.
pub const FIT_MIN_ZOOM: f32 = 0.3;
pub const FIT_MAX_ZOOM: f32 = 1.5;
/// Margin added around the content bounding box when fitting.
pub const FIT_PADDING: f32 = 50.0;

/// Maps canvas space to screen space: `screen = canvas * zoom + pan`.
///
/// Screen positions here are relative to the canvas widget's top-left
/// corner; the widget adds its own rect origin when painting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    /// Multiply zoom by `factor`, clamped to `[MIN_ZOOM, MAX_ZOOM]`, keeping
    /// the canvas point under `pointer` (screen space) stationary.
    pub fn zoom_about(&mut self, pointer: Pos2, factor: f32) {
        let anchor = self.to_canvas(pointer);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer.to_vec2() - anchor.to_vec2() * self.zoom;
    }

    /// One wheel tick: scroll up zooms in by 1.1, scroll down out by 0.9.
    pub fn wheel_zoom(&mut self, pointer: Pos2, scroll_y: f32) {
        if scroll_y == 0.0 {
            return;
        }
        let factor = if scroll_y > 0.0 { 1.1 } else { 0.9 };
        self.zoom_about(pointer, factor);
    }

    /// Recenter the viewport on a canvas-space point, preserving zoom.
    pub fn center_on(&mut self, target: Pos2, viewport: Vec2) {
        self.pan = viewport * 0.5 - target.to_vec2() * self.zoom;
    }

    /// Fit `bounds` (canvas space) into `viewport`, expanded by
    /// [`FIT_PADDING`], choosing the largest zoom in
    /// `[FIT_MIN_ZOOM, FIT_MAX_ZOOM]` and centering the padded box.
    pub fn fit(bounds: Rect, viewport: Vec2) -> Self {
        let padded = bounds.expand(FIT_PADDING);
        let zoom = (viewport.x / padded.width())
            .min(viewport.y / padded.height())
            .clamp(FIT_MIN_ZOOM, FIT_MAX_ZOOM);
        let mut transform = Self {
            pan: Vec2::ZERO,
            zoom,
        };
        transform.center_on(padded.center(), viewport);
        transform
    }
}
