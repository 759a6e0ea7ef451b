//! Scaled overview of the whole graph with click-to-navigate.
//!
//! Recomputed from scratch on every frame; at tens of nodes that is far
//! cheaper than keeping it in sync incrementally.

use egui::{Pos2, Rect, Stroke, StrokeKind, Vec2};

use crate::state::{CanvasState, DEFAULT_NODE_SIZE};
use crate::theme::CanvasTheme;

/// Side length of the square minimap, screen pixels.
pub const MINIMAP_SIZE: f32 = 150.0;
/// Inset from the canvas corner, screen pixels.
pub const MINIMAP_MARGIN: f32 = 12.0;
/// Padding around the content bounding box, canvas units.
const CONTENT_PADDING: f32 = 20.0;
/// Smallest drawn node extent so tiny nodes stay visible.
const MIN_NODE_EXTENT: f32 = 3.0;

/// Mapping between canvas space and minimap pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MinimapLayout {
    pub rect: Rect,
    scale: f32,
    offset: Vec2,
}

impl MinimapLayout {
    /// Uniform scale fitting the padded content bounds into `rect`,
    /// centered. `None` when there is nothing to show.
    pub fn compute(state: &CanvasState, rect: Rect) -> Option<Self> {
        let bounds = state.content_bounds()?.expand(CONTENT_PADDING);
        let scale = (rect.width() / bounds.width()).min(rect.height() / bounds.height());
        let centering = (rect.size() - bounds.size() * scale) * 0.5;
        let offset = rect.min.to_vec2() + centering - bounds.min.to_vec2() * scale;
        Some(Self {
            rect,
            scale,
            offset,
        })
    }

    pub fn to_minimap(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Inverse of [`Self::to_minimap`]; used for click-to-navigate.
    pub fn to_canvas(&self, minimap: Pos2) -> Pos2 {
        ((minimap.to_vec2() - self.offset) / self.scale).to_pos2()
    }
}

/// Where the minimap sits inside the canvas: bottom-right corner.
pub(crate) fn minimap_rect(canvas_rect: Rect) -> Rect {
    Rect::from_min_size(
        canvas_rect.max - Vec2::splat(MINIMAP_SIZE + MINIMAP_MARGIN),
        Vec2::splat(MINIMAP_SIZE),
    )
}

pub(crate) fn draw(
    painter: &egui::Painter,
    layout: &MinimapLayout,
    state: &CanvasState,
    theme: &CanvasTheme,
) {
    let painter = painter.with_clip_rect(layout.rect.expand(1.0));
    painter.rect_filled(layout.rect, 2.0, theme.minimap_background);
    painter.rect_stroke(
        layout.rect,
        2.0,
        Stroke::new(1.0, theme.minimap_border),
        StrokeKind::Outside,
    );

    // Straight lines are enough at this scale.
    for conn in &state.connections {
        if let Some((from, to)) = state.connection_anchors(conn) {
            let color = conn.color.unwrap_or(theme.connection_color);
            painter.line_segment(
                [layout.to_minimap(from), layout.to_minimap(to)],
                Stroke::new(1.0, color.gamma_multiply(0.7)),
            );
        }
    }

    for node in &state.nodes {
        let size = (node.size.unwrap_or(DEFAULT_NODE_SIZE) * layout.scale)
            .max(Vec2::splat(MIN_NODE_EXTENT));
        let rect = Rect::from_min_size(layout.to_minimap(node.position), size);
        let selected = state.selected.as_deref() == Some(node.id.as_str());
        let color = if selected {
            theme.selection_color
        } else {
            theme.minimap_node_color
        };
        painter.rect_filled(rect, 1.0, color);
    }

    // Main viewport extent, derived from the live transform.
    if let Some(viewport) = state.viewport {
        let view_min = state.transform.to_canvas(Pos2::ZERO);
        let view_max = state.transform.to_canvas(viewport.to_pos2());
        let rect = Rect::from_min_max(layout.to_minimap(view_min), layout.to_minimap(view_max));
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, theme.minimap_viewport_color),
            StrokeKind::Inside,
        );
    }
}
