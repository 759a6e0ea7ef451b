//! The graph canvas widget: pan/zoom, node layout and measurement,
//! connection rendering, pointer interaction dispatch, and the minimap.

use egui::{self, Pos2, Rect, Sense, Stroke, StrokeKind, UiBuilder, Vec2};

use crate::drawing;
use crate::interactions::{self, HitMap, NodeHit, PortHit, PortKind};
use crate::minimap::{self, MinimapLayout};
use crate::state::{CanvasState, DEFAULT_NODE_SIZE, InteractionMode, output_anchor};
use crate::theme::CanvasTheme;
use crate::traits::NodeContent;
use crate::transform::CanvasTransform;
use crate::types::{ConnectionView, GraphEvent, NodeId, NodeView};

/// Padding between the node border and host content, canvas units.
const CONTENT_MARGIN: f32 = 8.0;
/// Port hit radius relative to the drawn radius.
const PORT_HIT_SCALE: f32 = 4.0;
/// Size changes below this are noise, not re-measurements.
const MEASURE_EPSILON: f32 = 0.5;

/// Optional features toggled by the host.
#[derive(Clone, Copy, Debug)]
pub struct CanvasOptions {
    pub show_minimap: bool,
    pub show_ports: bool,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            show_minimap: true,
            show_ports: true,
        }
    }
}

/// View adjustment requested before the viewport size was known.
#[derive(Clone, Debug)]
enum PendingView {
    CenterOn(NodeId),
    Fit,
}

/// A pannable, zoomable node-graph canvas with live connection editing.
///
/// The host is the source of truth for node and connection data and pushes
/// it in wholesale via [`set_nodes`](Self::set_nodes) and
/// [`set_connections`](Self::set_connections); the canvas owns the
/// transform and all pointer interpretation, and reports interaction
/// results as [`GraphEvent`]s from [`show`](Self::show). Node positions
/// are mutated locally during a drag and committed back through
/// [`GraphEvent::NodeMoved`] on release.
pub struct GraphCanvas {
    state: CanvasState,
    options: CanvasOptions,
    theme: CanvasTheme,
    pending_view: Option<PendingView>,
}

impl GraphCanvas {
    pub fn new(options: CanvasOptions) -> Self {
        Self {
            state: CanvasState::new(),
            options,
            theme: CanvasTheme::default(),
            pending_view: None,
        }
    }

    pub fn with_theme(mut self, theme: CanvasTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the node cache wholesale. Sizes are re-measured on the next
    /// paint; until then connections fall back to default anchors.
    pub fn set_nodes(&mut self, nodes: Vec<NodeView>) {
        self.state.set_nodes(nodes);
    }

    /// Replace the connection cache. Does not touch nodes.
    pub fn set_connections(&mut self, connections: Vec<ConnectionView>) {
        self.state.connections = connections;
    }

    /// Update selection highlighting without re-pushing node data.
    pub fn set_selected_node(&mut self, id: Option<NodeId>) {
        self.state.selected = id;
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.state.selected.as_ref()
    }

    pub fn transform(&self) -> CanvasTransform {
        self.state.transform
    }

    /// Pan so the node's center sits at the viewport center, preserving
    /// zoom. Unknown ids are ignored; before the first frame the request
    /// is deferred until the viewport size is known.
    pub fn center_on_node(&mut self, id: &str) {
        match self.state.viewport {
            Some(viewport) => self.center_on_node_in(id, viewport),
            None => {
                if self.state.node(id).is_some() {
                    self.pending_view = Some(PendingView::CenterOn(id.to_owned()));
                }
            }
        }
    }

    fn center_on_node_in(&mut self, id: &str, viewport: Vec2) {
        if let Some(node) = self.state.node(id) {
            let center = node.position + node.size.unwrap_or(DEFAULT_NODE_SIZE) * 0.5;
            self.state.transform.center_on(center, viewport);
        }
    }

    /// Zoom and pan so every node is visible and centered, with a margin.
    /// No-op on an empty graph.
    pub fn fit_to_content(&mut self) {
        if self.state.nodes.is_empty() {
            return;
        }
        match self.state.viewport {
            Some(viewport) => self.fit_in(viewport),
            None => self.pending_view = Some(PendingView::Fit),
        }
    }

    fn fit_in(&mut self, viewport: Vec2) {
        if let Some(bounds) = self.state.content_bounds() {
            self.state.transform = CanvasTransform::fit(bounds, viewport);
        }
    }

    /// Render one frame and handle its input. Returns the events the
    /// interaction produced, for the host to apply afterwards.
    pub fn show(&mut self, ui: &mut egui::Ui, content: &mut dyn NodeContent) -> Vec<GraphEvent> {
        let mut events = Vec::new();

        let available = ui.available_rect_before_wrap();
        let (response, painter) = ui.allocate_painter(available.size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.state.viewport = Some(canvas_rect.size());

        if let Some(pending) = self.pending_view.take() {
            match pending {
                PendingView::CenterOn(id) => self.center_on_node_in(&id, canvas_rect.size()),
                PendingView::Fit => self.fit_in(canvas_rect.size()),
            }
        }

        // Wheel zoom anchored at the pointer. Deliberately not gated on the
        // interaction mode: zooming mid-drag is legal and must not corrupt
        // the drag.
        if let Some(hover) = ui.input(|i| i.pointer.hover_pos())
            && canvas_rect.contains(hover)
        {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let local = hover - canvas_rect.min.to_vec2();
                self.state.transform.wheel_zoom(local, scroll);
            }
        }
        let zoom = self.state.transform.zoom;

        painter.rect_filled(canvas_rect, 0.0, self.theme.background_color);
        drawing::draw_grid(
            &painter,
            canvas_rect,
            self.state.transform.pan,
            self.theme.grid_color,
            self.theme.grid_spacing * zoom,
        );

        // ---- Phase 1: node chrome, host content, measurement, hit targets ----
        let mut hits = HitMap {
            nodes: Vec::new(),
            ports: Vec::new(),
            port_radius: self.theme.port_radius * zoom * PORT_HIT_SCALE,
        };
        let mut measured: Vec<(NodeId, Vec2)> = Vec::new();

        for i in 0..self.state.nodes.len() {
            let node = self.state.nodes[i].clone();
            let rect = self.node_screen_rect(&node, canvas_rect);
            let selected = self.state.selected.as_deref() == Some(node.id.as_str());

            painter.rect_filled(rect, self.theme.node_rounding, self.theme.node_body_color);
            if selected {
                painter.rect_stroke(
                    rect,
                    self.theme.node_rounding,
                    Stroke::new(2.0, self.theme.selection_color),
                    StrokeKind::Outside,
                );
            } else {
                painter.rect_stroke(
                    rect,
                    self.theme.node_rounding,
                    Stroke::new(1.0, self.theme.node_border_color),
                    StrokeKind::Inside,
                );
            }

            // Host content; the rect it settles into becomes the node size
            // (measured after paint, used by anchors from then on).
            let margin = CONTENT_MARGIN * zoom;
            let inner = ui.scope_builder(
                UiBuilder::new()
                    .max_rect(rect.shrink(margin))
                    .layout(egui::Layout::top_down(egui::Align::Min)),
                |ui| content.show(&node, ui),
            );
            let content_size = inner.response.rect.size();
            // An empty child ui has a degenerate rect; keep the fallback.
            if content_size.is_finite() && content_size.min_elem() >= 0.0 {
                let size = (content_size + Vec2::splat(margin * 2.0)) / zoom;
                let known = node.size.unwrap_or(Vec2::ZERO);
                if (size - known).length() > MEASURE_EPSILON {
                    measured.push((node.id.clone(), size));
                }
            }

            if self.options.show_ports {
                let input = Pos2::new(rect.min.x, rect.center().y);
                let output = Pos2::new(rect.max.x, rect.center().y);
                let radius = self.theme.port_radius * zoom;
                painter.circle_filled(input, radius, self.theme.input_port_color);
                painter.circle_filled(output, radius, self.theme.output_port_color);
                hits.ports.push(PortHit {
                    node_id: node.id.clone(),
                    pos: input,
                    kind: PortKind::Input,
                });
                hits.ports.push(PortHit {
                    node_id: node.id.clone(),
                    pos: output,
                    kind: PortKind::Output,
                });
            }
            hits.nodes.push(NodeHit {
                id: node.id.clone(),
                rect,
            });
        }
        for (id, size) in measured {
            if let Some(node) = self.state.node_mut(&id) {
                node.size = Some(size);
            }
        }

        // ---- Phase 2: connections, drawn over the nodes ----
        for conn in &self.state.connections {
            // Dangling ids are skipped; the host may be mid-update.
            let Some((from, to)) = self.state.connection_anchors(conn) else {
                continue;
            };
            drawing::draw_connection(
                &painter,
                canvas_rect.min + self.state.transform.to_screen(from).to_vec2(),
                canvas_rect.min + self.state.transform.to_screen(to).to_vec2(),
                zoom,
                conn.color.unwrap_or(self.theme.connection_color),
            );
        }

        if let InteractionMode::DraggingConnection { from_id, pointer } = &self.state.mode
            && let Some(node) = self.state.node(from_id)
        {
            let from = canvas_rect.min + self.state.transform.to_screen(output_anchor(node)).to_vec2();
            drawing::draw_pending_connection(
                &painter,
                from,
                *pointer,
                zoom,
                self.theme.pending_connection_color,
            );
        }

        // ---- Phase 3: minimap and pointer dispatch ----
        let minimap_layout = if self.options.show_minimap {
            MinimapLayout::compute(&self.state, minimap::minimap_rect(canvas_rect))
        } else {
            None
        };
        if let Some(layout) = &minimap_layout {
            minimap::draw(&painter, layout, &self.state, &self.theme);
        }

        self.handle_pointer(ui, canvas_rect, &hits, minimap_layout.as_ref(), &mut events);

        match &self.state.mode {
            InteractionMode::Panning { .. } => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing)
            }
            InteractionMode::DraggingNode { .. } => ui.ctx().set_cursor_icon(egui::CursorIcon::Grab),
            InteractionMode::DraggingConnection { .. } => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair)
            }
            InteractionMode::DraggingMinimap | InteractionMode::Idle => {}
        }

        events
    }

    fn node_screen_rect(&self, node: &NodeView, canvas_rect: Rect) -> Rect {
        let min = canvas_rect.min + self.state.transform.to_screen(node.position).to_vec2();
        let size = node.size.unwrap_or(DEFAULT_NODE_SIZE) * self.state.transform.zoom;
        Rect::from_min_size(min, size)
    }

    /// Translate raw pointer state into state-machine transitions. Release
    /// is handled wherever the pointer is, so drags ending outside the
    /// widget still resolve.
    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        canvas_rect: Rect,
        hits: &HitMap,
        minimap: Option<&MinimapLayout>,
        events: &mut Vec<GraphEvent>,
    ) {
        let pointer = ui.input(|i| i.pointer.latest_pos());
        let pressed = ui.input(|i| i.pointer.primary_pressed());
        let released = ui.input(|i| i.pointer.primary_released());

        if pressed {
            if let Some(pos) = pointer
                && canvas_rect.contains(pos)
            {
                // The minimap floats above everything else.
                if let Some(layout) = minimap
                    && layout.rect.contains(pos)
                {
                    self.state.mode = InteractionMode::DraggingMinimap;
                    self.navigate_minimap(layout, pos, canvas_rect);
                } else {
                    interactions::pointer_down(&mut self.state, hits, pos, events);
                }
            }
        } else if let Some(pos) = pointer {
            match self.state.mode {
                InteractionMode::DraggingMinimap => {
                    if let Some(layout) = minimap {
                        self.navigate_minimap(layout, pos, canvas_rect);
                    }
                }
                _ => interactions::pointer_move(&mut self.state, pos),
            }
        }

        if released {
            match pointer {
                Some(pos) => interactions::pointer_up(&mut self.state, hits, pos, events),
                // Pointer left the window entirely; abandon whatever was
                // in flight.
                None => self.state.mode = InteractionMode::Idle,
            }
        }
    }

    /// Recenter the main view on the canvas point under the minimap
    /// pointer, preserving zoom. Navigation only; node data is untouched.
    fn navigate_minimap(&mut self, layout: &MinimapLayout, pos: Pos2, canvas_rect: Rect) {
        let target = layout.to_canvas(pos);
        self.state.transform.center_on(target, canvas_rect.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(id: &str, pos: Pos2, size: Vec2) -> NodeView {
        let mut n = NodeView::new(id, pos);
        n.size = Some(size);
        n
    }

    #[test]
    fn fit_on_empty_graph_is_a_noop() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        let before = canvas.transform();
        canvas.fit_to_content();
        assert_eq!(canvas.transform(), before);
        assert!(canvas.pending_view.is_none());
    }

    #[test]
    fn center_on_unknown_node_is_a_noop() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        canvas.state.viewport = Some(Vec2::new(800.0, 600.0));
        let before = canvas.transform();
        canvas.center_on_node("missing");
        assert_eq!(canvas.transform(), before);
    }

    #[test]
    fn center_on_node_centers_its_midpoint() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(vec![sized("a", Pos2::new(100.0, 100.0), Vec2::new(200.0, 100.0))]);
        canvas.state.viewport = Some(Vec2::new(800.0, 600.0));
        canvas.center_on_node("a");
        let t = canvas.transform();
        let mid = t.to_canvas(Pos2::new(400.0, 300.0));
        assert!((mid - Pos2::new(200.0, 150.0)).length() < 1e-3);
        assert_eq!(t.zoom, 1.0);
    }

    #[test]
    fn fit_zoom_picks_the_limiting_axis() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(400.0, 300.0))]);
        canvas.state.viewport = Some(Vec2::new(800.0, 600.0));
        canvas.fit_to_content();
        // min(800/500, 600/400) = 1.5 within [0.3, 1.5].
        assert!((canvas.transform().zoom - 1.5).abs() < 1e-6);
    }

    #[test]
    fn view_requests_before_first_frame_are_deferred() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        canvas.fit_to_content();
        assert!(matches!(canvas.pending_view, Some(PendingView::Fit)));

        canvas.center_on_node("a");
        assert!(matches!(canvas.pending_view, Some(PendingView::CenterOn(_))));
        // Unknown ids never queue anything.
        canvas.pending_view = None;
        canvas.center_on_node("missing");
        assert!(canvas.pending_view.is_none());
    }

    #[test]
    fn selection_updates_without_data_push() {
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        canvas.set_selected_node(Some("a".into()));
        assert_eq!(canvas.selected_node().map(String::as_str), Some("a"));
        canvas.set_selected_node(None);
        assert!(canvas.selected_node().is_none());
    }
}
