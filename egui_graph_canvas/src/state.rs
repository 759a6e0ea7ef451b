//! Canvas-owned state: the transform, the data caches, and the single
//! active interaction mode.

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};

use crate::transform::CanvasTransform;
use crate::types::{ConnectionView, NodeId, NodeView};

/// Fallback node size used until the host's content has been measured.
pub const DEFAULT_NODE_SIZE: Vec2 = Vec2::new(180.0, 60.0);

/// The active pointer interaction. Exactly one mode at a time; entering a
/// mode replaces whatever was active before.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionMode {
    Idle,
    /// Background drag moving the viewport.
    Panning { last_pointer: Pos2 },
    /// Moving a node. The pointer delta is rescaled by the zoom in effect
    /// at each tick, so zooming mid-drag never jumps the node.
    DraggingNode { id: NodeId, last_pointer: Pos2 },
    /// Dragging a new connection out of a node's output port.
    DraggingConnection { from_id: NodeId, pointer: Pos2 },
    /// Scrubbing the minimap to navigate.
    DraggingMinimap,
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Everything the canvas owns. Node and connection data are read-mostly
/// caches the host replaces wholesale; the canvas mutates only node
/// positions, and only during a drag.
pub struct CanvasState {
    pub transform: CanvasTransform,
    pub mode: InteractionMode,
    pub selected: Option<NodeId>,
    /// Viewport size in screen pixels, recorded on every show.
    pub viewport: Option<Vec2>,
    // Kept in sync with `index`; replaced only through `set_nodes`.
    pub(crate) nodes: Vec<NodeView>,
    pub(crate) connections: Vec<ConnectionView>,
    index: HashMap<NodeId, usize>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self {
            transform: CanvasTransform::default(),
            mode: InteractionMode::Idle,
            nodes: Vec::new(),
            connections: Vec::new(),
            selected: None,
            viewport: None,
            index: HashMap::new(),
        }
    }

    /// Replace the node cache wholesale and rebuild the id index.
    pub fn set_nodes(&mut self, nodes: Vec<NodeView>) {
        self.nodes = nodes;
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeView> {
        self.index.get(id).map(|&i| &mut self.nodes[i])
    }

    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    pub fn connections(&self) -> &[ConnectionView] {
        &self.connections
    }

    /// Canvas-space bounding box over all nodes. `None` when empty.
    pub fn content_bounds(&self) -> Option<Rect> {
        let mut iter = self.nodes.iter().map(node_bounds);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// Resolve a connection to canvas-space anchors: right-edge midpoint of
    /// the source, left-edge midpoint of the target. `None` when either id
    /// is unknown.
    pub fn connection_anchors(&self, conn: &ConnectionView) -> Option<(Pos2, Pos2)> {
        let from = self.node(&conn.from_id)?;
        let to = self.node(&conn.to_id)?;
        Some((output_anchor(from), input_anchor(to)))
    }
}

/// Canvas-space rect of a node, using the fallback size until measured.
pub fn node_bounds(node: &NodeView) -> Rect {
    Rect::from_min_size(node.position, node.size.unwrap_or(DEFAULT_NODE_SIZE))
}

/// Left-edge midpoint: where incoming connections attach.
pub fn input_anchor(node: &NodeView) -> Pos2 {
    let size = node.size.unwrap_or(DEFAULT_NODE_SIZE);
    Pos2::new(node.position.x, node.position.y + size.y * 0.5)
}

/// Right-edge midpoint: where outgoing connections attach.
pub fn output_anchor(node: &NodeView) -> Pos2 {
    let size = node.size.unwrap_or(DEFAULT_NODE_SIZE);
    Pos2::new(node.position.x + size.x, node.position.y + size.y * 0.5)
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
    fn empty_graph_has_no_bounds() {
        let state = CanvasState::new();
        assert!(state.content_bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let mut state = CanvasState::new();
        state.set_nodes(vec![
            sized("a", Pos2::new(0.0, 0.0), Vec2::new(100.0, 50.0)),
            sized("b", Pos2::new(300.0, 200.0), Vec2::new(100.0, 100.0)),
        ]);
        let bounds = state.content_bounds().unwrap();
        assert_eq!(bounds.min, Pos2::new(0.0, 0.0));
        assert_eq!(bounds.max, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn dangling_connection_resolves_to_none() {
        let mut state = CanvasState::new();
        state.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let conn = ConnectionView::new("a", "ghost");
        assert!(state.connection_anchors(&conn).is_none());
    }

    #[test]
    fn anchors_sit_on_edge_midpoints() {
        let mut state = CanvasState::new();
        state.set_nodes(vec![
            sized("a", Pos2::new(0.0, 0.0), Vec2::new(100.0, 40.0)),
            sized("b", Pos2::new(200.0, 100.0), Vec2::new(80.0, 60.0)),
        ]);
        let (from, to) = state
            .connection_anchors(&ConnectionView::new("a", "b"))
            .unwrap();
        assert_eq!(from, Pos2::new(100.0, 20.0));
        assert_eq!(to, Pos2::new(200.0, 130.0));
    }

    #[test]
    fn set_nodes_replaces_the_cache() {
        let mut state = CanvasState::new();
        state.set_nodes(vec![sized("a", Pos2::ZERO, Vec2::new(10.0, 10.0))]);
        state.set_nodes(vec![sized("b", Pos2::ZERO, Vec2::new(10.0, 10.0))]);
        assert!(state.node("a").is_none());
        assert!(state.node("b").is_some());
    }
}
