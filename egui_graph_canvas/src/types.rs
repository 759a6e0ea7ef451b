//! Lightweight view-data types for the graph canvas.

use egui::{Color32, Pos2, Vec2};

/// Stable identifier for a node. Hosts supply these; the canvas never
/// generates ids of its own.
pub type NodeId = String;

/// A node as the canvas sees it: an id, a canvas-space position, and the
/// rendered size once it has been measured.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    /// Top-left corner in canvas-space units.
    pub position: Pos2,
    /// Rendered size in canvas-space units, recorded after the host has
    /// painted the node content. `None` until the first paint.
    pub size: Option<Vec2>,
}

impl NodeView {
    pub fn new(id: impl Into<NodeId>, position: Pos2) -> Self {
        Self {
            id: id.into(),
            position,
            size: None,
        }
    }
}

/// A connection between two nodes (view data).
///
/// Endpoints are resolved by id on every render; entries referencing
/// unknown nodes are skipped, not errors.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionView {
    pub from_id: NodeId,
    pub to_id: NodeId,
    /// Logical sub-output on the source node (e.g. a dialogue choice).
    /// Display grouping only; never affects geometry.
    pub from_port: Option<String>,
    /// Overrides the theme's default connection color.
    pub color: Option<Color32>,
}

impl ConnectionView {
    pub fn new(from_id: impl Into<NodeId>, to_id: impl Into<NodeId>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            from_port: None,
            color: None,
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.from_port = Some(port.into());
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }
}

/// Events reported back to the host, collected during a frame and returned
/// from [`GraphCanvas::show`](crate::widget::GraphCanvas::show).
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    /// A node body was pressed (fired on pointer-down, before any drag).
    NodeSelected(NodeId),
    /// A node drag finished; `position` is the committed canvas-space
    /// position. Fired exactly once per drag, on pointer-up.
    NodeMoved { id: NodeId, position: Pos2 },
    /// The empty canvas background was pressed.
    CanvasClicked,
    /// A connection drag was released over another node's input port.
    Connected { from_id: NodeId, to_id: NodeId },
}
