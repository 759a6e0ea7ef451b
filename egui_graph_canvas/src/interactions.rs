//! Pointer interaction state machine, decoupled from egui's event plumbing
//! so it can be driven directly in tests.

use egui::{Pos2, Rect};

use crate::state::{CanvasState, InteractionMode};
use crate::types::{GraphEvent, NodeId};

/// Which side of a node a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PortKind {
    Input,
    Output,
}

/// Screen position of a rendered port.
pub(crate) struct PortHit {
    pub node_id: NodeId,
    pub pos: Pos2,
    pub kind: PortKind,
}

/// Screen rect of a rendered node, in draw order (later entries on top).
pub(crate) struct NodeHit {
    pub id: NodeId,
    pub rect: Rect,
}

/// Hit targets collected while drawing, consulted on pointer events. Stale
/// entries are harmless: every id is re-resolved against the node cache
/// before use.
pub(crate) struct HitMap {
    pub nodes: Vec<NodeHit>,
    pub ports: Vec<PortHit>,
    pub port_radius: f32,
}

impl HitMap {
    /// Nearest port of the given kind within the hit radius.
    pub fn port_at(&self, pos: Pos2, kind: PortKind) -> Option<&PortHit> {
        let mut best: Option<(f32, &PortHit)> = None;
        for port in self.ports.iter().filter(|p| p.kind == kind) {
            let d = pos.distance(port.pos);
            if d <= self.port_radius && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, port));
            }
        }
        best.map(|(_, p)| p)
    }

    /// Topmost node under the pointer.
    pub fn node_at(&self, pos: Pos2) -> Option<&NodeHit> {
        self.nodes.iter().rev().find(|n| n.rect.contains(pos))
    }
}

/// Resolve a pointer-down into a mode. Priority: output port, input port
/// (drop target only, no mode change), node body, background.
pub(crate) fn pointer_down(
    state: &mut CanvasState,
    hits: &HitMap,
    pos: Pos2,
    events: &mut Vec<GraphEvent>,
) {
    if let Some(port) = hits.port_at(pos, PortKind::Output) {
        state.mode = InteractionMode::DraggingConnection {
            from_id: port.node_id.clone(),
            pointer: pos,
        };
        return;
    }
    if hits.port_at(pos, PortKind::Input).is_some() {
        return;
    }
    if let Some(node) = hits.node_at(pos) {
        let id = node.id.clone();
        state.selected = Some(id.clone());
        events.push(GraphEvent::NodeSelected(id.clone()));
        state.mode = InteractionMode::DraggingNode {
            id,
            last_pointer: pos,
        };
        return;
    }
    state.mode = InteractionMode::Panning { last_pointer: pos };
    events.push(GraphEvent::CanvasClicked);
}

/// Advance the active mode with a new pointer position.
pub(crate) fn pointer_move(state: &mut CanvasState, pos: Pos2) {
    match state.mode.clone() {
        InteractionMode::Panning { last_pointer } => {
            state.transform.pan += pos - last_pointer;
            state.mode = InteractionMode::Panning { last_pointer: pos };
        }
        InteractionMode::DraggingNode { id, last_pointer } => {
            let delta = (pos - last_pointer) / state.transform.zoom;
            if let Some(node) = state.node_mut(&id) {
                node.position += delta;
            }
            state.mode = InteractionMode::DraggingNode {
                id,
                last_pointer: pos,
            };
        }
        InteractionMode::DraggingConnection { from_id, .. } => {
            state.mode = InteractionMode::DraggingConnection {
                from_id,
                pointer: pos,
            };
        }
        InteractionMode::Idle | InteractionMode::DraggingMinimap => {}
    }
}

/// Resolve the active mode on pointer-up. Always returns to `Idle`.
pub(crate) fn pointer_up(
    state: &mut CanvasState,
    hits: &HitMap,
    pos: Pos2,
    events: &mut Vec<GraphEvent>,
) {
    match std::mem::replace(&mut state.mode, InteractionMode::Idle) {
        InteractionMode::DraggingConnection { from_id, .. } => {
            if let Some(target) = hits.port_at(pos, PortKind::Input)
                && target.node_id != from_id
            {
                log::debug!("connection created: {from_id} -> {}", target.node_id);
                events.push(GraphEvent::Connected {
                    from_id,
                    to_id: target.node_id.clone(),
                });
            }
        }
        InteractionMode::DraggingNode { id, .. } => {
            if let Some(node) = state.node(&id) {
                events.push(GraphEvent::NodeMoved {
                    id: id.clone(),
                    position: node.position,
                });
            }
        }
        InteractionMode::Panning { .. }
        | InteractionMode::DraggingMinimap
        | InteractionMode::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeView;
    use egui::Vec2;

    fn state_with(nodes: Vec<(&str, Pos2, Vec2)>) -> CanvasState {
        let mut state = CanvasState::new();
        state.set_nodes(
            nodes
                .into_iter()
                .map(|(id, pos, size)| {
                    let mut n = NodeView::new(id, pos);
                    n.size = Some(size);
                    n
                })
                .collect(),
        );
        state
    }

    fn hits_for(state: &CanvasState) -> HitMap {
        // Screen == canvas at zoom 1 / pan 0 unless the transform says
        // otherwise; tests build hit rects under the current transform.
        let mut hits = HitMap {
            nodes: Vec::new(),
            ports: Vec::new(),
            port_radius: 10.0,
        };
        for node in &state.nodes {
            let min = state.transform.to_screen(node.position);
            let size = node.size.unwrap_or(Vec2::new(180.0, 60.0)) * state.transform.zoom;
            let rect = Rect::from_min_size(min, size);
            hits.ports.push(PortHit {
                node_id: node.id.clone(),
                pos: Pos2::new(rect.min.x, rect.center().y),
                kind: PortKind::Input,
            });
            hits.ports.push(PortHit {
                node_id: node.id.clone(),
                pos: Pos2::new(rect.max.x, rect.center().y),
                kind: PortKind::Output,
            });
            hits.nodes.push(NodeHit {
                id: node.id.clone(),
                rect,
            });
        }
        hits
    }

    #[test]
    fn drag_commit_rescales_screen_delta_by_zoom() {
        let mut state = state_with(vec![("a", Pos2::new(10.0, 10.0), Vec2::new(100.0, 40.0))]);
        state.transform.zoom = 2.0;
        let hits = hits_for(&state);
        let mut events = Vec::new();

        // Press mid-body (screen space: node occupies 20..220 x 20..100).
        let start = Pos2::new(100.0, 60.0);
        pointer_down(&mut state, &hits, start, &mut events);
        assert!(matches!(state.mode, InteractionMode::DraggingNode { .. }));
        assert_eq!(events, vec![GraphEvent::NodeSelected("a".into())]);

        pointer_move(&mut state, start + Vec2::new(50.0, 50.0));
        events.clear();
        pointer_up(&mut state, &hits, start + Vec2::new(50.0, 50.0), &mut events);

        assert_eq!(
            events,
            vec![GraphEvent::NodeMoved {
                id: "a".into(),
                position: Pos2::new(35.0, 35.0),
            }]
        );
        assert!(state.mode.is_idle());
    }

    #[test]
    fn node_move_fires_exactly_once_per_drag() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(50.0, 20.0), &mut events);
        pointer_move(&mut state, Pos2::new(60.0, 30.0));
        pointer_move(&mut state, Pos2::new(70.0, 40.0));
        pointer_up(&mut state, &hits, Pos2::new(70.0, 40.0), &mut events);

        let moves = events
            .iter()
            .filter(|e| matches!(e, GraphEvent::NodeMoved { .. }))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn mid_drag_zoom_rescales_remaining_delta() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        let start = Pos2::new(50.0, 20.0);
        pointer_down(&mut state, &hits, start, &mut events);
        // First half of the gesture at zoom 1.
        pointer_move(&mut state, start + Vec2::new(10.0, 0.0));
        // Wheel zoom mid-drag; the drag keeps going, unharmed.
        state.transform.zoom_about(start, 2.0);
        assert!(matches!(state.mode, InteractionMode::DraggingNode { .. }));
        pointer_move(&mut state, start + Vec2::new(20.0, 0.0));

        events.clear();
        pointer_up(&mut state, &hits, start + Vec2::new(20.0, 0.0), &mut events);
        // 10px at zoom 1 plus 10px at zoom 2: 10 + 5 canvas units.
        assert_eq!(
            events,
            vec![GraphEvent::NodeMoved {
                id: "a".into(),
                position: Pos2::new(15.0, 0.0),
            }]
        );
    }

    #[test]
    fn self_connection_is_rejected() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        // Start on a's output, release on a's own input.
        pointer_down(&mut state, &hits, Pos2::new(100.0, 20.0), &mut events);
        assert!(matches!(
            state.mode,
            InteractionMode::DraggingConnection { .. }
        ));
        pointer_move(&mut state, Pos2::new(0.0, 20.0));
        pointer_up(&mut state, &hits, Pos2::new(0.0, 20.0), &mut events);

        assert!(events.is_empty());
        assert!(state.mode.is_idle());
    }

    #[test]
    fn connection_drag_to_other_input_connects() {
        let mut state = state_with(vec![
            ("a", Pos2::ZERO, Vec2::new(100.0, 40.0)),
            ("b", Pos2::new(200.0, 0.0), Vec2::new(100.0, 40.0)),
        ]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(100.0, 20.0), &mut events);
        pointer_up(&mut state, &hits, Pos2::new(200.0, 20.0), &mut events);

        assert_eq!(
            events,
            vec![GraphEvent::Connected {
                from_id: "a".into(),
                to_id: "b".into(),
            }]
        );
    }

    #[test]
    fn released_over_nothing_abandons_connection() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(100.0, 20.0), &mut events);
        pointer_up(&mut state, &hits, Pos2::new(500.0, 500.0), &mut events);
        assert!(events.is_empty());
        assert!(state.mode.is_idle());
    }

    #[test]
    fn input_port_press_starts_nothing() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(0.0, 20.0), &mut events);
        assert!(state.mode.is_idle());
        assert!(events.is_empty());
    }

    #[test]
    fn output_port_wins_over_node_body() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        // The output anchor sits on the node edge; the port must win.
        pointer_down(&mut state, &hits, Pos2::new(98.0, 20.0), &mut events);
        assert!(matches!(
            state.mode,
            InteractionMode::DraggingConnection { .. }
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn background_press_pans_and_reports_click() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(400.0, 400.0), &mut events);
        assert_eq!(events, vec![GraphEvent::CanvasClicked]);

        pointer_move(&mut state, Pos2::new(420.0, 390.0));
        assert_eq!(state.transform.pan, Vec2::new(20.0, -10.0));

        events.clear();
        pointer_up(&mut state, &hits, Pos2::new(420.0, 390.0), &mut events);
        // Pan is local-only state; nothing is reported.
        assert!(events.is_empty());
    }

    #[test]
    fn dragging_a_vanished_node_degrades_to_noop() {
        let mut state = state_with(vec![("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(50.0, 20.0), &mut events);
        // Host replaces the node set mid-drag.
        state.set_nodes(Vec::new());
        pointer_move(&mut state, Pos2::new(80.0, 20.0));
        events.clear();
        pointer_up(&mut state, &hits, Pos2::new(80.0, 20.0), &mut events);

        assert!(events.is_empty());
        assert!(state.mode.is_idle());
    }

    #[test]
    fn topmost_node_wins_hit_testing() {
        let mut state = state_with(vec![
            ("under", Pos2::ZERO, Vec2::new(100.0, 40.0)),
            ("over", Pos2::new(50.0, 10.0), Vec2::new(100.0, 40.0)),
        ]);
        let hits = hits_for(&state);
        let mut events = Vec::new();

        pointer_down(&mut state, &hits, Pos2::new(80.0, 25.0), &mut events);
        assert_eq!(events, vec![GraphEvent::NodeSelected("over".into())]);
    }
}
