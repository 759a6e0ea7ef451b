//! Headless render smoke test: the canvas must tolerate dangling
//! connections and paint without panicking.

use egui_graph_canvas::{CanvasOptions, ConnectionView, GraphCanvas, NodeContent, NodeView};

struct LabelContent;

impl NodeContent for LabelContent {
    fn show(&mut self, node: &NodeView, ui: &mut egui::Ui) {
        ui.label(node.id.clone());
    }
}

#[test]
fn renders_with_dangling_connection() {
    let mut canvas = GraphCanvas::new(CanvasOptions::default());
    canvas.set_nodes(vec![
        NodeView::new("intro", egui::Pos2::new(20.0, 20.0)),
        NodeView::new("reply", egui::Pos2::new(320.0, 160.0)),
    ]);
    canvas.set_connections(vec![
        ConnectionView::new("intro", "reply"),
        // References a node that does not exist; must be skipped silently.
        ConnectionView::new("intro", "ghost"),
    ]);
    canvas.fit_to_content();

    let mut content = LabelContent;
    let mut harness = egui_kittest::Harness::new_ui(move |ui| {
        canvas.show(ui, &mut content);
    });
    harness.run();
}

#[test]
fn renders_empty_graph() {
    let mut canvas = GraphCanvas::new(CanvasOptions::default());
    let mut content = LabelContent;
    let mut harness = egui_kittest::Harness::new_ui(move |ui| {
        canvas.show(ui, &mut content);
    });
    harness.run();
}
