//! The eframe application: one canvas panel over the dialogue tree.

use eframe::egui;

use egui_graph_canvas::{CanvasOptions, GraphCanvas, GraphEvent, NodeContent, NodeView};

use crate::narrative::DialogueTree;

pub struct NarrativeApp {
    canvas: GraphCanvas,
    tree: DialogueTree,
    selected: Option<String>,
}

impl NarrativeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let tree = DialogueTree::sample();
        let mut canvas = GraphCanvas::new(CanvasOptions::default());
        canvas.set_nodes(tree.canvas_nodes());
        canvas.set_connections(tree.canvas_connections());
        canvas.fit_to_content();
        Self {
            canvas,
            tree,
            selected: None,
        }
    }
}

/// Paints a dialogue node: speaker, line, and its choice list.
struct DialogueContent<'a> {
    tree: &'a DialogueTree,
}

impl NodeContent for DialogueContent<'_> {
    fn show(&mut self, node: &NodeView, ui: &mut egui::Ui) {
        let Some(dialogue) = self.tree.node(&node.id) else {
            ui.label(egui::RichText::new(&node.id).weak());
            return;
        };
        ui.strong(&dialogue.speaker);
        ui.label(&dialogue.text);
        for choice in &dialogue.choices {
            let linked = choice.target.is_some();
            let text = format!("\u{2192} {}", choice.label);
            if linked {
                ui.small(text);
            } else {
                ui.small(egui::RichText::new(text).weak().italics());
            }
        }
    }
}

impl eframe::App for NarrativeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Fit view").clicked() {
                    self.canvas.fit_to_content();
                }
                let enabled = self.selected.is_some();
                if ui
                    .add_enabled(enabled, egui::Button::new("Center selected"))
                    .clicked()
                {
                    if let Some(id) = self.selected.clone() {
                        self.canvas.center_on_node(&id);
                    }
                }
                if let Some(id) = &self.selected {
                    ui.separator();
                    ui.label(format!("Selected: {id}"));
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let events = {
                    let mut content = DialogueContent { tree: &self.tree };
                    self.canvas.show(ui, &mut content)
                };

                for event in events {
                    match event {
                        GraphEvent::NodeSelected(id) => {
                            self.selected = Some(id.clone());
                            self.canvas.set_selected_node(Some(id));
                        }
                        GraphEvent::NodeMoved { id, position } => {
                            if let Some(node) = self.tree.node_mut(&id) {
                                node.position = [position.x, position.y];
                            }
                        }
                        GraphEvent::CanvasClicked => {
                            self.selected = None;
                            self.canvas.set_selected_node(None);
                        }
                        GraphEvent::Connected { from_id, to_id } => {
                            log::info!("linking {from_id} -> {to_id}");
                            self.tree.connect(&from_id, &to_id);
                            self.canvas.set_connections(self.tree.canvas_connections());
                        }
                    }
                }
            });
    }
}
