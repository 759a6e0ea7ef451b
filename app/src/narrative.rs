//! Dialogue-tree data model backing the demo editor.
//!
//! The tree is the source of truth; the canvas gets derived view data and
//! pushes committed changes (positions, new links) back through events.

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use egui_graph_canvas::{ConnectionView, NodeView};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    /// Id of the node this choice leads to. Open (unlinked) choices are
    /// valid; connecting in the editor fills them in.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: String,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub position: [f32; 2],
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DialogueTree {
    pub nodes: Vec<DialogueNode>,
}

impl DialogueTree {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn sample() -> Self {
        match Self::from_json(SAMPLE) {
            Ok(tree) => tree,
            Err(err) => {
                log::error!("failed to parse bundled sample dialogue: {err}");
                Self::default()
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DialogueNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Link `from` to `to`: fill the first open choice, or append a new
    /// generic one if every choice is already linked.
    pub fn connect(&mut self, from: &str, to: &str) {
        let Some(node) = self.node_mut(from) else {
            return;
        };
        if let Some(open) = node.choices.iter_mut().find(|c| c.target.is_none()) {
            open.target = Some(to.to_owned());
        } else {
            node.choices.push(Choice {
                label: "Continue".to_owned(),
                target: Some(to.to_owned()),
            });
        }
    }

    pub fn canvas_nodes(&self) -> Vec<NodeView> {
        self.nodes
            .iter()
            .map(|n| NodeView::new(n.id.clone(), Pos2::new(n.position[0], n.position[1])))
            .collect()
    }

    pub fn canvas_connections(&self) -> Vec<ConnectionView> {
        self.nodes
            .iter()
            .flat_map(|n| {
                n.choices.iter().filter_map(|c| {
                    let target = c.target.as_ref()?;
                    Some(
                        ConnectionView::new(n.id.clone(), target.clone())
                            .with_port(c.label.clone())
                            .with_color(speaker_color(&n.speaker)),
                    )
                })
            })
            .collect()
    }
}

/// Stable per-speaker tint so outgoing lines group visually.
fn speaker_color(speaker: &str) -> Color32 {
    let hash = speaker
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let palette = [
        Color32::from_rgb(238, 207, 109),
        Color32::from_rgb(109, 238, 150),
        Color32::from_rgb(180, 109, 238),
        Color32::from_rgb(109, 200, 238),
        Color32::from_rgb(238, 130, 109),
    ];
    palette[(hash as usize) % palette.len()]
}

const SAMPLE: &str = r#"{
  "nodes": [
    {
      "id": "greeting",
      "speaker": "Innkeeper",
      "text": "Evening, traveler. Room, or just the fire?",
      "choices": [
        { "label": "Ask about the room", "target": "room" },
        { "label": "Ask about rumors", "target": "rumors" }
      ],
      "position": [40.0, 120.0]
    },
    {
      "id": "room",
      "speaker": "Innkeeper",
      "text": "Two silver a night, breakfast included.",
      "choices": [
        { "label": "Pay", "target": "rest" },
        { "label": "Too steep", "target": "rumors" }
      ],
      "position": [360.0, 20.0]
    },
    {
      "id": "rumors",
      "speaker": "Innkeeper",
      "text": "They say the old mill light burns at midnight again.",
      "choices": [
        { "label": "Press for details" }
      ],
      "position": [360.0, 240.0]
    },
    {
      "id": "rest",
      "speaker": "Narrator",
      "text": "You sleep soundly. The road can wait until morning.",
      "position": [680.0, 120.0]
    }
  ]
}"#;
