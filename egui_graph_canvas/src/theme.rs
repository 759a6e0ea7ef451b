//! Theming for the graph canvas.

use egui::Color32;

/// Colors and metrics for everything the canvas draws itself. Node
/// interiors are painted by the host and are not themed here.
#[derive(Clone, Debug)]
pub struct CanvasTheme {
    pub background_color: Color32,
    pub grid_color: Color32,
    pub grid_spacing: f32,
    pub node_body_color: Color32,
    pub node_border_color: Color32,
    pub node_rounding: f32,
    /// Outline for the selected node, also the minimap highlight.
    pub selection_color: Color32,
    pub connection_color: Color32,
    /// Dashed curve while a connection drag is in flight.
    pub pending_connection_color: Color32,
    pub input_port_color: Color32,
    pub output_port_color: Color32,
    pub port_radius: f32,
    pub minimap_background: Color32,
    pub minimap_border: Color32,
    pub minimap_node_color: Color32,
    pub minimap_viewport_color: Color32,
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(30, 30, 30),
            grid_color: Color32::from_rgb(40, 40, 40),
            grid_spacing: 50.0,
            node_body_color: Color32::from_rgb(45, 45, 50),
            node_border_color: Color32::from_rgb(70, 70, 78),
            node_rounding: 4.0,
            selection_color: Color32::from_rgb(100, 150, 255),
            connection_color: Color32::from_rgb(180, 180, 180),
            pending_connection_color: Color32::from_rgb(200, 200, 200),
            input_port_color: Color32::from_rgb(109, 200, 238),
            output_port_color: Color32::from_rgb(238, 207, 109),
            port_radius: 5.0,
            minimap_background: Color32::from_rgba_unmultiplied(20, 20, 20, 220),
            minimap_border: Color32::from_rgb(70, 70, 78),
            minimap_node_color: Color32::from_rgb(150, 150, 150),
            minimap_viewport_color: Color32::from_rgb(220, 220, 220),
        }
    }
}
