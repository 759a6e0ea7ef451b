//! Host-side rendering hook, decoupling the canvas from any particular
//! node content.

use crate::types::NodeView;

/// Paints the interior of a node. The canvas owns position, chrome, ports
/// and selection styling; everything inside the body is the host's.
pub trait NodeContent {
    /// Fill the node's surface. Called every frame for every node. The rect
    /// the `ui` settles into is measured afterwards and becomes the node's
    /// recorded size, so connection anchors track the real rendered extent.
    ///
    /// Content-level widgets (buttons, text edits) are the host's own;
    /// note that pressing anywhere on the body also selects and drags the
    /// node.
    fn show(&mut self, node: &NodeView, ui: &mut egui::Ui);
}
