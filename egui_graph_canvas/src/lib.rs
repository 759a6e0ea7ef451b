//! Pannable, zoomable node-graph canvas widget for egui.
//!
//! The canvas owns the pan/zoom transform, all pointer interpretation
//! (panning, node drags, live connection drags, minimap navigation) and the
//! bezier connection renderer. Hosts supply node and connection data, paint
//! node interiors through the [`NodeContent`] trait, and react to the
//! [`GraphEvent`]s returned from [`GraphCanvas::show`].

pub mod drawing;
mod interactions;
pub mod minimap;
pub mod state;
pub mod theme;
pub mod traits;
pub mod transform;
pub mod types;
pub mod widget;

pub use state::{CanvasState, InteractionMode};
pub use theme::CanvasTheme;
pub use traits::NodeContent;
pub use transform::CanvasTransform;
pub use types::{ConnectionView, GraphEvent, NodeId, NodeView};
pub use widget::{CanvasOptions, GraphCanvas};
