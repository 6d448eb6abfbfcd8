//! Canvas renderer for large networks.

mod component;
mod render;
mod state;

pub use component::ForceGraphCanvas;
pub use state::{LargeNetworkState, LinkStyle, NodeInfo, SizeBounds};
