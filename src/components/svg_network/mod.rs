//! SVG renderer for small networks.

mod component;
mod scene;

pub use component::SvgNetwork;
pub use scene::{LinkVisual, NodeVisual, SmallNetworkScene};
