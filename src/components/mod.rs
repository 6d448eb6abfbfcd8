//! Leptos components and the renderer states behind them.

pub mod controls;
pub mod force_graph;
pub mod legend;
pub mod svg_network;
pub mod viewport;
