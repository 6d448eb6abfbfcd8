//! The contract both network renderers fulfil, and the one-time choice
//! between them.

use log::info;

use crate::config::ViewConfig;
use crate::legend::LegendBoard;
use crate::view_state::{Redraw, ViewState};

/// A backend that draws the network for a given view state.
///
/// All three operations are idempotent: calling them twice with the same
/// state leaves the same visuals and exactly one legend per dimension.
pub trait NetworkRenderer {
	/// Recompute element sizes from `view.size_multiplier`.
	fn set_size(&mut self, view: &ViewState);

	/// Recolor (and, where sizes depend on it, resize) the centroids.
	fn draw_zones(&mut self, view: &ViewState);

	/// Recolor the links.
	fn draw_links(&mut self, view: &ViewState);

	/// Legends matching the last draw.
	fn legends(&self) -> &LegendBoard;

	/// Whether time-varying colors honour the selected sub-population.
	fn supports_sub_population(&self) -> bool;
}

/// Bring `renderer` from `previous` to `next`, redrawing only what changed.
pub fn apply_view<R: NetworkRenderer + ?Sized>(
	renderer: &mut R,
	previous: Option<&ViewState>,
	next: &ViewState,
) -> Redraw {
	let redraw = next.redraw_since(previous);
	if redraw.size {
		renderer.set_size(next);
	}
	if redraw.zones {
		renderer.draw_zones(next);
	}
	if redraw.links {
		renderer.draw_links(next);
	}
	redraw
}

/// Which renderer a session uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererKind {
	/// Exact SVG geometry.
	Small,
	/// Canvas drawing through the force-graph engine.
	Large,
}

impl RendererKind {
	/// Honour the page's flag, else compare the link count to the threshold.
	pub fn select(large_network: Option<bool>, link_count: usize, config: &ViewConfig) -> Self {
		let large =
			large_network.unwrap_or(link_count > config.large_network_threshold);
		let kind = if large { Self::Large } else { Self::Small };
		info!("{link_count} links, using the {kind:?} network renderer");
		kind
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attribute::{LinkAttribute, ZoneAttribute};

	#[derive(Default)]
	struct Recorder {
		calls: Vec<&'static str>,
		legends: LegendBoard,
	}

	impl NetworkRenderer for Recorder {
		fn set_size(&mut self, _: &ViewState) {
			self.calls.push("size");
		}

		fn draw_zones(&mut self, _: &ViewState) {
			self.calls.push("zones");
		}

		fn draw_links(&mut self, _: &ViewState) {
			self.calls.push("links");
		}

		fn legends(&self) -> &LegendBoard {
			&self.legends
		}

		fn supports_sub_population(&self) -> bool {
			false
		}
	}

	#[test]
	fn first_view_draws_everything() {
		let mut recorder = Recorder::default();
		apply_view(&mut recorder, None, &ViewState::default());
		assert_eq!(recorder.calls, ["size", "zones", "links"]);
	}

	#[test]
	fn later_views_redraw_what_changed() {
		let mut recorder = Recorder::default();
		let base = ViewState::default();
		let next = ViewState {
			zone: ZoneAttribute::Arrivals,
			link: LinkAttribute::Lanes,
			..base
		};
		apply_view(&mut recorder, Some(&base), &next);
		assert_eq!(recorder.calls, ["zones", "links"]);

		recorder.calls.clear();
		apply_view(&mut recorder, Some(&next), &next);
		assert!(recorder.calls.is_empty());
	}

	#[test]
	fn selection_prefers_the_flag() {
		let config = ViewConfig::default();
		assert_eq!(RendererKind::select(None, 1000, &config), RendererKind::Small);
		assert_eq!(RendererKind::select(None, 1001, &config), RendererKind::Large);
		assert_eq!(RendererKind::select(Some(false), 5000, &config), RendererKind::Small);
		assert_eq!(RendererKind::select(Some(true), 3, &config), RendererKind::Large);
	}
}
