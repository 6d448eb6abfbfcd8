//! Current selection of the control panel.

use log::warn;

use crate::attribute::{LinkAttribute, SubPopulation, ZoneAttribute};

/// Everything the renderers need to know about the controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
	/// Centroid coloring.
	pub zone: ZoneAttribute,
	/// Link coloring.
	pub link: LinkAttribute,
	/// Demand class of time-varying colors.
	pub population: SubPopulation,
	/// Shown results period.
	pub period: usize,
	/// Scale applied to every size.
	pub size_multiplier: f64,
}

impl Default for ViewState {
	fn default() -> Self {
		Self {
			zone: ZoneAttribute::None,
			link: LinkAttribute::None,
			population: SubPopulation::H,
			period: 0,
			size_multiplier: 1.0,
		}
	}
}

/// Which redraws a state change calls for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Redraw {
	/// Sizes changed.
	pub size: bool,
	/// Centroid colors changed.
	pub zones: bool,
	/// Link colors changed.
	pub links: bool,
}

impl Redraw {
	/// A full draw.
	pub const ALL: Self = Self {
		size: true,
		zones: true,
		links: true,
	};

	/// Nothing to redraw.
	pub fn is_empty(&self) -> bool {
		!(self.size || self.zones || self.links)
	}
}

impl ViewState {
	/// Default selection at a size slider position.
	pub fn with_size_percent(percent: u32) -> Self {
		Self {
			size_multiplier: multiplier_from_percent(percent),
			..Self::default()
		}
	}

	/// Select a link attribute. Time-varying attributes are refused when no
	/// results were loaded, leaving the state untouched.
	pub fn select_link(&mut self, attribute: LinkAttribute, has_results: bool) -> bool {
		if attribute.is_time_varying() && !has_results {
			warn!("{} needs simulation results", attribute.label());
			return false;
		}
		self.link = attribute;
		true
	}

	/// Move to `period`, clamped to the recorded range.
	pub fn select_period(&mut self, period: usize, period_count: usize) {
		self.period = period.min(period_count.saturating_sub(1));
	}

	/// Redraws needed to go from `previous` to `self`. The first draw does
	/// everything.
	pub fn redraw_since(&self, previous: Option<&ViewState>) -> Redraw {
		let Some(previous) = previous else {
			return Redraw::ALL;
		};
		let time_changed = self.link.is_time_varying()
			&& (self.period != previous.period || self.population != previous.population);
		Redraw {
			size: self.size_multiplier != previous.size_multiplier,
			zones: self.zone != previous.zone,
			links: self.link != previous.link || time_changed,
		}
	}

	/// Whether the time slider and sub-population toggle are shown.
	pub fn time_controls_visible(&self, has_results: bool) -> bool {
		has_results && self.link.is_time_varying()
	}
}

/// Size multiplier of a slider position; 100 is 1.
pub fn multiplier_from_percent(percent: u32) -> f64 {
	f64::from(percent) / 100.0
}

/// Text next to the size slider.
pub fn size_readout(percent: u32) -> String {
	format!("{percent} %")
}

/// Height left for each legend below the controls and the label.
pub fn legend_container_height(
	viewport_height: f64,
	controls_height: f64,
	label_height: f64,
	fixed_margin: f64,
) -> f64 {
	(viewport_height - controls_height - label_height - fixed_margin).max(0.0)
}
