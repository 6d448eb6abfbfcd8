//! View configuration, overridable from a `#view-config` JSON element.

use serde::Deserialize;

/// Tunables shared by both renderers, the legends and the control panel.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ViewConfig {
	/// Links with more lanes are drawn as wide as links with exactly this many.
	#[serde(default = "default_max_lanes")]
	pub max_lanes: f64,

	/// Above this many links the canvas renderer is used.
	#[serde(default = "default_large_network_threshold")]
	pub large_network_threshold: usize,

	/// Width of each legend, in pixels.
	#[serde(default = "default_legend_width")]
	pub legend_width: f64,

	/// Space above and below a legend's axis.
	#[serde(default = "default_legend_margin")]
	pub legend_margin: f64,

	/// Approximate number of axis ticks.
	#[serde(default = "default_legend_ticks")]
	pub legend_ticks: usize,

	/// Space kept below the legends when fitting them to the window.
	#[serde(default = "default_legend_fixed_margin")]
	pub legend_fixed_margin: f64,

	/// Centroid color when no zone attribute is selected.
	#[serde(default = "default_zone_color")]
	pub zone_color: String,

	/// Link color when no link attribute applies.
	#[serde(default = "default_link_color")]
	pub link_color: String,

	/// Crossings are never recolored.
	#[serde(default = "default_crossing_color")]
	pub crossing_color: String,

	/// Initial size slider position, where 100 is a multiplier of 1.
	#[serde(default = "default_size_percent")]
	pub default_size_percent: u32,

	/// Upper end of the size slider.
	#[serde(default = "default_max_size_percent")]
	pub max_size_percent: u32,

	/// Let the force simulation move large-network nodes away from their
	/// coordinates.
	#[serde(default)]
	pub relax_layout: bool,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			max_lanes: default_max_lanes(),
			large_network_threshold: default_large_network_threshold(),
			legend_width: default_legend_width(),
			legend_margin: default_legend_margin(),
			legend_ticks: default_legend_ticks(),
			legend_fixed_margin: default_legend_fixed_margin(),
			zone_color: default_zone_color(),
			link_color: default_link_color(),
			crossing_color: default_crossing_color(),
			default_size_percent: default_size_percent(),
			max_size_percent: default_max_size_percent(),
			relax_layout: false,
		}
	}
}

impl ViewConfig {
	/// Parse a JSON override document; absent fields keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Radius of a crossing in units of the network size.
	pub fn crossing_factor(&self) -> f64 {
		self.max_lanes + 1.0
	}
}

fn default_max_lanes() -> f64 {
	4.0
}

fn default_large_network_threshold() -> usize {
	1000
}

fn default_legend_width() -> f64 {
	100.0
}

fn default_legend_margin() -> f64 {
	10.0
}

fn default_legend_ticks() -> usize {
	10
}

fn default_legend_fixed_margin() -> f64 {
	50.0
}

fn default_zone_color() -> String {
	"rgba(0, 0, 255, .8)".to_string()
}

fn default_link_color() -> String {
	"rgba(255, 0, 0, .8)".to_string()
}

fn default_crossing_color() -> String {
	"black".to_string()
}

fn default_size_percent() -> u32 {
	100
}

fn default_max_size_percent() -> u32 {
	200
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_yields_defaults() {
		let config = ViewConfig::from_json("{}").unwrap();
		assert_eq!(config, ViewConfig::default());
		assert_eq!(config.crossing_factor(), 5.0);
	}

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config =
			ViewConfig::from_json(r#"{ "max_lanes": 6, "relax_layout": true }"#).unwrap();
		assert_eq!(config.max_lanes, 6.0);
		assert!(config.relax_layout);
		assert_eq!(config.large_network_threshold, 1000);
		assert_eq!(config.link_color, "rgba(255, 0, 0, .8)");
	}
}
