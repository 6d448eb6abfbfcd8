//! Attribute selectors for centroid ("zone") and link coloring.
//!
//! Each selector value maps to the accessors that yield its colors, its legend
//! domain and its color scale. Unknown selector strings fall back to `None`.

use std::fmt;

use log::warn;

use crate::model::{CentroidMetrics, ColorScale, Edge, GraphDataset, Measure, Range};

/// What colors and sizes the centroids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZoneAttribute {
	/// Every centroid takes the default zone color.
	#[default]
	None,
	/// Trips leaving the centroid.
	Departures,
	/// Trips reaching the centroid.
	Arrivals,
	/// Mean of departures and arrivals.
	Averages,
}

impl ZoneAttribute {
	/// Dropdown order.
	pub const ALL: [Self; 4] = [Self::None, Self::Departures, Self::Arrivals, Self::Averages];

	/// Parse a dropdown value, falling back to `None`.
	pub fn from_selector(value: &str) -> Self {
		match value {
			"none" => Self::None,
			"departures" => Self::Departures,
			"arrivals" => Self::Arrivals,
			"averages" => Self::Averages,
			other => {
				warn!("unknown zone attribute {other:?}, using none");
				Self::None
			}
		}
	}

	/// Dropdown value.
	pub fn selector(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Departures => "departures",
			Self::Arrivals => "arrivals",
			Self::Averages => "averages",
		}
	}

	/// Human-readable name, also the legend title.
	pub fn label(self) -> &'static str {
		match self {
			Self::None => "None",
			Self::Departures => "Departures",
			Self::Arrivals => "Arrivals",
			Self::Averages => "Average of departures and arrivals",
		}
	}

	/// The centroid's value and color for this attribute.
	pub fn measure(self, metrics: &CentroidMetrics) -> Option<&Measure> {
		match self {
			Self::None => None,
			Self::Departures => Some(&metrics.departures),
			Self::Arrivals => Some(&metrics.arrivals),
			Self::Averages => Some(&metrics.averages),
		}
	}

	/// Zone legends always start at zero.
	pub fn domain(self, graph: &GraphDataset) -> Option<Range> {
		let stats = match self {
			Self::None => return None,
			Self::Departures => graph.stats.departures,
			Self::Arrivals => graph.stats.arrivals,
			Self::Averages => graph.stats.averages,
		};
		Some(Range::new(0.0, stats.max))
	}

	/// Palette of the zone legend.
	pub fn colorscale(self, graph: &GraphDataset) -> Option<&ColorScale> {
		match self {
			Self::None => None,
			Self::Departures => Some(&graph.colorscales.departures),
			Self::Arrivals => Some(&graph.colorscales.arrivals),
			Self::Averages => Some(&graph.colorscales.averages),
		}
	}
}

/// Per-period quantity recorded by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowMetric {
	/// Vehicles entering the link.
	InFlow,
	/// Vehicles leaving the link.
	OutFlow,
	/// Time to traverse the link.
	TravelTime,
}

impl FlowMetric {
	/// Every recorded metric.
	pub const ALL: [Self; 3] = [Self::InFlow, Self::OutFlow, Self::TravelTime];

	/// Series name prefix in the results payload.
	pub fn key(self) -> &'static str {
		match self {
			Self::InFlow => "phi_in",
			Self::OutFlow => "phi_out",
			Self::TravelTime => "ttime",
		}
	}

	/// Human-readable name.
	pub fn label(self) -> &'static str {
		match self {
			Self::InFlow => "In-flow",
			Self::OutFlow => "Out-flow",
			Self::TravelTime => "Travel time",
		}
	}
}

/// Demand class whose flows are tracked separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubPopulation {
	/// The `H` class, shown by default.
	#[default]
	H,
	/// The `S` class.
	S,
}

impl SubPopulation {
	/// Both classes.
	pub const ALL: [Self; 2] = [Self::H, Self::S];

	/// Parse a dropdown value, falling back to `H`.
	pub fn from_selector(value: &str) -> Self {
		match value {
			"h" | "H" => Self::H,
			"s" | "S" => Self::S,
			other => {
				warn!("unknown sub-population {other:?}, using H");
				Self::H
			}
		}
	}

	/// Dropdown value.
	pub fn selector(self) -> &'static str {
		match self {
			Self::H => "h",
			Self::S => "s",
		}
	}

	/// Series name suffix in the results payload.
	pub fn key(self) -> &'static str {
		match self {
			Self::H => "H",
			Self::S => "S",
		}
	}
}

impl fmt::Display for SubPopulation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// Name of a results series, e.g. `phi_in_H`.
pub fn series_name(metric: FlowMetric, population: SubPopulation) -> String {
	format!("{}_{}", metric.key(), population.key())
}

/// What colors the links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkAttribute {
	/// Every link takes the default link color.
	#[default]
	None,
	/// Number of lanes.
	Lanes,
	/// Link length.
	Length,
	/// Free-flow speed.
	Speed,
	/// Link capacity.
	Capacity,
	/// Volume-delay function.
	Type,
	/// A time-varying results series.
	Flow(FlowMetric),
}

impl LinkAttribute {
	/// Attributes available without simulation results.
	pub const STATIC: [Self; 6] = [
		Self::None,
		Self::Lanes,
		Self::Length,
		Self::Speed,
		Self::Capacity,
		Self::Type,
	];

	/// Parse a dropdown value, falling back to `None`.
	pub fn from_selector(value: &str) -> Self {
		match value {
			"none" => Self::None,
			"lanes" => Self::Lanes,
			"length" => Self::Length,
			"speed" => Self::Speed,
			"capacity" => Self::Capacity,
			"type" => Self::Type,
			"phi_in" | "inflow" => Self::Flow(FlowMetric::InFlow),
			"phi_out" | "outflow" => Self::Flow(FlowMetric::OutFlow),
			"ttime" | "traveltime" => Self::Flow(FlowMetric::TravelTime),
			other => {
				warn!("unknown link attribute {other:?}, using none");
				Self::None
			}
		}
	}

	/// Dropdown value; flows use their series prefix.
	pub fn selector(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Lanes => "lanes",
			Self::Length => "length",
			Self::Speed => "speed",
			Self::Capacity => "capacity",
			Self::Type => "type",
			Self::Flow(metric) => metric.key(),
		}
	}

	/// Human-readable name, also the legend title.
	pub fn label(self) -> &'static str {
		match self {
			Self::None => "None",
			Self::Lanes => "Lanes",
			Self::Length => "Length",
			Self::Speed => "Speed",
			Self::Capacity => "Capacity",
			Self::Type => "Type",
			Self::Flow(metric) => metric.label(),
		}
	}

	/// Time-varying attributes read the results payload.
	pub fn flow_metric(self) -> Option<FlowMetric> {
		match self {
			Self::Flow(metric) => Some(metric),
			_ => None,
		}
	}

	/// Whether the attribute changes with the period.
	pub fn is_time_varying(self) -> bool {
		self.flow_metric().is_some()
	}

	/// Precomputed color of a static attribute.
	pub fn static_color(self, edge: &Edge) -> Option<&str> {
		let color = match self {
			Self::None | Self::Flow(_) => return None,
			Self::Lanes => &edge.lanes.color,
			Self::Length => &edge.length.color,
			Self::Speed => &edge.speed.color,
			Self::Capacity => &edge.capacity.color,
			Self::Type => &edge.link_type.color,
		};
		Some(color)
	}

	/// Legend domain of a static attribute; types span `[0, nb]`.
	pub fn static_domain(self, graph: &GraphDataset) -> Option<Range> {
		let stats = &graph.stats;
		match self {
			Self::None | Self::Flow(_) => None,
			Self::Lanes => Some(stats.lanes),
			Self::Length => Some(stats.length),
			Self::Speed => Some(stats.speed),
			Self::Capacity => Some(stats.capacity),
			Self::Type => Some(Range::new(0.0, stats.link_type.nb as f64)),
		}
	}

	/// Palette of a static attribute.
	pub fn static_colorscale(self, graph: &GraphDataset) -> Option<&ColorScale> {
		let scales = &graph.colorscales;
		match self {
			Self::None | Self::Flow(_) => None,
			Self::Lanes => Some(&scales.lanes),
			Self::Length => Some(&scales.length),
			Self::Speed => Some(&scales.speed),
			Self::Capacity => Some(&scales.capacity),
			Self::Type => Some(&scales.link_type),
		}
	}

	/// Every selectable attribute, time-varying ones only with results.
	pub fn available(has_results: bool) -> Vec<Self> {
		let mut attributes = Self::STATIC.to_vec();
		if has_results {
			attributes.extend(FlowMetric::ALL.map(Self::Flow));
		}
		attributes
	}
}
