//! Visual encoding shared by both renderers: which color an element takes
//! for the current selection, which legend goes with it, and the tooltips.

use log::warn;

use crate::attribute::{LinkAttribute, SubPopulation, ZoneAttribute, series_name};
use crate::config::ViewConfig;
use crate::legend::LegendSpec;
use crate::model::{CentroidMetrics, Edge, FlowSeries, GraphDataset, Node, NodeKind, ResultsDataset};

/// `value / max`, or 0 when the ratio is not a finite number.
pub fn safe_ratio(value: f64, max: f64) -> f64 {
	let ratio = value / max;
	if ratio.is_finite() { ratio } else { 0.0 }
}

fn color_or(color: &str, fallback: &str) -> String {
	let chosen = if color.is_empty() { fallback } else { color };
	chosen.to_string()
}

/// Centroid coloring for one zone attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct ZonePaint {
	attribute: ZoneAttribute,
	max: f64,
	default_color: String,
	/// Legend to show, if the attribute has one.
	pub legend: Option<LegendSpec>,
}

impl ZonePaint {
	/// Coloring for `attribute` over `graph`.
	pub fn new(attribute: ZoneAttribute, graph: &GraphDataset, config: &ViewConfig) -> Self {
		let domain = attribute.domain(graph);
		let legend = domain.zip(attribute.colorscale(graph)).map(|(domain, scale)| LegendSpec {
			colorscale: scale.clone(),
			domain,
		});
		Self {
			attribute,
			max: domain.map_or(0.0, |domain| domain.max),
			default_color: config.zone_color.clone(),
			legend,
		}
	}

	/// Fill of a centroid.
	pub fn color(&self, metrics: &CentroidMetrics) -> String {
		match self.attribute.measure(metrics) {
			Some(measure) => color_or(&measure.color, &self.default_color),
			None => self.default_color.clone(),
		}
	}

	/// Value relative to the dataset maximum; `None` when no attribute is
	/// selected.
	pub fn ratio(&self, metrics: &CentroidMetrics) -> Option<f64> {
		self.attribute
			.measure(metrics)
			.map(|measure| safe_ratio(measure.value, self.max))
	}
}

#[derive(Clone, Copy, Debug)]
enum LinkSource<'a> {
	Default,
	Static(LinkAttribute),
	Period {
		series: &'a FlowSeries,
		period: usize,
		name: &'static str,
		population: SubPopulation,
	},
}

/// Link coloring for one link attribute at one period.
#[derive(Clone, Debug)]
pub struct LinkPaint<'a> {
	source: LinkSource<'a>,
	default_color: String,
	/// Legend to show, if the attribute has one.
	pub legend: Option<LegendSpec>,
}

impl<'a> LinkPaint<'a> {
	/// Time-varying attributes read `population` at `period`; a series the
	/// results lack falls back to the default color.
	pub fn new(
		attribute: LinkAttribute,
		population: SubPopulation,
		period: usize,
		graph: &GraphDataset,
		results: Option<&'a ResultsDataset>,
		config: &ViewConfig,
	) -> Self {
		let default_color = config.link_color.clone();
		if let Some(metric) = attribute.flow_metric() {
			let series = results.and_then(|results| {
				results
					.series(metric, population)
					.map(|series| (series, &results.colorscale))
			});
			return match series {
				Some((series, colorscale)) => Self {
					source: LinkSource::Period {
						series,
						period,
						name: metric.label(),
						population,
					},
					default_color,
					legend: Some(LegendSpec {
						colorscale: colorscale.clone(),
						domain: series.stats,
					}),
				},
				None => {
					warn!(
						"no results series {}, links keep the default color",
						series_name(metric, population)
					);
					Self {
						source: LinkSource::Default,
						default_color,
						legend: None,
					}
				}
			};
		}

		let legend = attribute
			.static_domain(graph)
			.zip(attribute.static_colorscale(graph))
			.map(|(domain, scale)| LegendSpec {
				colorscale: scale.clone(),
				domain,
			});
		let source = match attribute {
			LinkAttribute::None => LinkSource::Default,
			attribute => LinkSource::Static(attribute),
		};
		Self {
			source,
			default_color,
			legend,
		}
	}

	/// Stroke of a link.
	pub fn color(&self, edge: &Edge) -> String {
		let color = match self.source {
			LinkSource::Default => None,
			LinkSource::Static(attribute) => attribute.static_color(edge),
			LinkSource::Period { series, period, .. } => series.color(&edge.id, period),
		};
		color_or(color.unwrap_or_default(), &self.default_color)
	}

	/// Tooltip line for the shown period, e.g. `In-flow (H): 12`.
	pub fn period_line(&self, edge: &Edge) -> Option<String> {
		match self.source {
			LinkSource::Period {
				series,
				period,
				name,
				population,
			} => series
				.value(&edge.id, period)
				.map(|value| format!("{name} ({population}): {value}")),
			_ => None,
		}
	}
}

/// Hover text of a node.
pub fn node_label(node: &Node) -> String {
	match &node.kind {
		NodeKind::Centroid(metrics) => format!(
			"{}\n({}, {})\nDepartures: {}\nArrivals: {}",
			node.name, node.x, node.y, metrics.departures.value, metrics.arrivals.value
		),
		NodeKind::Crossing => format!("{}\n({}, {})", node.name, node.x, node.y),
	}
}

/// Hover text of a link.
pub fn link_label(edge: &Edge, paint: &LinkPaint<'_>) -> String {
	let mut label = format!(
		"{}\nLanes: {}\nLength: {}\nSpeed: {}\nType: {}\nCapacity: {}",
		edge.name,
		edge.lanes.value,
		edge.length.value,
		edge.speed.value,
		edge.link_type.name,
		edge.capacity.value
	);
	if let Some(line) = paint.period_line(edge) {
		label.push('\n');
		label.push_str(&line);
	}
	label
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::attribute::FlowMetric;
	use crate::model::{
		ColorScale, ColorScales, LinkType, Measure, Range, Schedule, Statistics,
	};

	fn measure(value: f64, color: &str) -> Measure {
		Measure {
			value,
			color: color.to_string(),
		}
	}

	fn graph() -> GraphDataset {
		let centroid = Node {
			id: "1".into(),
			name: "Zone 1".into(),
			x: 0.0,
			y: 5.0,
			kind: NodeKind::Centroid(CentroidMetrics {
				departures: measure(10.0, "dep"),
				arrivals: measure(0.0, ""),
				averages: measure(5.0, "ave"),
			}),
		};
		let crossing = Node {
			id: "2".into(),
			name: "X".into(),
			x: 3.0,
			y: 4.0,
			kind: NodeKind::Crossing,
		};
		let edge = Edge {
			id: "7".into(),
			name: "Main".into(),
			source: "1".into(),
			target: "2".into(),
			geometry: None,
			lanes: measure(2.0, "lanes"),
			length: measure(5.0, "length"),
			speed: measure(50.0, "speed"),
			capacity: measure(1800.0, "cap"),
			link_type: LinkType {
				name: "urban".into(),
				color: "type".into(),
			},
		};
		let stats = Statistics {
			departures: Range::new(0.0, 20.0),
			arrivals: Range::new(0.0, 0.0),
			speed: Range::new(30.0, 90.0),
			..Statistics::default()
		};
		let colorscales = ColorScales {
			departures: ColorScale::new(vec!["a".into(), "b".into()]),
			speed: ColorScale::new(vec!["s".into()]),
			..ColorScales::default()
		};
		GraphDataset::new(vec![centroid, crossing], vec![edge], stats, colorscales).unwrap()
	}

	fn results() -> ResultsDataset {
		let series = FlowSeries::new(
			Range::new(0.0, 12.0),
			HashMap::from([("7".to_string(), vec!["p0".to_string(), "p1".to_string()])]),
			HashMap::from([("7".to_string(), vec![3.0, 12.0])]),
		);
		ResultsDataset::new(
			ColorScale::new(vec!["r0".into(), "r1".into(), "r2".into()]),
			Schedule::new(0.0, 10.0, 2),
			HashMap::from([((FlowMetric::InFlow, SubPopulation::H), series)]),
		)
	}

	#[test]
	fn zero_maximum_gives_zero_ratio() {
		assert_eq!(safe_ratio(5.0, 0.0), 0.0);
		assert_eq!(safe_ratio(0.0, 0.0), 0.0);
		assert_eq!(safe_ratio(5.0, 10.0), 0.5);
	}

	#[test]
	fn zone_paint_uses_precomputed_colors() {
		let graph = graph();
		let config = ViewConfig::default();
		let metrics = graph.nodes[0].metrics().unwrap();

		let none = ZonePaint::new(ZoneAttribute::None, &graph, &config);
		assert_eq!(none.color(metrics), config.zone_color);
		assert_eq!(none.ratio(metrics), None);
		assert!(none.legend.is_none());

		let departures = ZonePaint::new(ZoneAttribute::Departures, &graph, &config);
		assert_eq!(departures.color(metrics), "dep");
		assert_eq!(departures.ratio(metrics), Some(0.5));
		let legend = departures.legend.unwrap();
		assert_eq!(legend.domain, Range::new(0.0, 20.0));
		assert_eq!(legend.colorscale.len(), 2);

		let arrivals = ZonePaint::new(ZoneAttribute::Arrivals, &graph, &config);
		assert_eq!(arrivals.ratio(metrics), Some(0.0));
		assert_eq!(arrivals.color(metrics), config.zone_color);
	}

	#[test]
	fn static_link_paint() {
		let graph = graph();
		let config = ViewConfig::default();
		let paint = LinkPaint::new(
			LinkAttribute::Speed,
			SubPopulation::H,
			0,
			&graph,
			None,
			&config,
		);
		assert_eq!(paint.color(&graph.edges[0]), "speed");
		assert_eq!(paint.legend.as_ref().unwrap().domain, Range::new(30.0, 90.0));

		let none = LinkPaint::new(LinkAttribute::None, SubPopulation::H, 0, &graph, None, &config);
		assert_eq!(none.color(&graph.edges[0]), config.link_color);
		assert!(none.legend.is_none());
	}

	#[test]
	fn period_link_paint_reads_results() {
		let graph = graph();
		let results = results();
		let config = ViewConfig::default();
		let inflow = LinkAttribute::Flow(FlowMetric::InFlow);

		let paint = LinkPaint::new(inflow, SubPopulation::H, 1, &graph, Some(&results), &config);
		assert_eq!(paint.color(&graph.edges[0]), "p1");
		let legend = paint.legend.as_ref().unwrap();
		assert_eq!(legend.colorscale.len(), 3);
		assert_eq!(legend.domain, Range::new(0.0, 12.0));
		assert!(link_label(&graph.edges[0], &paint).ends_with("In-flow (H): 12"));

		let past_end = LinkPaint::new(inflow, SubPopulation::H, 9, &graph, Some(&results), &config);
		assert_eq!(past_end.color(&graph.edges[0]), config.link_color);

		let missing = LinkPaint::new(inflow, SubPopulation::S, 0, &graph, Some(&results), &config);
		assert_eq!(missing.color(&graph.edges[0]), config.link_color);
		assert!(missing.legend.is_none());
	}

	#[test]
	fn tooltips() {
		let graph = graph();
		assert_eq!(
			node_label(&graph.nodes[0]),
			"Zone 1\n(0, 5)\nDepartures: 10\nArrivals: 0"
		);
		assert_eq!(node_label(&graph.nodes[1]), "X\n(3, 4)");
		let paint = LinkPaint::new(
			LinkAttribute::None,
			SubPopulation::H,
			0,
			&graph,
			None,
			&ViewConfig::default(),
		);
		assert_eq!(
			link_label(&graph.edges[0], &paint),
			"Main\nLanes: 2\nLength: 5\nSpeed: 50\nType: urban\nCapacity: 1800"
		);
	}
}
