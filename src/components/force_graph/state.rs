use std::collections::HashMap;
use std::sync::Arc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::attribute::SubPopulation;
use crate::components::viewport::{PanState, ViewTransform, ZoomBounds, fit_to_viewport};
use crate::config::ViewConfig;
use crate::encoding::{LinkPaint, ZonePaint};
use crate::legend::{LegendBoard, LegendDimension};
use crate::model::{GraphDataset, ResultsDataset};
use crate::renderer::NetworkRenderer;
use crate::view_state::ViewState;

/// Size magnitudes the engine interpolates between.
const CENTROID_MAGNITUDE: f64 = 500.0;
const CROSSING_MAGNITUDE: f64 = 1.0;

/// Extra pixels around a link that still count as a click on it.
const EDGE_HIT_SLOP: f64 = 3.0;

/// Per-node data carried by the engine.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Index into the dataset's nodes.
	pub node: usize,
	/// Whether the node is a centroid.
	pub centroid: bool,
	/// Fill color.
	pub color: String,
	/// Size before interpolation.
	pub magnitude: f64,
}

/// How one link is drawn.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Index into the dataset's edges.
	pub edge: usize,
	/// Engine index of the source node.
	pub source: DefaultNodeIdx,
	/// Engine index of the target node.
	pub target: DefaultNodeIdx,
	/// Stroke color.
	pub color: String,
	/// Width before interpolation: lanes, capped.
	pub magnitude: f64,
}

/// Rendered sizes are interpolated into `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeBounds {
	/// Size of the smallest magnitude.
	pub min: f64,
	/// Size of the largest magnitude.
	pub max: f64,
}

impl SizeBounds {
	fn scaled(unit: f64, min: f64, max: f64) -> Self {
		Self {
			min: min * unit,
			max: max * unit,
		}
	}

	/// Map `value` from the `[lo, hi]` magnitude range into the bounds.
	pub fn interpolate(&self, value: f64, (lo, hi): (f64, f64)) -> f64 {
		let span = hi - lo;
		if span > 0.0 {
			self.min + (value - lo) / span * (self.max - self.min)
		} else {
			self.min
		}
	}
}

fn magnitude_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
	values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
		(lo.min(v), hi.max(v))
	})
}

/// Canvas scene of a large network, laid out by the force-graph engine.
pub struct LargeNetworkState {
	/// Layout engine holding the nodes.
	pub graph: ForceGraph<NodeInfo, ()>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Zoom limits from the initial fit.
	pub zoom: ZoomBounds,
	/// Background drag in progress.
	pub pan: PanState,
	/// Canvas width, in pixels.
	pub width: f64,
	/// Canvas height, in pixels.
	pub height: f64,
	/// Seconds of animation so far; drives the dash offset.
	pub flow_time: f64,
	/// Time-varying colors animate the link dashes.
	pub flowing: bool,
	dataset: Arc<GraphDataset>,
	results: Option<Arc<ResultsDataset>>,
	config: ViewConfig,
	links: Vec<LinkStyle>,
	node_sizes: SizeBounds,
	edge_sizes: SizeBounds,
	node_range: (f64, f64),
	link_range: (f64, f64),
	legends: LegendBoard,
}

impl LargeNetworkState {
	/// Nodes start at their coordinates and stay pinned there unless
	/// `relax_layout` is set.
	pub fn new(
		dataset: Arc<GraphDataset>,
		results: Option<Arc<ResultsDataset>>,
		config: ViewConfig,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		for (i, node) in dataset.nodes.iter().enumerate() {
			let centroid = node.is_centroid();
			let idx = graph.add_node(NodeData {
				x: node.x as f32,
				y: node.y as f32,
				mass: 10.0,
				is_anchor: !config.relax_layout,
				user_data: NodeInfo {
					node: i,
					centroid,
					color: if centroid {
						config.zone_color.clone()
					} else {
						config.crossing_color.clone()
					},
					magnitude: if centroid {
						CENTROID_MAGNITUDE
					} else {
						CROSSING_MAGNITUDE
					},
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut links = Vec::new();
		for (i, edge) in dataset.edges.iter().enumerate() {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				links.push(LinkStyle {
					edge: i,
					source: src,
					target: tgt,
					color: config.link_color.clone(),
					magnitude: edge.lanes.value.min(config.max_lanes),
				});
			}
		}

		let node_range = magnitude_range(dataset.nodes.iter().map(|node| {
			if node.is_centroid() {
				CENTROID_MAGNITUDE
			} else {
				CROSSING_MAGNITUDE
			}
		}));
		let link_range = magnitude_range(links.iter().map(|link| link.magnitude));

		let (x, y) = dataset.node_bounds();
		let fit = fit_to_viewport(x, y, width, height);

		Self {
			graph,
			transform: fit.transform,
			zoom: fit.bounds,
			pan: PanState::default(),
			width,
			height,
			flow_time: 0.0,
			flowing: false,
			dataset,
			results,
			config,
			links,
			node_sizes: SizeBounds::default(),
			edge_sizes: SizeBounds::default(),
			node_range,
			link_range,
			legends: LegendBoard::default(),
		}
	}

	/// Links in drawing order.
	pub fn links(&self) -> &[LinkStyle] {
		&self.links
	}

	/// Current node radius bounds.
	pub fn node_sizes(&self) -> SizeBounds {
		self.node_sizes
	}

	/// Current link width bounds.
	pub fn edge_sizes(&self) -> SizeBounds {
		self.edge_sizes
	}

	/// On-screen radius of a node.
	pub fn node_size(&self, info: &NodeInfo) -> f64 {
		self.node_sizes.interpolate(info.magnitude, self.node_range)
	}

	/// On-screen width of a link.
	pub fn edge_size(&self, link: &LinkStyle) -> f64 {
		self.edge_sizes.interpolate(link.magnitude, self.link_range)
	}

	/// World positions of every node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Node under a screen point: dataset index and world position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<(usize, f64, f64)> {
		let (gx, gy) = self.transform.screen_to_world(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// sizes are in screen pixels
			let radius = self.node_size(&node.data.user_data) / self.transform.k;
			if dx.hypot(dy) <= radius {
				found = Some((node.data.user_data.node, node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Link under a screen point: position in `links()` and its width.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<(usize, f64)> {
		let positions = self.positions();
		self.links.iter().enumerate().rev().find_map(|(i, link)| {
			let (&(x1, y1), &(x2, y2)) =
				(positions.get(&link.source)?, positions.get(&link.target)?);
			let (ax, ay) = self.transform.world_to_screen(x1, y1);
			let (bx, by) = self.transform.world_to_screen(x2, y2);
			let size = self.edge_size(link);
			(segment_distance(sx, sy, ax, ay, bx, by) <= size / 2.0 + EDGE_HIT_SLOP)
				.then_some((i, size))
		})
	}

	/// Advance the animation by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		if self.config.relax_layout {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;
	}

	/// Sizes depend on the viewport area, so they follow a resize.
	pub fn resize(&mut self, width: f64, height: f64, view: &ViewState) {
		self.width = width;
		self.height = height;
		self.set_size(view);
	}
}

/// Distance from `(px, py)` to the segment `a`-`b`.
fn segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
	let (dx, dy) = (bx - ax, by - ay);
	let length_sq = dx * dx + dy * dy;
	let t = if length_sq > 0.0 {
		(((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	(px - (ax + t * dx)).hypot(py - (ay + t * dy))
}

impl NetworkRenderer for LargeNetworkState {
	fn set_size(&mut self, view: &ViewState) {
		let area = self.width * self.height;
		let count = self.dataset.nodes.len().max(1) as f64;
		let unit = view.size_multiplier * (area / count.sqrt()) / 100_000.0;
		self.edge_sizes = SizeBounds::scaled(unit, 0.1, 10.0);
		self.node_sizes = SizeBounds::scaled(unit, 5.0, 30.0);
	}

	fn draw_zones(&mut self, view: &ViewState) {
		let paint = ZonePaint::new(view.zone, &self.dataset, &self.config);
		let dataset = &self.dataset;
		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			if let Some(metrics) = dataset.nodes[info.node].metrics() {
				info.color = paint.color(metrics);
			}
		});
		self.legends.replace(LegendDimension::Zones, paint.legend);
	}

	/// Only the H series is shown on large networks.
	fn draw_links(&mut self, view: &ViewState) {
		let paint = LinkPaint::new(
			view.link,
			SubPopulation::H,
			view.period,
			&self.dataset,
			self.results.as_deref(),
			&self.config,
		);
		for link in &mut self.links {
			link.color = paint.color(&self.dataset.edges[link.edge]);
		}
		self.flowing = view.link.is_time_varying() && paint.legend.is_some();
		self.legends.replace(LegendDimension::Links, paint.legend);
	}

	fn legends(&self) -> &LegendBoard {
		&self.legends
	}

	fn supports_sub_population(&self) -> bool {
		false
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::attribute::{FlowMetric, LinkAttribute, ZoneAttribute};
	use crate::model::{ColorScale, FlowSeries, Range, Schedule};
	use crate::renderer::apply_view;

	const NETWORK: &str = r#"{
		"stats": {"averages": {"min": 0, "max": 8}},
		"colorscales": {"averages": ["a0", "a1", "a2"]},
		"graph": {
			"nodes": [
				{"id": 1, "x": 0, "y": 0, "centroid": "true",
				 "averages": {"values": 8, "colors": "ave-8"}},
				{"id": 2, "x": 100, "y": 0, "centroid": "false"},
				{"id": 3, "x": 100, "y": 100, "centroid": "false"},
				{"id": 4, "x": 0, "y": 100, "centroid": "false"}
			],
			"edges": [
				{"id": 10, "source": 1, "target": 2, "lanes": {"values": 1, "colors": "l1"}},
				{"id": 11, "source": 2, "target": 3, "lanes": {"values": 9, "colors": "l9"}}
			]
		}
	}"#;

	fn state_with(results: Option<ResultsDataset>) -> LargeNetworkState {
		let dataset = Arc::new(GraphDataset::from_json(NETWORK).unwrap());
		LargeNetworkState::new(
			dataset,
			results.map(Arc::new),
			ViewConfig::default(),
			1000.0,
			400.0,
		)
	}

	fn results() -> ResultsDataset {
		let series = |color: &str| {
			FlowSeries::new(
				Range::new(0.0, 5.0),
				HashMap::from([("10".to_string(), vec![color.to_string()])]),
				HashMap::new(),
			)
		};
		ResultsDataset::new(
			ColorScale::new(vec!["r0".into()]),
			Schedule::new(0.0, 10.0, 1),
			HashMap::from([
				((FlowMetric::InFlow, SubPopulation::H), series("in-h")),
				((FlowMetric::InFlow, SubPopulation::S), series("in-s")),
			]),
		)
	}

	fn node_colors(state: &LargeNetworkState) -> Vec<String> {
		let mut colors = Vec::new();
		state.graph.visit_nodes(|node| colors.push(node.data.user_data.color.clone()));
		colors
	}

	#[test]
	fn size_bounds_follow_viewport_and_node_count() {
		let mut state = state_with(None);
		state.set_size(&ViewState::default());
		// 1000 * 400 / sqrt(4) / 100000
		let unit = 2.0;
		assert_eq!(state.node_sizes(), SizeBounds { min: 5.0 * unit, max: 30.0 * unit });
		assert_eq!(state.edge_sizes(), SizeBounds { min: 0.1 * unit, max: 10.0 * unit });

		let thin = state.edge_size(&state.links()[0]);
		let wide = state.edge_size(&state.links()[1]);
		assert_eq!(thin, 0.2);
		assert!((wide - 20.0).abs() < 1e-9);
	}

	#[test]
	fn doubling_the_multiplier_doubles_bounds() {
		let mut state = state_with(None);
		state.set_size(&ViewState::default());
		let (nodes, edges) = (state.node_sizes(), state.edge_sizes());
		state.set_size(&ViewState {
			size_multiplier: 2.0,
			..ViewState::default()
		});
		assert_eq!(state.node_sizes().max, 2.0 * nodes.max);
		assert_eq!(state.node_sizes().min, 2.0 * nodes.min);
		assert_eq!(state.edge_sizes().max, 2.0 * edges.max);
	}

	#[test]
	fn degenerate_ranges_use_the_lower_bound() {
		let bounds = SizeBounds { min: 1.0, max: 3.0 };
		assert_eq!(bounds.interpolate(5.0, (5.0, 5.0)), 1.0);
		assert_eq!(bounds.interpolate(7.5, (5.0, 10.0)), 2.0);
	}

	#[test]
	fn zone_coloring_mirrors_the_small_renderer() {
		let mut state = state_with(None);
		let view = ViewState {
			zone: ZoneAttribute::Averages,
			..ViewState::default()
		};
		apply_view(&mut state, None, &view);
		assert!(node_colors(&state).contains(&"ave-8".to_string()));
		let legend = state.legends().get(LegendDimension::Zones).unwrap();
		assert_eq!(legend.colorscale.len(), 3);
		assert_eq!(legend.domain, Range::new(0.0, 8.0));

		let none = ViewState::default();
		apply_view(&mut state, Some(&view), &none);
		assert!(!node_colors(&state).contains(&"ave-8".to_string()));
		assert!(state.legends().get(LegendDimension::Zones).is_none());
	}

	#[test]
	fn time_varying_colors_ignore_the_population() {
		let mut state = state_with(Some(results()));
		let view = ViewState {
			link: LinkAttribute::Flow(FlowMetric::InFlow),
			population: SubPopulation::S,
			..ViewState::default()
		};
		apply_view(&mut state, None, &view);
		assert!(!state.supports_sub_population());
		assert_eq!(state.links()[0].color, "in-h");
		assert!(state.flowing);

		// no out-flow series on large networks
		let outflow = ViewState {
			link: LinkAttribute::Flow(FlowMetric::OutFlow),
			..view
		};
		apply_view(&mut state, Some(&view), &outflow);
		assert_eq!(state.links()[0].color, ViewConfig::default().link_color);
		assert!(state.legends().get(LegendDimension::Links).is_none());
		assert_eq!(state.legends().label_display(LegendDimension::Links), "none");
		assert!(!state.flowing);
	}

	#[test]
	fn repeated_draws_keep_one_legend() {
		let mut state = state_with(None);
		let view = ViewState {
			zone: ZoneAttribute::Averages,
			link: LinkAttribute::Lanes,
			..ViewState::default()
		};
		for _ in 0..3 {
			state.draw_zones(&view);
			state.draw_links(&view);
		}
		assert_eq!(state.legends().count(), 2);
	}

	#[test]
	fn clicks_hit_nodes_and_links() {
		let mut state = state_with(None);
		apply_view(&mut state, None, &ViewState::default());
		let t = state.transform;

		let (sx, sy) = t.world_to_screen(100.0, 100.0);
		let (node, x, y) = state.node_at_position(sx, sy).unwrap();
		assert_eq!((node, x, y), (2, 100.0, 100.0));

		let (sx, sy) = t.world_to_screen(100.0, 50.0);
		let (link, size) = state.edge_at_position(sx, sy).unwrap();
		assert_eq!(link, 1);
		assert_eq!(size, state.edge_size(&state.links()[1]));

		let (sx, sy) = t.world_to_screen(50.0, 100.0);
		assert!(state.edge_at_position(sx, sy).is_none());
	}

	#[test]
	fn pinned_nodes_stay_at_their_coordinates() {
		let mut state = state_with(None);
		let before = state.positions();
		for _ in 0..10 {
			state.tick(0.016);
		}
		assert_eq!(state.positions(), before);
		assert!(state.flow_time > 0.0);
	}

	#[test]
	fn view_fits_flipped_node_coordinates() {
		// node y comes flipped while the y statistics do not
		let network = r#"{
			"stats": {"x": {"min": 0, "max": 1000}, "y": {"min": 5000, "max": 6000}},
			"graph": {
				"nodes": [
					{"id": 1, "x": 0, "y": -5000, "centroid": "true"},
					{"id": 2, "x": 1000, "y": -6000, "centroid": "false"}
				],
				"edges": [{"id": 1, "source": 1, "target": 2}]
			}
		}"#;
		let dataset = Arc::new(GraphDataset::from_json(network).unwrap());
		let state = LargeNetworkState::new(dataset, None, ViewConfig::default(), 800.0, 600.0);
		for (wx, wy) in [(0.0, -5000.0), (1000.0, -6000.0)] {
			let (sx, sy) = state.transform.world_to_screen(wx, wy);
			assert!((0.0..=800.0).contains(&sx), "x {sx} off screen");
			assert!((0.0..=600.0).contains(&sy), "y {sy} off screen");
		}
	}
}
